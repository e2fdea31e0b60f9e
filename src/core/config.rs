// パイプライン設定
//
// ペアリング規約とフィールドセットは外部ツールのドキュメントに
// 合わせて確定させる前提の設定値として持つ。

use std::time::Duration;

/// 既定で認識するメディア拡張子（小文字で比較する）
pub const DEFAULT_MEDIA_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "mp4", "mov", "avi",
];

/// 既定のサイドカー命名規約：メディアファイル名全体への後置サフィックス
pub const DEFAULT_SIDECAR_SUFFIX: &str = ".json";

/// 標準エラー出力の取り込み上限（バイト）
pub const DEFAULT_STDERR_EXCERPT_LIMIT: usize = 4096;

/// バッチ実行の設定
#[derive(Debug, Clone)]
pub struct EmbedConfig {
    sidecar_suffix: String,
    media_extensions: Vec<String>,
    tool_timeout: Option<Duration>,
    stderr_excerpt_limit: usize,
}

impl EmbedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sidecar_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.sidecar_suffix = suffix.into();
        self
    }

    pub fn with_media_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.media_extensions = extensions
            .into_iter()
            .map(|e| e.into().to_lowercase())
            .collect();
        self
    }

    /// ツール1回あたりのタイムアウト。`None` で無制限
    pub fn with_tool_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_stderr_excerpt_limit(mut self, limit: usize) -> Self {
        self.stderr_excerpt_limit = limit;
        self
    }

    pub fn sidecar_suffix(&self) -> &str {
        &self.sidecar_suffix
    }

    pub fn media_extensions(&self) -> &[String] {
        &self.media_extensions
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout
    }

    pub fn stderr_excerpt_limit(&self) -> usize {
        self.stderr_excerpt_limit
    }

    /// 拡張子が認識対象かどうか（小文字化して比較）
    pub fn is_media_extension(&self, extension: &str) -> bool {
        let lower = extension.to_lowercase();
        self.media_extensions.iter().any(|e| e == &lower)
    }
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            sidecar_suffix: DEFAULT_SIDECAR_SUFFIX.to_string(),
            media_extensions: DEFAULT_MEDIA_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            tool_timeout: None,
            stderr_excerpt_limit: DEFAULT_STDERR_EXCERPT_LIMIT,
        }
    }
}

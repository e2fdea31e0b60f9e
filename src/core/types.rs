// 処理に関連するデータ型定義

use std::path::{Path, PathBuf};

/// メディアファイルとサイドカーの組
///
/// ロケータが1回の走査で構築する。サイドカーが見つからない場合は
/// `sidecar_path` が `None` の不完全ペアとして報告される。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MediaSidecarPair {
    pub media_path: PathBuf,
    pub sidecar_path: Option<PathBuf>,
}

impl MediaSidecarPair {
    /// 完全なペアを作成
    pub fn complete(media_path: impl Into<PathBuf>, sidecar_path: impl Into<PathBuf>) -> Self {
        Self {
            media_path: media_path.into(),
            sidecar_path: Some(sidecar_path.into()),
        }
    }

    /// サイドカー欠落の不完全ペアを作成
    pub fn incomplete(media_path: impl Into<PathBuf>) -> Self {
        Self {
            media_path: media_path.into(),
            sidecar_path: None,
        }
    }

    /// 両方のパスが揃っているかどうか
    pub fn is_complete(&self) -> bool {
        self.sidecar_path.is_some()
    }
}

/// ロケータが順次生成するペアリング結果
#[derive(Debug, Clone, PartialEq)]
pub enum PairResult {
    /// メディアファイルのペアリング結果（完全・不完全の両方）
    Pair(MediaSidecarPair),
    /// サブツリー単位の走査失敗診断。走査自体は継続する
    UnreadableSubtree { path: PathBuf, message: String },
}

/// 1回のツール起動の分類結果
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationStatus {
    Success,
    ToolFailure {
        exit_code: i32,
        stderr_excerpt: String,
    },
    Skipped {
        reason: String,
    },
}

/// 1件分の処理結果
///
/// インボーカが生成し、オーケストレータが即座に消費する。
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InvocationOutcome {
    pub pair: MediaSidecarPair,
    pub status: InvocationStatus,
    pub duration_ms: u64,
}

impl InvocationOutcome {
    pub fn success(pair: MediaSidecarPair, duration_ms: u64) -> Self {
        Self {
            pair,
            status: InvocationStatus::Success,
            duration_ms,
        }
    }

    pub fn tool_failure(
        pair: MediaSidecarPair,
        exit_code: i32,
        stderr_excerpt: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            pair,
            status: InvocationStatus::ToolFailure {
                exit_code,
                stderr_excerpt: stderr_excerpt.into(),
            },
            duration_ms,
        }
    }

    pub fn skipped(pair: MediaSidecarPair, reason: impl Into<String>) -> Self {
        Self {
            pair,
            status: InvocationStatus::Skipped {
                reason: reason.into(),
            },
            duration_ms: 0,
        }
    }
}

/// バッチ全体の集計カウンタ
///
/// ワーカーだけが更新する。`total_considered` は常に3つの内訳の合計と一致する。
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BatchSummary {
    pub total_considered: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchSummary {
    /// 1件の結果をカウンタに反映する
    ///
    /// 総数と内訳を同時に進めることで不変条件を単一箇所で維持する。
    pub fn record(&mut self, status: &InvocationStatus) {
        self.total_considered += 1;
        match status {
            InvocationStatus::Success => self.succeeded += 1,
            InvocationStatus::ToolFailure { .. } => self.failed += 1,
            InvocationStatus::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// 実行の終端状態
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunTermination {
    Completed,
    Cancelled,
    Failed { reason: String },
}

/// オーケストレータの状態遷移
/// Idle → Running → {Completed | Cancelled | Failed}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

/// シンクへ配信されるイベント
///
/// 配信順はロケータの決定的走査順と一致し、`Summary` は常に最後の1件。
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum BatchEvent {
    Progress(InvocationOutcome),
    Diagnostic {
        path: PathBuf,
        message: String,
    },
    Summary {
        summary: BatchSummary,
        termination: RunTermination,
    },
}

impl BatchEvent {
    /// 終端イベントかどうか
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchEvent::Summary { .. })
    }
}

/// パスの表示用ヘルパ（イベント整形で共用）
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

// exiftool起動の具象実装
//
// サイドカーの作成日時と説明文をメディアファイルの埋め込みメタデータへ
// フィールド単位でコピーする。1ファイルにつき1プロセス、リトライなし。

use super::{ToolInvoker, EXIT_CODE_KILLED, EXIT_CODE_SPAWN_FAILED, EXIT_CODE_TIMED_OUT};
use crate::core::{EmbedConfig, InvocationOutcome, MediaSidecarPair};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::process::Command;

/// サイドカーのフィールド → 書き込み先タグの対応表
///
/// ツール側のJSONインポート仕様に合わせた固定セット。
const SIDECAR_FIELD_TAGS: &[(&str, &str)] = &[
    ("creation_timestamp", "DateTimeOriginal"),
    ("description", "ImageDescription"),
];

/// exiftoolを1ファイルずつ起動するインボーカ
pub struct ExifToolInvoker {
    tool_timeout: Option<Duration>,
    stderr_excerpt_limit: usize,
}

impl ExifToolInvoker {
    pub fn new(config: &EmbedConfig) -> Self {
        Self {
            tool_timeout: config.tool_timeout(),
            stderr_excerpt_limit: config.stderr_excerpt_limit(),
        }
    }

    /// 固定フラグ＋2つのファイルパスから成る引数リストを構築
    ///
    /// 標準出力は破棄、標準入力は与えない。メディアはその場で上書き。
    fn build_args(media_path: &Path, sidecar_path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            OsString::from("-overwrite_original"),
            OsString::from("-tagsfromfile"),
            sidecar_path.as_os_str().to_os_string(),
        ];

        for (field, tag) in SIDECAR_FIELD_TAGS {
            args.push(OsString::from(format!("-{tag}<{field}")));
        }

        args.push(media_path.as_os_str().to_os_string());
        args
    }

    /// 子プロセスを起動し、終了コードと標準エラーの先頭部分を返す
    ///
    /// 標準エラーは設定された上限までしか保持しない。上限を超えた分は
    /// 読み捨てて、子プロセスがパイプ詰まりで止まらないようにする。
    async fn run_tool(
        &self,
        tool_path: &Path,
        media_path: &Path,
        sidecar_path: &Path,
    ) -> std::io::Result<(ExitStatus, Vec<u8>)> {
        let mut command = Command::new(tool_path);
        command
            .args(Self::build_args(media_path, sidecar_path))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn()?;

        let mut excerpt = Vec::new();
        if let Some(stderr) = child.stderr.take() {
            let mut limited = stderr.take(self.stderr_excerpt_limit as u64);
            limited.read_to_end(&mut excerpt).await?;
            tokio::io::copy(&mut limited.into_inner(), &mut tokio::io::sink()).await?;
        }

        let status = child.wait().await?;
        Ok((status, excerpt))
    }
}

#[async_trait]
impl ToolInvoker for ExifToolInvoker {
    async fn invoke(&self, pair: &MediaSidecarPair, tool_path: &Path) -> InvocationOutcome {
        // 前提条件は呼び出し側が保証するが、欠落ペアは安全側に倒す
        let Some(sidecar_path) = pair.sidecar_path.clone() else {
            return InvocationOutcome::skipped(pair.clone(), "サイドカーが存在しません");
        };

        let started = Instant::now();
        let run = self.run_tool(tool_path, &pair.media_path, &sidecar_path);

        let result = if let Some(limit) = self.tool_timeout {
            match tokio::time::timeout(limit, run).await {
                Ok(result) => result,
                Err(_) => {
                    // タイムアウト時はrunのドロップでkill_on_dropが子プロセスを回収する
                    return InvocationOutcome::tool_failure(
                        pair.clone(),
                        EXIT_CODE_TIMED_OUT,
                        format!("タイムアウト: {}秒以内に終了しませんでした", limit.as_secs()),
                        started.elapsed().as_millis() as u64,
                    );
                }
            }
        } else {
            run.await
        };

        let duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok((status, excerpt)) => {
                if status.success() {
                    InvocationOutcome::success(pair.clone(), duration_ms)
                } else {
                    InvocationOutcome::tool_failure(
                        pair.clone(),
                        status.code().unwrap_or(EXIT_CODE_KILLED),
                        String::from_utf8_lossy(&excerpt).into_owned(),
                        duration_ms,
                    )
                }
            }
            Err(error) => InvocationOutcome::tool_failure(
                pair.clone(),
                EXIT_CODE_SPAWN_FAILED,
                format!("プロセスを起動できません: {error}"),
                duration_ms,
            ),
        }
    }
}

// 高レベル公開API
// BatchProcessorを簡単に使用できるようにするための便利な関数

use super::batch::{BatchProcessor, RunHandle};
use crate::core::{BatchResult, BatchSummary, EmbedConfig, RunTermination};
use crate::invoker::{ExifToolInvoker, ToolInvoker};
use crate::reporting::{ConsoleProgressSink, NoOpProgressSink, ProgressSink};
use std::path::Path;

/// コンソール報告つきのプロセッサを作成
pub fn create_console_processor(
    config: EmbedConfig,
) -> BatchProcessor<ExifToolInvoker, ConsoleProgressSink> {
    let invoker = ExifToolInvoker::new(&config);
    BatchProcessor::new(invoker, ConsoleProgressSink::new(), config)
}

/// 静音版プロセッサを作成（バックグラウンド処理用）
pub fn create_quiet_processor(
    config: EmbedConfig,
) -> BatchProcessor<ExifToolInvoker, NoOpProgressSink> {
    let invoker = ExifToolInvoker::new(&config);
    BatchProcessor::new(invoker, NoOpProgressSink::new(), config)
}

/// 開始から完了待ちまでをまとめた便利関数
///
/// 細かい制御（キャンセル等）が必要な場合は `start` でハンドルを取る。
pub async fn run_directory_with_processor<I, S>(
    processor: &BatchProcessor<I, S>,
    root_dir: &Path,
    tool_path: &Path,
) -> BatchResult<(BatchSummary, RunTermination)>
where
    I: ToolInvoker + 'static,
    S: ProgressSink + 'static,
{
    let handle: RunHandle = processor.start(root_dir, tool_path)?;
    handle.wait().await
}

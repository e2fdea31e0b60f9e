use crate::core::{EmbedConfig, RunTermination};
use crate::engine::BatchProcessor;
use crate::invoker::ExifToolInvoker;
use crate::reporting::{CompositeSink, ConsoleProgressSink, JsonReportSink, ProgressSink};
use crate::toolfind::find_exiftool_in_path;
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration struct for the run command to reduce argument count
pub struct RunOptions {
    pub target_directory: PathBuf,
    pub exiftool: Option<PathBuf>,
    pub timeout: u64,
    pub report: Option<PathBuf>,
    pub quiet: bool,
}

/// エクスポートレイアウトのディレクトリ名規約
const EXPORT_DIR_NAME: &str = "photos_and_videos";

/// Execute the embedding batch
pub async fn execute_run(options: RunOptions) -> Result<()> {
    // Validate target directory
    if !options.target_directory.exists() {
        anyhow::bail!(
            "Target directory does not exist: {}",
            options.target_directory.display()
        );
    }

    if !options.target_directory.is_dir() {
        anyhow::bail!(
            "Target path is not a directory: {}",
            options.target_directory.display()
        );
    }

    // エクスポートの photos_and_videos ディレクトリ以外は受け付けない
    let dir_name = options
        .target_directory
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    if dir_name != EXPORT_DIR_NAME {
        anyhow::bail!(
            "Directory must be your {EXPORT_DIR_NAME} directory: {}",
            options.target_directory.display()
        );
    }

    // Resolve the tool: explicit path wins over PATH search
    let tool_path = match options.exiftool {
        Some(path) => path,
        None => find_exiftool_in_path()
            .ok_or_else(|| anyhow::anyhow!("exiftool not found on PATH, use --exiftool"))?,
    };

    if !tool_path.exists() {
        anyhow::bail!("Can't find exiftool file specified: {}", tool_path.display());
    }

    let timeout = if options.timeout == 0 {
        None
    } else {
        Some(Duration::from_secs(options.timeout))
    };
    let config = EmbedConfig::default().with_tool_timeout(timeout);

    println!("🚀 サイドカーメタデータ埋め込み開始");
    println!(
        "   - 対象ディレクトリ: {}",
        options.target_directory.display()
    );
    println!("   - ツール: {}", tool_path.display());
    match config.tool_timeout() {
        Some(limit) => println!("   - タイムアウト: {}秒/ファイル", limit.as_secs()),
        None => println!("   - タイムアウト: なし"),
    }

    // コンソールと（必要なら）JSONレポートへ配信する
    let mut sinks: Vec<Box<dyn ProgressSink>> = vec![if options.quiet {
        Box::new(ConsoleProgressSink::quiet())
    } else {
        Box::new(ConsoleProgressSink::new())
    }];
    if let Some(report_path) = &options.report {
        println!("   - レポート: {}", report_path.display());
        sinks.push(Box::new(JsonReportSink::new(report_path)));
    }

    let invoker = ExifToolInvoker::new(&config);
    let processor = BatchProcessor::new(invoker, CompositeSink::new(sinks), config);

    let handle = processor.start(&options.target_directory, &tool_path)?;

    // Ctrl-Cで協調キャンセル。実行中の1件は完走させる
    let canceller = handle.canceller();
    let signal_watch = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("🛑 中断要求を受け付けました。実行中のファイルが終わり次第停止します");
            canceller.cancel();
        }
    });

    let (summary, termination) = handle.wait().await?;
    signal_watch.abort();

    match termination {
        RunTermination::Completed => {
            if summary.failed > 0 {
                println!("⚠️  {}件のファイルでツールが失敗しました", summary.failed);
            }
            Ok(())
        }
        RunTermination::Cancelled => Ok(()),
        RunTermination::Failed { reason } => {
            anyhow::bail!("バッチを開始できませんでした: {reason}");
        }
    }
}

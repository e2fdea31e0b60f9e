// エンドツーエンド統合テスト
// 実プロセス（偽ツールスクリプト）を使ってパイプライン全体を検証する

use crate::fixtures::{build_export, recording_tool, selective_failing_tool, success_tool};
use exif_embed::{
    BatchEvent, BatchProcessor, CompositeSink, EmbedConfig, ExifToolInvoker, InvocationStatus,
    JsonReportSink, MemoryProgressSink, ProgressSink, RunReport, RunTermination,
};
use std::fs;
use tempfile::TempDir;

fn processor_with_memory_sink(
    config: EmbedConfig,
) -> (
    BatchProcessor<ExifToolInvoker, MemoryProgressSink>,
    MemoryProgressSink,
) {
    let sink = MemoryProgressSink::new();
    let invoker = ExifToolInvoker::new(&config);
    (
        BatchProcessor::new(invoker, sink.clone(), config),
        sink,
    )
}

#[tokio::test]
async fn test_mixed_export_counts_match() {
    let temp_dir = TempDir::new().unwrap();
    let export = temp_dir.path().join("photos_and_videos");
    fs::create_dir(&export).unwrap();
    let tool = success_tool(temp_dir.path());

    // メディア3件、うち2件にサイドカー
    build_export(
        &export,
        &["a.jpg", "b.jpg", "c.jpg"],
        &["a.jpg", "b.jpg"],
    );

    let (processor, sink) = processor_with_memory_sink(EmbedConfig::default());
    let handle = processor.start(&export, &tool).unwrap();
    let (summary, termination) = handle.wait().await.unwrap();

    assert_eq!(termination, RunTermination::Completed);
    assert_eq!(summary.total_considered, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.skipped, 1);

    // 終端イベントが最後の1件
    let events = sink.events();
    assert_eq!(events.len(), 4);
    assert!(events.last().unwrap().is_terminal());
    assert_eq!(sink.terminal_count(), 1);

    // イベント列から集計を再構成するとサマリーと一致する
    let mut succeeded = 0;
    let mut failed = 0;
    let mut skipped = 0;
    for event in &events {
        if let BatchEvent::Progress(outcome) = event {
            match outcome.status {
                InvocationStatus::Success => succeeded += 1,
                InvocationStatus::ToolFailure { .. } => failed += 1,
                InvocationStatus::Skipped { .. } => skipped += 1,
            }
        }
    }
    assert_eq!(succeeded, summary.succeeded);
    assert_eq!(failed, summary.failed);
    assert_eq!(skipped, summary.skipped);
    assert_eq!(succeeded + failed + skipped, summary.total_considered);
}

#[tokio::test]
async fn test_first_failure_then_success_event_order() {
    let temp_dir = TempDir::new().unwrap();
    let export = temp_dir.path().join("photos_and_videos");
    fs::create_dir(&export).unwrap();
    let tool = selective_failing_tool(temp_dir.path());

    // 走査順で先に来るファイルだけ失敗させる
    build_export(
        &export,
        &["a_fail_me.jpg", "b.jpg"],
        &["a_fail_me.jpg", "b.jpg"],
    );

    let (processor, sink) = processor_with_memory_sink(EmbedConfig::default());
    let handle = processor.start(&export, &tool).unwrap();
    let (summary, _) = handle.wait().await.unwrap();

    assert_eq!(summary.total_considered, 2);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 0);

    let events = sink.events();
    assert_eq!(events.len(), 3);
    match &events[0] {
        BatchEvent::Progress(outcome) => match &outcome.status {
            InvocationStatus::ToolFailure {
                exit_code,
                stderr_excerpt,
            } => {
                assert_eq!(*exit_code, 3);
                assert!(stderr_excerpt.contains("simulated tool error"));
            }
            other => panic!("unexpected status: {other:?}"),
        },
        other => panic!("unexpected event: {other:?}"),
    }
    match &events[1] {
        BatchEvent::Progress(outcome) => {
            assert_eq!(outcome.status, InvocationStatus::Success);
            assert!(outcome.pair.media_path.ends_with("b.jpg"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(events[2].is_terminal());
}

#[tokio::test]
async fn test_tool_receives_sidecar_and_media_paths_once_per_pair() {
    let temp_dir = TempDir::new().unwrap();
    let export = temp_dir.path().join("photos_and_videos");
    fs::create_dir(&export).unwrap();
    let log_path = temp_dir.path().join("invocations.log");
    let tool = recording_tool(temp_dir.path(), &log_path);

    build_export(
        &export,
        &["album/one.jpg", "album/two.png"],
        &["album/one.jpg", "album/two.png"],
    );

    let (processor, _sink) = processor_with_memory_sink(EmbedConfig::default());
    let handle = processor.start(&export, &tool).unwrap();
    let (summary, _) = handle.wait().await.unwrap();

    assert_eq!(summary.succeeded, 2);

    let log = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = log.lines().collect();

    // ペアごとにちょうど1回起動される
    assert_eq!(lines.len(), 2);

    // 固定フラグと両方のパスが渡っている（走査順どおり）
    assert!(lines[0].contains("-overwrite_original"));
    assert!(lines[0].contains("-tagsfromfile"));
    assert!(lines[0].contains("one.jpg.json"));
    assert!(lines[0].contains("one.jpg"));
    assert!(lines[1].contains("two.png.json"));
    assert!(lines[1].contains("two.png"));
}

#[tokio::test]
async fn test_json_report_written_alongside_events() {
    let temp_dir = TempDir::new().unwrap();
    let export = temp_dir.path().join("photos_and_videos");
    fs::create_dir(&export).unwrap();
    let tool = success_tool(temp_dir.path());
    let report_path = temp_dir.path().join("report.json");

    build_export(&export, &["a.jpg", "b.jpg"], &["a.jpg"]);

    let config = EmbedConfig::default();
    let memory = MemoryProgressSink::new();
    let composite = CompositeSink::new(vec![
        Box::new(memory.clone()) as Box<dyn ProgressSink>,
        Box::new(JsonReportSink::new(&report_path)) as Box<dyn ProgressSink>,
    ]);
    let processor = BatchProcessor::new(ExifToolInvoker::new(&config), composite, config);

    let handle = processor.start(&export, &tool).unwrap();
    let (summary, termination) = handle.wait().await.unwrap();

    let report: RunReport =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();

    assert_eq!(report.summary, summary);
    assert_eq!(report.termination, termination);
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(memory.events().len(), 3);
}

#[tokio::test]
async fn test_empty_export_completes_with_zero_summary() {
    let temp_dir = TempDir::new().unwrap();
    let export = temp_dir.path().join("photos_and_videos");
    fs::create_dir(&export).unwrap();
    let tool = success_tool(temp_dir.path());

    let (processor, sink) = processor_with_memory_sink(EmbedConfig::default());
    let handle = processor.start(&export, &tool).unwrap();
    let (summary, termination) = handle.wait().await.unwrap();

    assert_eq!(termination, RunTermination::Completed);
    assert_eq!(summary.total_considered, 0);
    assert_eq!(sink.events().len(), 1);
}

// 協調キャンセルの統合テスト

use crate::fixtures::{build_export, sleeping_tool};
use exif_embed::{
    BatchEvent, BatchProcessor, EmbedConfig, ExifToolInvoker, MemoryProgressSink, RunTermination,
};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[tokio::test]
async fn test_cancel_emits_single_terminal_event_last() {
    let temp_dir = TempDir::new().unwrap();
    let export = temp_dir.path().join("photos_and_videos");
    fs::create_dir(&export).unwrap();
    let tool = sleeping_tool(temp_dir.path(), "0.2");

    let media: Vec<String> = (0..8).map(|i| format!("photo{i}.jpg")).collect();
    let names: Vec<&str> = media.iter().map(String::as_str).collect();
    build_export(&export, &names, &names);

    let sink = MemoryProgressSink::new();
    let config = EmbedConfig::default();
    let processor =
        BatchProcessor::new(ExifToolInvoker::new(&config), sink.clone(), config);

    let handle = processor.start(&export, &tool).unwrap();

    // 数件進んだところで停止を要求
    tokio::time::sleep(Duration::from_millis(500)).await;
    handle.cancel();
    let (summary, termination) = handle.wait().await.unwrap();

    assert_eq!(termination, RunTermination::Cancelled);
    assert!(summary.total_considered < 8);
    assert_eq!(
        summary.total_considered,
        summary.succeeded + summary.failed + summary.skipped
    );

    // 終端イベントはちょうど1件で、ストリームの最後
    let events = sink.events();
    assert_eq!(sink.terminal_count(), 1);
    match events.last().unwrap() {
        BatchEvent::Summary {
            summary: final_summary,
            termination,
        } => {
            assert_eq!(*final_summary, summary);
            assert_eq!(*termination, RunTermination::Cancelled);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    // 終端より後に非終端イベントは存在しない
    let terminal_index = events.iter().position(BatchEvent::is_terminal).unwrap();
    assert_eq!(terminal_index, events.len() - 1);
}

#[tokio::test]
async fn test_cancelled_processor_can_run_again() {
    let temp_dir = TempDir::new().unwrap();
    let export = temp_dir.path().join("photos_and_videos");
    fs::create_dir(&export).unwrap();
    let tool = sleeping_tool(temp_dir.path(), "0.1");
    build_export(&export, &["a.jpg", "b.jpg"], &["a.jpg", "b.jpg"]);

    let sink = MemoryProgressSink::new();
    let config = EmbedConfig::default();
    let processor =
        BatchProcessor::new(ExifToolInvoker::new(&config), sink.clone(), config);

    // 1回目は即キャンセル
    let handle = processor.start(&export, &tool).unwrap();
    handle.cancel();
    let (_, termination) = handle.wait().await.unwrap();
    assert_eq!(termination, RunTermination::Cancelled);

    // キャンセル後は新しい実行を受け付ける
    sink.clear();
    let handle = processor.start(&export, &tool).unwrap();
    let (summary, termination) = handle.wait().await.unwrap();

    assert_eq!(termination, RunTermination::Completed);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(sink.terminal_count(), 1);
}

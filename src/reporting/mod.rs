// 進捗報告シンクのトレイト定義と基本実装
//
// シンクへの配信はすべてワーカーのコンテキストで行われる。
// スレッド親和性が必要な消費者は自分側で橋渡しする。

use crate::core::types::display_path;
use crate::core::{BatchEvent, InvocationStatus, RunTermination};
use async_trait::async_trait;
use mockall::automock;
use std::sync::{Arc, Mutex};

pub mod json_report;

pub use json_report::{JsonReportSink, RunReport};

/// 進捗イベントの受け口を抽象化するトレイト
///
/// イベントはロケータの走査順で届き、`Summary` が常に最後の1件になる。
#[automock]
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn deliver(&self, event: BatchEvent);
}

#[async_trait]
impl ProgressSink for Box<dyn ProgressSink> {
    async fn deliver(&self, event: BatchEvent) {
        self.as_ref().deliver(event).await;
    }
}

/// コンソール出力による進捗シンク
#[derive(Debug, Default)]
pub struct ConsoleProgressSink {
    quiet: bool,
}

impl ConsoleProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

#[async_trait]
impl ProgressSink for ConsoleProgressSink {
    async fn deliver(&self, event: BatchEvent) {
        if self.quiet {
            return;
        }

        match event {
            BatchEvent::Progress(outcome) => {
                let media = display_path(&outcome.pair.media_path);
                match &outcome.status {
                    InvocationStatus::Success => {
                        println!("📷 埋め込み完了: {media} ({}ms)", outcome.duration_ms);
                    }
                    InvocationStatus::ToolFailure {
                        exit_code,
                        stderr_excerpt,
                    } => {
                        eprintln!("❌ ツール失敗 (exit {exit_code}): {media} - {stderr_excerpt}");
                    }
                    InvocationStatus::Skipped { reason } => {
                        println!("⏭️  スキップ: {media} ({reason})");
                    }
                }
            }
            BatchEvent::Diagnostic { path, message } => {
                eprintln!("⚠️  走査診断: {} - {message}", display_path(&path));
            }
            BatchEvent::Summary {
                summary,
                termination,
            } => {
                match termination {
                    RunTermination::Completed => println!("✅ バッチ完了!"),
                    RunTermination::Cancelled => println!("🛑 バッチをキャンセルしました"),
                    RunTermination::Failed { reason } => eprintln!("❌ バッチ失敗: {reason}"),
                }
                println!(
                    "📊 対象: {} / 成功: {} / 失敗: {} / スキップ: {}",
                    summary.total_considered, summary.succeeded, summary.failed, summary.skipped
                );
            }
        }
    }
}

/// 何もしない進捗シンク（バックグラウンド処理・ベンチ用）
#[derive(Debug, Default)]
pub struct NoOpProgressSink;

impl NoOpProgressSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressSink for NoOpProgressSink {
    async fn deliver(&self, _event: BatchEvent) {
        // 何もしない
    }
}

/// メモリ内にイベントを蓄積するシンク（テスト・検証用）
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressSink {
    events: Arc<Mutex<Vec<BatchEvent>>>,
}

impl MemoryProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 蓄積されたイベントのスナップショットを取得
    pub fn events(&self) -> Vec<BatchEvent> {
        self.events.lock().unwrap().clone()
    }

    /// 終端イベントの件数
    pub fn terminal_count(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.is_terminal())
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

#[async_trait]
impl ProgressSink for MemoryProgressSink {
    async fn deliver(&self, event: BatchEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// 複数のシンクへ順番に配信するシンク
///
/// コンソール出力とJSONレポートの併用のように、1回の実行で
/// 複数の消費者へ流したい場合に使う。
pub struct CompositeSink {
    sinks: Vec<Box<dyn ProgressSink>>,
}

impl CompositeSink {
    pub fn new(sinks: Vec<Box<dyn ProgressSink>>) -> Self {
        Self { sinks }
    }
}

#[async_trait]
impl ProgressSink for CompositeSink {
    async fn deliver(&self, event: BatchEvent) {
        for sink in &self.sinks {
            sink.deliver(event.clone()).await;
        }
    }
}

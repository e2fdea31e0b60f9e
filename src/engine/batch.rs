// バッチオーケストレータ
//
// 1回の実行につき専用ワーカーを1つ起動し、ロケータの走査順どおりに
// ツールを逐次起動する。ファイル単位の失敗はイベントとして流れ、
// バッチ全体を止めることはない。

use crate::core::{
    BatchError, BatchEvent, BatchResult, BatchSummary, EmbedConfig, InvocationOutcome, PairResult,
    RunState, RunTermination,
};
use crate::invoker::ToolInvoker;
use crate::locator::MediaPairLocator;
use crate::reporting::ProgressSink;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// サイドカー欠落スキップの理由文字列
pub const SKIP_REASON_MISSING_SIDECAR: &str = "サイドカーが見つかりません";

/// 依存性注入によるバッチオーケストレータ
///
/// インボーカとシンクはコンストラクタで注入され、ワーカーとの共有は
/// Arcで行う。1インスタンスにつき同時に1実行のみ受け付ける。
pub struct BatchProcessor<I, S> {
    invoker: Arc<I>,
    sink: Arc<S>,
    config: Arc<EmbedConfig>,
    running: Arc<AtomicBool>,
    state: Arc<Mutex<RunState>>,
}

impl<I, S> BatchProcessor<I, S>
where
    I: ToolInvoker + 'static,
    S: ProgressSink + 'static,
{
    pub fn new(invoker: I, sink: S, config: EmbedConfig) -> Self {
        Self {
            invoker: Arc::new(invoker),
            sink: Arc::new(sink),
            config: Arc::new(config),
            running: Arc::new(AtomicBool::new(false)),
            state: Arc::new(Mutex::new(RunState::Idle)),
        }
    }

    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// 現在の状態を取得
    pub fn state(&self) -> RunState {
        *self.state.lock().unwrap()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// バッチ実行を開始し、呼び出し元をブロックせずにハンドルを返す
    ///
    /// 実行中の多重開始は `BatchError::Busy` で同期的に拒否する。
    /// 事前検証の失敗は例外ではなく、ファイル処理ゼロのまま
    /// `Failed` の終端イベントとして通知される。
    pub fn start(&self, root_dir: &Path, tool_path: &Path) -> BatchResult<RunHandle> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(BatchError::busy());
        }

        *self.state.lock().unwrap() = RunState::Running;

        let cancel_flag = Arc::new(AtomicBool::new(false));
        let worker = BatchWorker {
            invoker: Arc::clone(&self.invoker),
            sink: Arc::clone(&self.sink),
            config: Arc::clone(&self.config),
            running: Arc::clone(&self.running),
            state: Arc::clone(&self.state),
            cancel_flag: Arc::clone(&cancel_flag),
            root_dir: root_dir.to_path_buf(),
            tool_path: tool_path.to_path_buf(),
        };

        let join = tokio::spawn(worker.run());
        Ok(RunHandle { cancel_flag, join })
    }
}

/// 実行中のバッチへの操作ハンドル
pub struct RunHandle {
    cancel_flag: Arc<AtomicBool>,
    join: tokio::task::JoinHandle<(BatchSummary, RunTermination)>,
}

impl RunHandle {
    /// 協調キャンセルを要求する
    ///
    /// フラグは項目の合間に確認される。起動済みの外部ツールは
    /// 完走させ、書きかけのファイルを残さない。
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }

    /// キャンセル要求だけを切り出したハンドルを取得
    ///
    /// `wait` がハンドルを消費するため、別タスク（シグナル監視など）
    /// からの停止要求にはこちらを渡す。
    pub fn canceller(&self) -> Canceller {
        Canceller {
            cancel_flag: Arc::clone(&self.cancel_flag),
        }
    }

    /// ワーカーの完了を待ち、最終サマリーと終端状態を返す
    pub async fn wait(self) -> BatchResult<(BatchSummary, RunTermination)> {
        self.join.await.map_err(BatchError::task)
    }
}

/// キャンセル要求専用のクローン可能なハンドル
#[derive(Clone)]
pub struct Canceller {
    cancel_flag: Arc<AtomicBool>,
}

impl Canceller {
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }
}

/// 1実行分のワーカー
struct BatchWorker<I, S> {
    invoker: Arc<I>,
    sink: Arc<S>,
    config: Arc<EmbedConfig>,
    running: Arc<AtomicBool>,
    state: Arc<Mutex<RunState>>,
    cancel_flag: Arc<AtomicBool>,
    root_dir: PathBuf,
    tool_path: PathBuf,
}

impl<I, S> BatchWorker<I, S>
where
    I: ToolInvoker + 'static,
    S: ProgressSink + 'static,
{
    async fn run(self) -> (BatchSummary, RunTermination) {
        if let Err(error) = self.preflight() {
            return self
                .finish(
                    BatchSummary::default(),
                    RunTermination::Failed {
                        reason: error.to_string(),
                    },
                )
                .await;
        }

        let locator = MediaPairLocator::new(&self.config);
        let mut summary = BatchSummary::default();
        let mut cancelled = false;

        for entry in locator.locate(&self.root_dir) {
            // キャンセルは項目の合間でのみ確認する
            if self.cancel_flag.load(Ordering::SeqCst) {
                cancelled = true;
                break;
            }

            match entry {
                PairResult::UnreadableSubtree { path, message } => {
                    self.sink
                        .deliver(BatchEvent::Diagnostic { path, message })
                        .await;
                }
                PairResult::Pair(pair) => {
                    let outcome = if pair.is_complete() {
                        self.invoker.invoke(&pair, &self.tool_path).await
                    } else {
                        InvocationOutcome::skipped(pair, SKIP_REASON_MISSING_SIDECAR)
                    };
                    summary.record(&outcome.status);
                    self.sink.deliver(BatchEvent::Progress(outcome)).await;
                }
            }
        }

        let termination = if cancelled {
            RunTermination::Cancelled
        } else {
            RunTermination::Completed
        };
        self.finish(summary, termination).await
    }

    /// 実行前の検証
    ///
    /// 対象ディレクトリの存在とツールの実行可能性は実行ごとに
    /// 1回だけ確認する（ファイルごとには行わない）。
    fn preflight(&self) -> BatchResult<()> {
        if !self.root_dir.is_dir() {
            return Err(BatchError::root_directory_missing(&self.root_dir));
        }
        if !is_executable_file(&self.tool_path) {
            return Err(BatchError::tool_not_executable(&self.tool_path));
        }
        Ok(())
    }

    /// 終端イベントを1回だけ配信し、状態を確定してワーカーを終える
    async fn finish(
        &self,
        summary: BatchSummary,
        termination: RunTermination,
    ) -> (BatchSummary, RunTermination) {
        self.sink
            .deliver(BatchEvent::Summary {
                summary: summary.clone(),
                termination: termination.clone(),
            })
            .await;

        *self.state.lock().unwrap() = match termination {
            RunTermination::Completed => RunState::Completed,
            RunTermination::Cancelled => RunState::Cancelled,
            RunTermination::Failed { .. } => RunState::Failed,
        };
        self.running.store(false, Ordering::SeqCst);

        (summary, termination)
    }
}

/// 実行可能な通常ファイルかどうか
pub fn is_executable_file(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

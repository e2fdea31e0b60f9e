// エンジン層 - バッチ実行のオーケストレーション
// ロケータとインボーカを組み合わせて高レベルな処理を提供

pub mod api;
pub mod batch;

// 公開API - 主要エンジンクラス
pub use api::{create_console_processor, create_quiet_processor, run_directory_with_processor};
pub use batch::{
    is_executable_file, BatchProcessor, Canceller, RunHandle, SKIP_REASON_MISSING_SIDECAR,
};

// 外部ツール起動の抽象化レイヤー
//
// 実プロセスを起動せずに成功・失敗・タイムアウトを再現できるよう、
// 起動はトレイトの背後に置く。

use crate::core::{InvocationOutcome, MediaSidecarPair};
use async_trait::async_trait;
use mockall::automock;
use std::path::Path;

pub mod exiftool;

pub use exiftool::ExifToolInvoker;

/// プロセスを起動できなかった場合の番兵終了コード
pub const EXIT_CODE_SPAWN_FAILED: i32 = -1;
/// タイムアウトで打ち切った場合の番兵終了コード
pub const EXIT_CODE_TIMED_OUT: i32 = -2;
/// シグナルで終了した場合の番兵終了コード
pub const EXIT_CODE_KILLED: i32 = -3;

/// 外部メタデータツールの起動を抽象化するトレイト
///
/// 1回の呼び出し＝1回のプロセス起動。結果は必ず `InvocationOutcome`
/// として分類され、バッチを中断させるエラーにはならない。
#[automock]
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// 完全ペア1件に対してツールを同期的に実行し、結果を分類する
    async fn invoke(&self, pair: &MediaSidecarPair, tool_path: &Path) -> InvocationOutcome;
}

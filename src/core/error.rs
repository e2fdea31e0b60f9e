// バッチ処理専用のカスタムエラー型定義

use std::path::PathBuf;
use thiserror::Error;

/// パイプライン固有のエラー型
///
/// ファイル単位の失敗はエラーではなく `InvocationOutcome` として
/// イベントストリームを流れる。ここに載るのは呼び出し元へ同期的に
/// 返す条件と、事前検証の失敗だけ。
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("バッチ実行中のため新しい実行を開始できません")]
    Busy,

    #[error("ツールが実行可能ではありません: {path}")]
    ToolNotExecutable { path: PathBuf },

    #[error("対象ディレクトリが存在しません: {path}")]
    RootDirectoryMissing { path: PathBuf },

    #[error("ワーカータスクエラー: {source}")]
    Task {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl BatchError {
    /// 多重実行エラーの作成
    pub fn busy() -> Self {
        Self::Busy
    }

    /// ツール実行不可エラーの作成
    pub fn tool_not_executable(path: impl Into<PathBuf>) -> Self {
        Self::ToolNotExecutable { path: path.into() }
    }

    /// 対象ディレクトリ消失エラーの作成
    pub fn root_directory_missing(path: impl Into<PathBuf>) -> Self {
        Self::RootDirectoryMissing { path: path.into() }
    }

    /// ワーカー待機失敗エラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::Task { source }
    }
}

impl From<tokio::task::JoinError> for BatchError {
    fn from(error: tokio::task::JoinError) -> Self {
        BatchError::Task { source: error }
    }
}

/// バッチ処理の結果型
pub type BatchResult<T> = std::result::Result<T, BatchError>;

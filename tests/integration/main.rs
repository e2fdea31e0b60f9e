// 統合テストハーネス
#![cfg(unix)]

mod test_cancellation;
mod test_end_to_end;

// exiftool実行ファイルのPATH探索
//
// パイプライン本体はツールを探さない。ここはエントリ層が使う
// 外部コラボレータで、明示指定が無い場合のフォールバックになる。

use std::path::{Path, PathBuf};

/// 探索対象のツール名（拡張子を除いたファイル名で比較する）
pub const TOOL_STEM: &str = "exiftool";

/// PATHの各ディレクトリからexiftoolを探し、最初に見つかったものを返す
///
/// Windowsの `exiftool.exe` も拾えるよう、拡張子を除いた名前で比較する。
pub fn find_exiftool_in_path() -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    find_tool_in_dirs(std::env::split_paths(&path_var))
}

/// ディレクトリ列を順に調べる（探索順 = 引数の順）
pub fn find_tool_in_dirs(dirs: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    dirs.into_iter().find_map(|dir| find_tool_in_dir(&dir))
}

fn find_tool_in_dir(dir: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(stem) = path.file_stem() {
            if stem.to_string_lossy() == TOOL_STEM {
                return Some(path);
            }
        }
    }
    None
}

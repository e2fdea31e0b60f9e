use crate::engine::is_executable_file;
use crate::toolfind::find_exiftool_in_path;
use anyhow::Result;
use std::path::PathBuf;

/// Execute the tool-resolution check
pub async fn execute_locate(explicit: Option<PathBuf>) -> Result<()> {
    let resolved = match explicit {
        Some(path) => {
            println!("🔧 指定されたパスを確認します");
            path
        }
        None => find_exiftool_in_path()
            .ok_or_else(|| anyhow::anyhow!("exiftool not found on PATH, use --exiftool"))?,
    };

    println!("🔧 exiftool: {}", resolved.display());

    if is_executable_file(&resolved) {
        println!("✅ 実行可能です");
        Ok(())
    } else {
        anyhow::bail!("実行可能ではありません: {}", resolved.display());
    }
}

use crate::core::{EmbedConfig, PairResult};
use crate::locator::MediaPairLocator;
use anyhow::Result;
use std::path::PathBuf;

/// Execute the pairing dry-run: list what the batch would process
pub async fn execute_pairs(target_directory: PathBuf) -> Result<()> {
    if !target_directory.exists() {
        anyhow::bail!(
            "Target directory does not exist: {}",
            target_directory.display()
        );
    }

    if !target_directory.is_dir() {
        anyhow::bail!(
            "Target path is not a directory: {}",
            target_directory.display()
        );
    }

    println!("🔍 ペアリング検査: {}", target_directory.display());

    let locator = MediaPairLocator::new(&EmbedConfig::default());
    let mut complete = 0usize;
    let mut missing = 0usize;
    let mut diagnostics = 0usize;

    for entry in locator.locate(&target_directory) {
        match entry {
            PairResult::Pair(pair) if pair.is_complete() => {
                complete += 1;
                println!("📎 {}", pair.media_path.display());
            }
            PairResult::Pair(pair) => {
                missing += 1;
                println!("⏭️  {} (サイドカーなし)", pair.media_path.display());
            }
            PairResult::UnreadableSubtree { path, message } => {
                diagnostics += 1;
                eprintln!("⚠️  {} - {message}", path.display());
            }
        }
    }

    println!(
        "📊 ペア: {complete} / サイドカーなし: {missing} / 走査診断: {diagnostics}"
    );
    Ok(())
}

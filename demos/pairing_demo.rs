use anyhow::Result;
use exif_embed::{EmbedConfig, MediaPairLocator, PairResult};
use std::path::Path;

fn main() -> Result<()> {
    println!("=== MediaPairLocator 動作確認 ===\n");

    let target = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());
    let target = Path::new(&target);

    if !target.is_dir() {
        anyhow::bail!("ディレクトリを指定してください: {}", target.display());
    }

    println!("走査中: {}\n", target.display());

    let locator = MediaPairLocator::new(&EmbedConfig::default());
    let mut complete = 0;
    let mut missing = 0;

    for (i, entry) in locator.locate(target).enumerate() {
        match entry {
            PairResult::Pair(pair) => {
                if pair.is_complete() {
                    complete += 1;
                    println!("{:3}. 📎 {}", i + 1, pair.media_path.display());
                } else {
                    missing += 1;
                    println!("{:3}. ⏭️  {} (サイドカーなし)", i + 1, pair.media_path.display());
                }
            }
            PairResult::UnreadableSubtree { path, message } => {
                println!("{:3}. ⚠️  {} - {message}", i + 1, path.display());
            }
        }
    }

    println!("\n----------------------------------------");
    println!("ペア: {complete} / サイドカーなし: {missing}");

    Ok(())
}

// メディア/サイドカーのペアリング走査

use crate::core::{EmbedConfig, MediaSidecarPair, PairResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// ディレクトリツリーを走査してペアリング結果を生成するロケータ
///
/// 走査順はディレクトリごとのファイル名ソートで決定的。同じツリーに
/// 対して繰り返し呼んでも同一の順序になる。返されるシーケンスは
/// 遅延評価で、再利用はできない（再走査は `locate` の再呼び出し）。
pub struct MediaPairLocator {
    sidecar_suffix: String,
    media_extensions: Vec<String>,
}

impl MediaPairLocator {
    pub fn new(config: &EmbedConfig) -> Self {
        Self {
            sidecar_suffix: config.sidecar_suffix().to_string(),
            media_extensions: config.media_extensions().to_vec(),
        }
    }

    /// ツリーを走査し、ペアリング結果の遅延シーケンスを返す
    ///
    /// 読めないサブツリーは診断エントリとして流し、走査は継続する。
    pub fn locate(&self, root: &Path) -> impl Iterator<Item = PairResult> {
        let suffix = self.sidecar_suffix.clone();
        let extensions = self.media_extensions.clone();

        WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        return None;
                    }

                    let path = entry.path();
                    let extension = path.extension()?.to_string_lossy().to_lowercase();
                    if !extensions.iter().any(|e| e == &extension) {
                        return None;
                    }

                    let sidecar = sidecar_path_for(path, &suffix);
                    let pair = if sidecar.is_file() {
                        MediaSidecarPair::complete(path, sidecar)
                    } else {
                        MediaSidecarPair::incomplete(path)
                    };
                    Some(PairResult::Pair(pair))
                }
                Err(error) => {
                    let path = error
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| PathBuf::from(""));
                    Some(PairResult::UnreadableSubtree {
                        path,
                        message: error.to_string(),
                    })
                }
            })
    }
}

/// メディアファイル名全体にサフィックスを後置したサイドカーのパス
fn sidecar_path_for(media_path: &Path, suffix: &str) -> PathBuf {
    let mut name = media_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(suffix);
    media_path.with_file_name(name)
}

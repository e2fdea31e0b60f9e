use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "exif_embed")]
#[command(about = "Embed sidecar JSON metadata into exported media files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the embedding batch over an export directory
    Run {
        /// photos_and_videos directory of the export
        target_directory: PathBuf,

        /// Path to the exiftool executable (searched on PATH when omitted)
        #[arg(short, long)]
        exiftool: Option<PathBuf>,

        /// Per-file tool timeout in seconds (0 disables the timeout)
        #[arg(short, long, default_value = "60")]
        timeout: u64,

        /// Write a JSON run report to this path
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Suppress per-file progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// List media/sidecar pairing results without invoking the tool
    Pairs {
        /// Directory to inspect
        target_directory: PathBuf,
    },

    /// Resolve the exiftool executable and report what would be used
    Locate {
        /// Candidate path to check instead of searching PATH
        #[arg(short, long)]
        exiftool: Option<PathBuf>,
    },
}

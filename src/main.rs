use clap::Parser;
use exif_embed::cli::commands::run::RunOptions;
use exif_embed::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            target_directory,
            exiftool,
            timeout,
            report,
            quiet,
        } => {
            commands::run::execute_run(RunOptions {
                target_directory,
                exiftool,
                timeout,
                report,
                quiet,
            })
            .await
        }
        Commands::Pairs { target_directory } => commands::pairs::execute_pairs(target_directory).await,
        Commands::Locate { exiftool } => commands::locate::execute_locate(exiftool).await,
    };

    if let Err(error) = result {
        eprintln!("❌ エラー: {error}");
        std::process::exit(1);
    }
}

use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use gemchat::core::config::{self, CliOverrides, GemchatConfig};

#[derive(Parser)]
#[command(name = "gemchat", about = "Terminal chat client for Google Gemini")]
struct Args {
    /// Model to use (overrides config and GEMINI_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Delay between revealed words, in milliseconds
    #[arg(long)]
    reveal_ms: Option<u64>,

    /// Path of the JSON file that stores chats and the theme
    #[arg(long)]
    storage: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to gemchat.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("gemchat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: {e}. Using defaults.");
            log::warn!("Failed to load config: {}", e);
            GemchatConfig::default()
        }
    };

    let cli = CliOverrides {
        model: args.model,
        reveal_ms: args.reveal_ms,
        storage: args.storage,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!(
        "gemchat starting up with model {} (storage: {})",
        resolved.model_name,
        resolved.storage_path.display()
    );

    gemchat::tui::run(resolved)
}

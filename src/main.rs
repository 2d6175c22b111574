use anyhow::Result;
use clap::Parser;
use neighborhub::{cli, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file before anything else (silently ignore if missing)
    dotenvy::dotenv().ok();

    let cli_args = cli::Cli::parse();

    // [logging] section, with NEIGHBORHUB_LOG_LEVEL / NEIGHBORHUB_LOG_FILE applied
    let mut log_config = logging::LogConfig::new()
        .with_debug_mode(cli_args.debug)
        .with_settings(&cli::logging_settings(&cli_args));

    // Custom log directory from env
    if let Ok(log_dir) = std::env::var("NEIGHBORHUB_LOG_DIR") {
        log_config = log_config.with_log_dir(std::path::PathBuf::from(log_dir));
    }
    let log_dir = log_config.log_dir().to_path_buf();

    let _guard = logging::init_logging(log_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    // Keep the last 7 days of debug logs
    if cli_args.debug
        && let Ok(removed) = logging::cleanup_old_logs(&log_dir, 7)
        && removed > 0
    {
        tracing::info!("Cleaned up {} old log file(s)", removed);
    }

    cli::run(cli_args).await
}

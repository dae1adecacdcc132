//! Subtitle Service
//!
//! Entry point: loads configuration, sets up logging and either serves the
//! HTTP API or runs one of the local maintenance commands.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use subtitle_service::cli::{Args, Commands};
use subtitle_service::config::{Config, LoggingConfig};
use subtitle_service::server::{run_server, AppState};
use subtitle_service::transcribe::{check_in_worker, transcribe_in_worker, SubtitleToolFactory};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = Config::locate(args.config.as_deref());
    let mut config = Config::load(config_path.as_deref())?;
    let _log_guard = setup_logging(args.verbose, &config.logging)?;

    match &config_path {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }
    info!(
        "Transcriber - tool: {}, model: {}, device: {}",
        config.transcriber.binary_path, config.transcriber.model, config.transcriber.device
    );

    match args.command.unwrap_or_else(Commands::default_command) {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let tool = SubtitleToolFactory::create_tool(config.transcriber.clone());
            let state = AppState::new(tool, config.transcriber.clone());
            run_server(&config.server, state).await?;
        }
        Commands::Transcribe { input, output } => {
            info!("Transcribing video: {}", input.display());

            let tool = SubtitleToolFactory::create_tool(config.transcriber.clone());
            let subtitles = transcribe_in_worker(tool, input).await?;

            match output {
                Some(path) => {
                    tokio::fs::write(&path, &subtitles).await?;
                    info!("Subtitles written to {}", path.display());
                }
                None => print!("{}", subtitles),
            }
        }
        Commands::Check => {
            let tool = SubtitleToolFactory::create_tool(config.transcriber.clone());
            check_in_worker(tool).await?;
            println!("{} is available", config.transcriber.binary_path);
        }
        Commands::InitConfig { output } => {
            if output.exists() {
                anyhow::bail!("{} already exists", output.display());
            }
            Config::default().save_to_file(&output)?;
            println!("Default configuration written to {}", output.display());
        }
    }

    Ok(())
}

/// `RUST_LOG` when set, otherwise everything at `log_level` and above
fn log_filter(log_level: Level, rust_log: Option<&str>) -> EnvFilter {
    match rust_log.map(str::trim).filter(|directives| !directives.is_empty()) {
        Some(directives) => EnvFilter::builder().parse_lossy(directives),
        None => EnvFilter::default().add_directive(log_level.into()),
    }
}

/// Console logging, plus a daily rolling file when a log directory is configured
fn setup_logging(verbose: bool, logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true);

    let (file_layer, guard) = match &logging.directory {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = rolling::daily(log_dir, "subtitle-service.log");
            let (non_blocking_file, guard) = non_blocking(file_appender);

            let layer = fmt::layer()
                .with_writer(non_blocking_file)
                .with_target(false)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(log_filter(log_level, std::env::var("RUST_LOG").ok().as_deref()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    match &logging.directory {
        Some(log_dir) => info!(
            "Logging initialized - console: {}, file: {}",
            log_level,
            log_dir.join("subtitle-service.log").display()
        ),
        None => info!("Logging initialized - console: {}", log_level),
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn rust_log_level_wins_over_default() {
        let filter = log_filter(Level::INFO, Some("warn"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn verbose_applies_without_rust_log() {
        assert_eq!(log_filter(Level::DEBUG, None).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(Level::INFO, Some("  ")).max_level_hint(), Some(LevelFilter::INFO));
    }
}

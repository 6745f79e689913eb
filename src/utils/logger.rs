use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::settings::LoggingConfig;

/// Installs the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. With a log
/// directory configured, output goes to a timestamped file in it; otherwise
/// to stderr.
pub fn init_logger(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false);

    match &config.directory {
        Some(log_dir) => {
            let log_file = log_file_path(log_dir, &config.file_prefix)?;
            let file = fs::File::create(&log_file)
                .with_context(|| format!("Failed to create log file {}", log_file))?;
            let subscriber = builder.with_ansi(false).with_writer(file).finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Failed to install tracing subscriber")?;
            info!("Logger initialized, writing to {}", log_file);
        }
        None => {
            let subscriber = builder.with_writer(std::io::stderr).finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Failed to install tracing subscriber")?;
            info!("Logger initialized, writing to stderr");
        }
    }

    Ok(())
}

/// Creates the log directory if needed and returns a timestamped file path in it
fn log_file_path(log_dir: &str, prefix: &str) -> Result<String> {
    if !Path::new(log_dir).exists() {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir))?;
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    Ok(format!("{}/{}_{}.log", log_dir, prefix, timestamp))
}

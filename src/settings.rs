use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::experiment::{ExperimentRecord, StaticProvider};

/// Prefix for environment overrides, e.g. `EXPERIMENT_URL__LOGGING__LEVEL=debug`
pub const ENV_PREFIX: &str = "EXPERIMENT_URL";

/// Configuration for hosts embedding the rewriter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RewriterConfig {
    /// Logging setup, see [`init_logger`](crate::utils::logger::init_logger)
    pub logging: LoggingConfig,

    /// Fixed experiments for hosts without a live experimentation runtime
    pub experiments: Vec<ExperimentRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,

    /// Directory for log files (stderr if None)
    pub directory: Option<String>,

    /// Log file name prefix
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "experiment_url".to_string(),
        }
    }
}

impl RewriterConfig {
    /// Loads configuration from an optional file, then environment overrides
    ///
    /// The file format follows its extension (toml, json, yaml...). A missing
    /// file is not an error.
    pub fn load(path: &str) -> Result<Self> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .with_context(|| format!("Failed to load configuration from {}", path))?
            .try_deserialize()
            .context("Invalid rewriter configuration")
    }

    /// Provider backed by the configured experiments, if there are any
    pub fn static_provider(&self) -> Result<Option<StaticProvider>> {
        if self.experiments.is_empty() {
            return Ok(None);
        }
        StaticProvider::from_records(&self.experiments).map(Some)
    }
}

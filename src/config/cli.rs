//! Command-line flags.
//!
//! Flags override whatever the optional TOML file sets. The underscore
//! spellings (`--config_path`) are accepted so existing service units keep
//! working.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::ExporterConfig;
use crate::config::validation::validate_config;

/// GRE tunnel packet-loss exporter
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "tunnel-loss-exporter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory with tunnel definitions
    #[arg(long, alias = "config_path")]
    pub config_path: Option<PathBuf>,

    /// Seconds between reconciliation cycles
    #[arg(long, alias = "polling_interval_seconds")]
    pub polling_interval_seconds: Option<u64>,

    /// Metrics endpoint port
    #[arg(long, alias = "exporter_port")]
    pub exporter_port: Option<u16>,

    /// Number of probe workers
    #[arg(long, alias = "max_workers")]
    pub max_workers: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Load the file (if any), apply flag overrides, validate the result.
    pub fn into_config(self) -> Result<ExporterConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ExporterConfig::default(),
        };
        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    fn apply(self, config: &mut ExporterConfig) {
        if let Some(path) = self.config_path {
            config.tunnels.config_path = path;
        }
        if let Some(secs) = self.polling_interval_seconds {
            config.scheduler.polling_interval_secs = secs;
        }
        if let Some(port) = self.exporter_port {
            config.observability.exporter_port = port;
        }
        if let Some(workers) = self.max_workers {
            config.scheduler.max_workers = workers;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
    }
}

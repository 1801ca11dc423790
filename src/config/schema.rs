//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the exporter.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the exporter.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ExporterConfig {
    /// Where tunnel definitions live and how they are recognised.
    pub tunnels: TunnelsConfig,

    /// Reconciliation interval and worker pool size.
    pub scheduler: SchedulerConfig,

    /// Reachability probe settings.
    pub probe: ProbeConfig,

    /// Logging and metrics exposition.
    pub observability: ObservabilityConfig,
}

/// Tunnel definition discovery.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TunnelsConfig {
    /// Directory holding the definitions.
    pub config_path: PathBuf,

    /// Definition file names start with this.
    pub file_prefix: String,

    /// Definition file names end with this.
    pub file_suffix: String,

    /// `auto` interface names must start with this, followed by digits or '-'.
    pub interface_prefix: String,
}

impl Default for TunnelsConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("/etc/network/interfaces.d/"),
            file_prefix: "gre".to_string(),
            file_suffix: ".conf".to_string(),
            interface_prefix: "gre".to_string(),
        }
    }
}

/// Polling scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between reconciliation cycles.
    pub polling_interval_secs: u64,

    /// Number of probe workers.
    pub max_workers: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            polling_interval_secs: 5,
            max_workers: 9,
        }
    }
}

/// ICMP probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Ping executable.
    pub command: String,

    /// Echo requests per probe.
    pub count: u32,

    /// Upper bound on a single ping invocation in seconds.
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            command: "ping".to_string(),
            count: 5,
            timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Host the metrics endpoint binds to.
    pub metrics_host: String,

    /// Port of the metrics endpoint.
    pub exporter_port: u16,
}

impl ObservabilityConfig {
    /// `host:port` of the metrics endpoint.
    pub fn metrics_address(&self) -> String {
        format!("{}:{}", self.metrics_host, self.exporter_port)
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_host: "0.0.0.0".to_string(),
            exporter_port: 9698,
        }
    }
}

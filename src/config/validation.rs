//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (interval > 0, workers > 0, port valid)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ExporterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::ExporterConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("scheduler.polling_interval_secs must be greater than zero")]
    ZeroPollingInterval,

    #[error("scheduler.max_workers must be greater than zero")]
    ZeroWorkers,

    #[error("probe.count must be greater than zero")]
    ZeroProbeCount,

    #[error("probe.timeout_secs must be greater than zero")]
    ZeroProbeTimeout,

    #[error("probe.command must not be empty")]
    EmptyProbeCommand,

    #[error("observability.exporter_port must not be zero")]
    ZeroPort,

    #[error("tunnels.file_prefix must not be empty")]
    EmptyFilePrefix,

    #[error("tunnels.interface_prefix must not be empty")]
    EmptyInterfacePrefix,
}

pub fn validate_config(config: &ExporterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.scheduler.polling_interval_secs == 0 {
        errors.push(ValidationError::ZeroPollingInterval);
    }
    if config.scheduler.max_workers == 0 {
        errors.push(ValidationError::ZeroWorkers);
    }
    if config.probe.count == 0 {
        errors.push(ValidationError::ZeroProbeCount);
    }
    if config.probe.timeout_secs == 0 {
        errors.push(ValidationError::ZeroProbeTimeout);
    }
    if config.probe.command.trim().is_empty() {
        errors.push(ValidationError::EmptyProbeCommand);
    }
    if config.observability.exporter_port == 0 {
        errors.push(ValidationError::ZeroPort);
    }
    if config.tunnels.file_prefix.is_empty() {
        errors.push(ValidationError::EmptyFilePrefix);
    }
    if config.tunnels.interface_prefix.is_empty() {
        errors.push(ValidationError::EmptyInterfacePrefix);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

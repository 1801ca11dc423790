//! Reachability probing.
//!
//! # Responsibilities
//! - Measure packet loss towards a single address
//! - Report failures as values, never panic
//!
//! # Design Decisions
//! - `Prober` is the seam between the scheduler and the outside world;
//!   workers hold an `Arc<dyn Prober>` so tests can substitute doubles
//! - Timeouts belong to the prober implementation, not the scheduler

pub mod ping;

use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use ping::PingProber;

/// Why a loss measurement could not be taken.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to run probe command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("probe timed out after {0:?}")]
    Timeout(Duration),

    #[error("no packet loss figure in probe output: {0:?}")]
    Unparseable(String),

    #[error("packet loss {0} outside 0-100")]
    OutOfRange(f64),
}

/// Measures packet loss percentage towards an address.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Loss in percent, 0.0 to 100.0.
    async fn measure_loss(&self, address: Ipv4Addr) -> Result<f64, ProbeError>;
}

//! GRE tunnel packet-loss exporter library.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod scheduler;
pub mod tunnel;

pub use config::schema::ExporterConfig;
pub use lifecycle::Shutdown;
pub use scheduler::{DispatchQueue, ReconciliationLoop, WorkerPool};
pub use tunnel::{Target, TargetResolver};

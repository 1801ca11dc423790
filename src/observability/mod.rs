//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (loss and bookkeeping gauges)
//!
//! Consumers:
//!     → journald / stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields (interface, address) on every per-target log line
//! - Gauges are the product, logs explain missing or stale gauges

pub mod logging;
pub mod metrics;

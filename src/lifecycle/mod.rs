//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse flags → Load config → Logging → Metrics endpoint
//!     → Worker pool → Reconciliation loop
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Loop stops after its current drain → Workers exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: metrics endpoint first, so scrapes work from the first cycle
//! - No forced deadline: a worker in the middle of a probe is simply dropped

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownListener};

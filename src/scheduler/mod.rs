//! Polling scheduler.
//!
//! # Data Flow
//! ```text
//! reconcile.rs (every polling interval)
//!     → TargetResolver::resolve
//!     → queue.rs (push all targets)
//!     → sleep
//!     → queue.rs (drain leftovers)
//!
//! pool.rs (N workers, forever)
//!     → queue.rs (pop one target)
//!     → Prober (outside + inside)
//!     → MetricsSink (loss gauges)
//! ```
//!
//! # Design Decisions
//! - The queue and the sink are the only shared state
//! - Draining sheds load instead of letting the backlog grow
//! - No ordering between workers; each worker handles one target at a time

pub mod pool;
pub mod queue;
pub mod reconcile;

pub use pool::{probe_target, ProbeOutcome, WorkerPool};
pub use queue::DispatchQueue;
pub use reconcile::{CycleReport, Phase, ReconciliationLoop};

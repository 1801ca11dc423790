//! Reconciliation loop.
//!
//! # States
//! ```text
//! resolving → dispatching → waiting → draining → resolving ...
//! ```
//!
//! Every cycle starts from a fresh resolution. Whatever the workers did not
//! reach during `waiting` is dropped in `draining`, so the queue never holds
//! more than one cycle of targets.

use std::sync::Arc;
use std::time::Duration;

use tokio::{task, time};

use crate::lifecycle::ShutdownListener;
use crate::observability::metrics::MetricsSink;
use crate::scheduler::queue::DispatchQueue;
use crate::tunnel::{Resolution, TargetResolver};

/// Phase of the reconciliation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Resolving,
    Dispatching,
    Waiting,
    Draining,
}

/// Summary of one completed cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub resolved: usize,
    pub unprocessed: usize,
    pub drained: usize,
}

/// Drives resolve → dispatch → wait → drain for the process lifetime.
pub struct ReconciliationLoop {
    resolver: TargetResolver,
    queue: Arc<DispatchQueue>,
    sink: Arc<dyn MetricsSink>,
    interval: Duration,
}

impl ReconciliationLoop {
    pub fn new(
        resolver: TargetResolver,
        queue: Arc<DispatchQueue>,
        sink: Arc<dyn MetricsSink>,
        interval: Duration,
    ) -> Self {
        Self {
            resolver,
            queue,
            sink,
            interval,
        }
    }

    /// Run cycles until shutdown. Returns the number of completed cycles.
    pub async fn run(self, mut shutdown: ShutdownListener) -> u64 {
        tracing::info!(
            path = %self.resolver.config_root().display(),
            interval_secs = self.interval.as_secs_f64(),
            "Reconciliation loop starting"
        );

        let mut cycles = 0;
        while !shutdown.is_triggered() {
            let resolved = self.resolve_and_dispatch().await;

            self.log_phase(Phase::Waiting);
            let stopped = tokio::select! {
                _ = time::sleep(self.interval) => false,
                _ = shutdown.recv() => true,
            };

            let report = self.finish_cycle(resolved);
            cycles += 1;
            tracing::debug!(cycle = cycles, ?report, "Cycle complete");

            if stopped {
                break;
            }
        }

        tracing::info!(cycles, "Reconciliation loop stopped");
        cycles
    }

    /// One full cycle, including the interval sleep.
    pub async fn cycle(&self) -> CycleReport {
        let resolved = self.resolve_and_dispatch().await;
        self.log_phase(Phase::Waiting);
        time::sleep(self.interval).await;
        self.finish_cycle(resolved)
    }

    /// Resolving and dispatching phases.
    pub async fn resolve_and_dispatch(&self) -> CycleReport {
        self.log_phase(Phase::Resolving);
        let resolution = self.resolve().await;
        let unprocessed = resolution.unprocessed_count();
        self.sink.set_unprocessed(unprocessed);
        if unprocessed > 0 {
            tracing::warn!(
                count = unprocessed,
                files = ?resolution.unprocessed,
                "Some tunnel definitions were not processed"
            );
        }

        self.log_phase(Phase::Dispatching);
        let resolved = self.queue.extend(resolution.targets);

        CycleReport {
            resolved,
            unprocessed,
            drained: 0,
        }
    }

    /// Directory reads run on the blocking pool. A panicked resolution
    /// counts as an empty one.
    async fn resolve(&self) -> Resolution {
        let resolver = self.resolver.clone();
        match task::spawn_blocking(move || resolver.resolve()).await {
            Ok(resolution) => resolution,
            Err(e) => {
                tracing::error!(error = %e, "Target resolution task failed");
                Resolution::default()
            }
        }
    }

    /// Draining phase; completes the report started by `resolve_and_dispatch`.
    pub fn finish_cycle(&self, mut report: CycleReport) -> CycleReport {
        self.log_phase(Phase::Draining);
        report.drained = self.queue.drain();
        if report.drained > 0 {
            tracing::warn!(
                drained = report.drained,
                resolved = report.resolved,
                "Workers fell behind, discarding unprobed targets"
            );
        }
        self.sink.set_cycle_stats(report.resolved, report.drained);
        report
    }

    fn log_phase(&self, phase: Phase) {
        tracing::trace!(?phase, queued = self.queue.len(), "Reconciliation phase");
    }
}

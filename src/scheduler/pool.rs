//! Fixed-size probe worker pool.
//!
//! # Responsibilities
//! - Take one target at a time from the dispatch queue
//! - Probe the outside and inside address
//! - Write whichever loss figures were obtained
//!
//! # Design Decisions
//! - Workers are identical, stateless tasks spawned once per index
//! - A stuck probe blocks only its own worker; the pool never grows
//! - Probe failures are per direction and never end the worker

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::lifecycle::ShutdownListener;
use crate::observability::metrics::{Direction, MetricsSink};
use crate::probe::Prober;
use crate::scheduler::queue::DispatchQueue;
use crate::tunnel::Target;

/// What happened to one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeOutcome {
    pub outside: Option<f64>,
    pub inside: Option<f64>,
}

/// Handles of the running workers.
#[derive(Debug)]
pub struct WorkerPool {
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Start `size` workers draining `queue`.
    pub fn spawn(
        size: usize,
        queue: Arc<DispatchQueue>,
        prober: Arc<dyn Prober>,
        sink: Arc<dyn MetricsSink>,
        shutdown: ShutdownListener,
    ) -> Self {
        let workers = (0..size)
            .map(|id| {
                let worker = Worker {
                    id,
                    queue: queue.clone(),
                    prober: prober.clone(),
                    sink: sink.clone(),
                };
                tokio::spawn(worker.run(shutdown.clone()))
            })
            .collect();

        tracing::info!(workers = size, "Worker pool started");
        Self { workers }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Workers that have not exited.
    pub fn running(&self) -> usize {
        self.workers.iter().filter(|w| !w.is_finished()).count()
    }

    /// Wait for every worker to exit.
    pub async fn join(self) {
        for worker in self.workers {
            if let Err(e) = worker.await {
                if e.is_panic() {
                    tracing::error!(error = %e, "Worker panicked");
                }
            }
        }
    }

    /// Stop workers immediately, abandoning in-flight probes.
    pub fn abort(&self) {
        for worker in &self.workers {
            worker.abort();
        }
    }
}

struct Worker {
    id: usize,
    queue: Arc<DispatchQueue>,
    prober: Arc<dyn Prober>,
    sink: Arc<dyn MetricsSink>,
}

impl Worker {
    async fn run(self, mut shutdown: ShutdownListener) {
        tracing::debug!(worker = self.id, "Worker started");
        loop {
            let target = tokio::select! {
                target = self.queue.pop() => target,
                _ = shutdown.recv() => break,
            };
            probe_target(&target, self.prober.as_ref(), self.sink.as_ref()).await;
        }
        tracing::debug!(worker = self.id, "Worker stopped");
    }
}

/// Probe both directions of `target` and record the results.
///
/// Both probes finish before anything is written.
pub async fn probe_target(target: &Target, prober: &dyn Prober, sink: &dyn MetricsSink) -> ProbeOutcome {
    let (outside, inside) = tokio::join!(
        measure(target, Direction::Outside, prober),
        measure(target, Direction::Inside, prober),
    );

    if let Some(loss) = outside {
        sink.set_loss(Direction::Outside, target, loss);
    }
    if let Some(loss) = inside {
        sink.set_loss(Direction::Inside, target, loss);
    }

    tracing::debug!(
        interface = %target.interface_name,
        outside = ?outside,
        inside = ?inside,
        "Probed tunnel"
    );

    ProbeOutcome { outside, inside }
}

async fn measure(target: &Target, direction: Direction, prober: &dyn Prober) -> Option<f64> {
    let address = direction.address(target);
    match prober.measure_loss(address).await {
        Ok(loss) => Some(loss),
        Err(e) => {
            tracing::warn!(
                interface = %target.interface_name,
                direction = ?direction,
                address = %address,
                error = %e,
                "Probe failed, keeping previous value"
            );
            None
        }
    }
}

//! GRE tunnel packet-loss exporter.
//!
//! # Architecture Overview
//!
//! ```text
//!   interfaces.d/gre*.conf
//!           │
//!           ▼
//!   ┌────────────────┐  every interval   ┌───────────────┐
//!   │ TargetResolver │◀──────────────────│ Reconciliation│
//!   └────────────────┘                   │     loop      │
//!                                        └──────┬────────┘
//!                                  push / drain │
//!                                               ▼
//!                                       ┌───────────────┐
//!                                       │ DispatchQueue │
//!                                       └──────┬────────┘
//!                                         pop  │
//!                                              ▼
//!   ┌──────────┐   ping -c N   ┌──────────────────────────┐
//!   │  remote  │◀──────────────│  WorkerPool (N workers)  │
//!   │  / peer  │               └────────────┬─────────────┘
//!   └──────────┘                            │ set gauges
//!                                           ▼
//!                                  ┌─────────────────┐
//!                                  │ /metrics (9698) │
//!                                  └─────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use tunnel_loss_exporter::config::Cli;
use tunnel_loss_exporter::lifecycle::{signals, Shutdown};
use tunnel_loss_exporter::observability::{logging, metrics};
use tunnel_loss_exporter::probe::PingProber;
use tunnel_loss_exporter::scheduler::{DispatchQueue, ReconciliationLoop, WorkerPool};
use tunnel_loss_exporter::tunnel::TargetResolver;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!("tunnel-loss-exporter v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_path = %config.tunnels.config_path.display(),
        polling_interval_secs = config.scheduler.polling_interval_secs,
        max_workers = config.scheduler.max_workers,
        ping_count = config.probe.count,
        "Configuration loaded"
    );

    let metrics_addr: SocketAddr = config.observability.metrics_address().parse()?;
    metrics::init_metrics(metrics_addr)?;

    let shutdown = Shutdown::new();
    let queue = Arc::new(DispatchQueue::new());
    let sink = Arc::new(metrics::PrometheusSink::new());
    let prober = Arc::new(PingProber::new(&config.probe));

    let pool = WorkerPool::spawn(
        config.scheduler.max_workers,
        queue.clone(),
        prober,
        sink.clone(),
        shutdown.subscribe(),
    );

    let reconcile = ReconciliationLoop::new(
        TargetResolver::new(config.tunnels.clone()),
        queue,
        sink,
        Duration::from_secs(config.scheduler.polling_interval_secs),
    );
    let reconcile_task = tokio::spawn(reconcile.run(shutdown.subscribe()));

    signals::wait_for_termination().await;
    shutdown.trigger();

    if let Err(e) = reconcile_task.await {
        tracing::error!(error = %e, "Reconciliation loop ended abnormally");
    }
    // In-flight probes are not worth waiting for.
    pool.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}

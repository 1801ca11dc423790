//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define the exported gauge families
//! - Expose Prometheus-compatible metrics endpoint
//! - Provide the sink seam workers and the loop write through
//!
//! # Metrics
//! - `outside_state` (gauge): loss % to the remote transport address
//! - `inside_state` (gauge): loss % to the peer inside the tunnel
//! - `unprocessed_files` (gauge): definitions that could not be used
//! - `tunnel_exporter_targets_resolved` (gauge): targets in the last cycle
//! - `tunnel_exporter_targets_drained` (gauge): targets shed by the last drain
//!
//! # Design Decisions
//! - Family and label names are kept stable for existing dashboards
//! - `unprocessed_files` is a bare count; file names go to the log
//! - Sinks synchronize internally, callers never lock

use std::net::{Ipv4Addr, SocketAddr};

use dashmap::DashMap;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use parking_lot::Mutex;

use crate::tunnel::Target;

pub const OUTSIDE_STATE: &str = "outside_state";
pub const INSIDE_STATE: &str = "inside_state";
pub const UNPROCESSED_FILES: &str = "unprocessed_files";
pub const TARGETS_RESOLVED: &str = "tunnel_exporter_targets_resolved";
pub const TARGETS_DRAINED: &str = "tunnel_exporter_targets_drained";

/// Which side of a tunnel a loss figure describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Remote transport address.
    Outside,
    /// Peer address inside the tunnel.
    Inside,
}

impl Direction {
    /// Address probed for this direction.
    pub fn address(self, target: &Target) -> Ipv4Addr {
        match self {
            Direction::Outside => target.remote_address,
            Direction::Inside => target.internal_peer_address,
        }
    }

    pub fn metric_name(self) -> &'static str {
        match self {
            Direction::Outside => OUTSIDE_STATE,
            Direction::Inside => INSIDE_STATE,
        }
    }

    fn address_label(self) -> &'static str {
        match self {
            Direction::Outside => "remote_gre_ip",
            Direction::Inside => "internal_dest_gre_ip",
        }
    }
}

/// Destination for exporter measurements.
pub trait MetricsSink: Send + Sync {
    /// Set the loss gauge for one direction of a target.
    fn set_loss(&self, direction: Direction, target: &Target, loss: f64);

    /// Set the number of definitions that could not be used.
    fn set_unprocessed(&self, count: usize);

    /// Record how many targets a cycle resolved and how many it shed.
    fn set_cycle_stats(&self, resolved: usize, drained: usize);
}

/// Sink backed by the global `metrics` recorder.
#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

impl PrometheusSink {
    pub fn new() -> Self {
        describe();
        Self
    }
}

impl Default for PrometheusSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink for PrometheusSink {
    fn set_loss(&self, direction: Direction, target: &Target, loss: f64) {
        metrics::gauge!(
            direction.metric_name(),
            "gre_interface_name" => target.interface_name.clone(),
            "local_gre_ip" => target.local_address.to_string(),
            direction.address_label() => direction.address(target).to_string(),
            "remote_gre_hostname" => target.remote_hostname.clone()
        )
        .set(loss);
    }

    fn set_unprocessed(&self, count: usize) {
        metrics::gauge!(UNPROCESSED_FILES).set(count as f64);
    }

    fn set_cycle_stats(&self, resolved: usize, drained: usize) {
        metrics::gauge!(TARGETS_RESOLVED).set(resolved as f64);
        metrics::gauge!(TARGETS_DRAINED).set(drained as f64);
    }
}

/// Register descriptions with the installed recorder.
pub fn describe() {
    metrics::describe_gauge!(OUTSIDE_STATE, "Packet loss % to the remote tunnel endpoint");
    metrics::describe_gauge!(INSIDE_STATE, "Packet loss % to the peer inside the tunnel");
    metrics::describe_gauge!(UNPROCESSED_FILES, "Count of unprocessed files");
    metrics::describe_gauge!(TARGETS_RESOLVED, "Targets resolved in the last cycle");
    metrics::describe_gauge!(TARGETS_DRAINED, "Targets discarded unprobed in the last cycle");
}

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within the tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Label tuple of a loss gauge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LossKey {
    pub direction: Direction,
    pub interface_name: String,
    pub local_address: Ipv4Addr,
    pub address: Ipv4Addr,
    pub remote_hostname: String,
}

impl LossKey {
    pub fn new(direction: Direction, target: &Target) -> Self {
        Self {
            direction,
            interface_name: target.interface_name.clone(),
            local_address: target.local_address,
            address: direction.address(target),
            remote_hostname: target.remote_hostname.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Recorded {
    value: f64,
    writes: usize,
}

/// In-process sink keeping the latest value and write count per series.
#[derive(Debug, Default)]
pub struct InMemorySink {
    losses: DashMap<LossKey, Recorded>,
    unprocessed: Mutex<Option<usize>>,
    cycles: Mutex<Option<(usize, usize)>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loss(&self, direction: Direction, target: &Target) -> Option<f64> {
        self.losses
            .get(&LossKey::new(direction, target))
            .map(|r| r.value)
    }

    /// How many times the series was set.
    pub fn writes(&self, direction: Direction, target: &Target) -> usize {
        self.losses
            .get(&LossKey::new(direction, target))
            .map(|r| r.writes)
            .unwrap_or(0)
    }

    /// Total writes across every loss series.
    pub fn total_writes(&self) -> usize {
        self.losses.iter().map(|r| r.value().writes).sum()
    }

    pub fn series_count(&self) -> usize {
        self.losses.len()
    }

    pub fn unprocessed(&self) -> Option<usize> {
        *self.unprocessed.lock()
    }

    /// `(resolved, drained)` of the last recorded cycle.
    pub fn cycle_stats(&self) -> Option<(usize, usize)> {
        *self.cycles.lock()
    }
}

impl MetricsSink for InMemorySink {
    fn set_loss(&self, direction: Direction, target: &Target, loss: f64) {
        self.losses
            .entry(LossKey::new(direction, target))
            .and_modify(|r| {
                r.value = loss;
                r.writes += 1;
            })
            .or_insert(Recorded { value: loss, writes: 1 });
    }

    fn set_unprocessed(&self, count: usize) {
        *self.unprocessed.lock() = Some(count);
    }

    fn set_cycle_stats(&self, resolved: usize, drained: usize) {
        *self.cycles.lock() = Some((resolved, drained));
    }
}

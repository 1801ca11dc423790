//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tunnel_loss_exporter::probe::{ProbeError, Prober};
use tunnel_loss_exporter::tunnel::Target;

/// Declarations of one tunnel definition; `None` leaves the line out.
#[derive(Debug, Clone)]
pub struct Definition {
    pub interface: Option<String>,
    pub address: Option<String>,
    pub netmask: Option<String>,
    pub remote: Option<String>,
    pub hostname: Option<String>,
}

impl Definition {
    /// A complete /30 tunnel numbered `n`.
    pub fn numbered(n: u8) -> Self {
        Self {
            interface: Some(format!("gre-{}", n)),
            address: Some(format!("10.{}.0.1", n)),
            netmask: Some("255.255.255.252".to_string()),
            remote: Some(format!("192.0.2.{}", n)),
            hostname: Some(format!("edge-{}.example.net", n)),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(iface) = &self.interface {
            out.push_str(&format!("auto {}\niface {} inet tunnel\n", iface, iface));
        }
        if let Some(address) = &self.address {
            out.push_str(&format!("    address {}\n", address));
        }
        if let Some(netmask) = &self.netmask {
            out.push_str(&format!("    netmask {}\n", netmask));
        }
        out.push_str("    mode gre\n");
        if let Some(remote) = &self.remote {
            out.push_str(&format!("    remote {}\n", remote));
        }
        out.push_str("    ttl 255\n");
        if let Some(hostname) = &self.hostname {
            out.push_str(&format!("# remote: {}\n", hostname));
        }
        out
    }

    pub fn write(&self, dir: &Path, file_name: &str) {
        std::fs::write(dir.join(file_name), self.render()).unwrap();
    }
}

/// Build a /30 target directly, without touching the filesystem.
pub fn target(n: u8) -> Target {
    Target::new(
        format!("gre-{}", n),
        Ipv4Addr::new(10, n, 0, 1),
        Ipv4Addr::new(192, 0, 2, n),
        format!("edge-{}.example.net", n),
        Ipv4Addr::new(255, 255, 255, 252),
    )
    .unwrap()
}

/// How a [`FakeProber`] answers for a given address.
#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    Loss(f64),
    Fail,
    Hang,
}

/// Scriptable prober that counts calls and sleeps on tokio's clock.
pub struct FakeProber {
    delay: Duration,
    default: Behaviour,
    overrides: HashMap<Ipv4Addr, Behaviour>,
    calls: DashMap<Ipv4Addr, usize>,
}

impl FakeProber {
    pub fn new(delay: Duration, default: Behaviour) -> Self {
        Self {
            delay,
            default,
            overrides: HashMap::new(),
            calls: DashMap::new(),
        }
    }

    pub fn with(mut self, address: Ipv4Addr, behaviour: Behaviour) -> Self {
        self.overrides.insert(address, behaviour);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self, address: Ipv4Addr) -> usize {
        self.calls.get(&address).map(|c| *c).unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|c| *c.value()).sum()
    }
}

#[async_trait]
impl Prober for FakeProber {
    async fn measure_loss(&self, address: Ipv4Addr) -> Result<f64, ProbeError> {
        *self.calls.entry(address).or_insert(0) += 1;

        let behaviour = self.overrides.get(&address).copied().unwrap_or(self.default);
        if let Behaviour::Hang = behaviour {
            std::future::pending::<()>().await;
        }

        tokio::time::sleep(self.delay).await;
        match behaviour {
            Behaviour::Loss(loss) => Ok(loss),
            Behaviour::Fail => Err(ProbeError::Unparseable("ping: sendmsg: Network is unreachable".into())),
            Behaviour::Hang => unreachable!(),
        }
    }
}

//! ICMP probing through the system `ping` binary.

use std::net::Ipv4Addr;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time;

use crate::config::ProbeConfig;
use crate::probe::{ProbeError, Prober};

/// Runs `ping -c <count> <address>` and reads the loss summary.
#[derive(Debug, Clone)]
pub struct PingProber {
    command: String,
    count: u32,
    timeout: Duration,
}

impl PingProber {
    pub fn new(config: &ProbeConfig) -> Self {
        Self {
            command: config.command.clone(),
            count: config.count,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[async_trait]
impl Prober for PingProber {
    async fn measure_loss(&self, address: Ipv4Addr) -> Result<f64, ProbeError> {
        let mut cmd = Command::new(&self.command);
        cmd.arg("-c")
            .arg(self.count.to_string())
            .arg(address.to_string())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        // ping exits non-zero on total loss, so the status is not checked;
        // the summary line decides.
        let output = match time::timeout(self.timeout, cmd.output()).await {
            Ok(output) => output?,
            Err(_) => return Err(ProbeError::Timeout(self.timeout)),
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_packet_loss(&stdout)
    }
}

/// Extract the loss percentage from ping's summary.
///
/// Handles the iputils, busybox and BSD formats:
/// `5 packets transmitted, 0 received, +5 errors, 100% packet loss, time 4006ms`
/// `5 packets transmitted, 5 packets received, 0% packet loss`
/// `5 packets transmitted, 4 packets received, 20.0% packet loss`
pub fn parse_packet_loss(output: &str) -> Result<f64, ProbeError> {
    let clause = output
        .lines()
        .flat_map(|line| line.split(','))
        .find(|clause| clause.contains("packet loss"))
        .ok_or_else(|| ProbeError::Unparseable(summarize(output)))?;

    let figure = clause
        .split_whitespace()
        .find_map(|token| token.strip_suffix('%'))
        .ok_or_else(|| ProbeError::Unparseable(clause.trim().to_string()))?;

    let loss: f64 = figure
        .parse()
        .map_err(|_| ProbeError::Unparseable(clause.trim().to_string()))?;

    if !(0.0..=100.0).contains(&loss) {
        return Err(ProbeError::OutOfRange(loss));
    }
    Ok(loss)
}

fn summarize(output: &str) -> String {
    output.lines().last().unwrap_or_default().trim().to_string()
}

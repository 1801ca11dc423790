//! Monitored tunnel record.

use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;

use crate::tunnel::ParseError;

/// One monitored tunnel, valid for a single reconciliation cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    /// Logical interface name (e.g. `gre-1`).
    pub interface_name: String,
    /// Local address on the point-to-point link.
    pub local_address: Ipv4Addr,
    /// Transport address of the remote endpoint.
    pub remote_address: Ipv4Addr,
    /// Human label for the remote endpoint.
    pub remote_hostname: String,
    /// Netmask of the point-to-point link.
    pub netmask: Ipv4Addr,
    /// The other side of the link, inside the tunnel.
    pub internal_peer_address: Ipv4Addr,
}

impl Target {
    /// Build a target, deriving the inside peer from `local_address`/`netmask`.
    pub fn new(
        interface_name: String,
        local_address: Ipv4Addr,
        remote_address: Ipv4Addr,
        remote_hostname: String,
        netmask: Ipv4Addr,
    ) -> Result<Self, ParseError> {
        let internal_peer_address = peer_address(local_address, netmask)?;
        Ok(Self {
            interface_name,
            local_address,
            remote_address,
            remote_hostname,
            netmask,
            internal_peer_address,
        })
    }

    /// Prefix length of the link subnet.
    pub fn prefix(&self) -> u8 {
        // Already validated in `new`.
        ipnetwork::ipv4_mask_to_prefix(self.netmask).unwrap_or(32)
    }
}

/// First usable address of `local/netmask` that is not `local`.
///
/// Network and broadcast addresses are skipped for prefixes up to /30; a /31
/// link uses both of its addresses. A /32 has no peer.
pub fn peer_address(local: Ipv4Addr, netmask: Ipv4Addr) -> Result<Ipv4Addr, ParseError> {
    let prefix =
        ipnetwork::ipv4_mask_to_prefix(netmask).map_err(|_| ParseError::InvalidNetmask(netmask))?;
    let network =
        Ipv4Network::new(local, prefix).map_err(|_| ParseError::InvalidNetmask(netmask))?;

    let skip_edges = prefix <= 30;
    let network_addr = network.network();
    let broadcast_addr = network.broadcast();

    network
        .iter()
        .filter(|addr| !skip_edges || (*addr != network_addr && *addr != broadcast_addr))
        .find(|addr| *addr != local)
        .ok_or(ParseError::NoPeerAddress { local, prefix })
}

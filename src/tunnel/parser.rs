//! Tunnel definition parsing.
//!
//! Reads the subset of an `interfaces(5)` stanza needed to monitor a GRE
//! tunnel:
//!
//! ```text
//! auto gre-1
//! iface gre-1 inet tunnel
//!     address 10.0.0.1
//!     netmask 255.255.255.252
//!     mode gre
//!     remote 203.0.113.7
//! # remote: edge-b.example.net
//! ```
//!
//! A declaration is a keyword followed by a space and may appear anywhere in
//! a line, so `remote` inside a `pre-up ip tunnel add ... remote X local Y`
//! command counts, as does a `# remote:` comment trailing a declaration.
//! Within a line the first valid value wins; across lines a later
//! declaration overrides an earlier one. Malformed addresses leave the field
//! unset.

use std::net::Ipv4Addr;

use crate::tunnel::{ParseError, Target};

const HOSTNAME_MARKER: &str = "# remote:";

/// Fields found in one definition file, each possibly absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TunnelDefinition {
    pub interface_name: Option<String>,
    pub local_address: Option<Ipv4Addr>,
    pub netmask: Option<Ipv4Addr>,
    pub remote_address: Option<Ipv4Addr>,
    pub remote_hostname: Option<String>,
}

impl TunnelDefinition {
    /// Parse definition text. `interface_prefix` is the required start of the
    /// `auto` interface name (`gre` matches `gre-1`, `gre12`).
    pub fn parse(content: &str, interface_prefix: &str) -> Self {
        let mut def = Self::default();

        for line in content.lines() {
            if let Some(at) = line.find(HOSTNAME_MARKER) {
                let host = line[at + HOSTNAME_MARKER.len()..].trim();
                if !host.is_empty() {
                    def.remote_hostname = Some(host.to_string());
                }
            }

            if let Some(name) = values_after(line, "auto ")
                .find_map(|value| tunnel_interface(value, interface_prefix))
            {
                def.interface_name = Some(name.to_string());
            }
            if let Some(addr) = first_address(line, "address ") {
                def.local_address = Some(addr);
            }
            if let Some(mask) = first_address(line, "netmask ") {
                def.netmask = Some(mask);
            }
            if let Some(addr) = first_address(line, "remote ") {
                def.remote_address = Some(addr);
            }
        }

        def
    }

    /// Name of the first missing field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.interface_name.is_none() {
            Some("interface_name")
        } else if self.local_address.is_none() {
            Some("local_address")
        } else if self.netmask.is_none() {
            Some("netmask")
        } else if self.remote_address.is_none() {
            Some("remote_address")
        } else if self.remote_hostname.is_none() {
            Some("remote_hostname")
        } else {
            None
        }
    }

    /// Turn a complete definition into a [`Target`].
    pub fn into_target(self) -> Result<Target, ParseError> {
        let missing = self.missing_field();
        match self {
            Self {
                interface_name: Some(interface_name),
                local_address: Some(local_address),
                netmask: Some(netmask),
                remote_address: Some(remote_address),
                remote_hostname: Some(remote_hostname),
            } => Target::new(
                interface_name,
                local_address,
                remote_address,
                remote_hostname,
                netmask,
            ),
            _ => Err(ParseError::MissingField(missing.unwrap_or("unknown"))),
        }
    }
}

/// Tokens directly following `keyword` anywhere in `line`.
fn values_after<'a>(line: &'a str, keyword: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    line.match_indices(keyword)
        .filter_map(move |(at, _)| line[at + keyword.len()..].split_whitespace().next())
}

/// First dotted quad after `keyword` on this line. Trailing text such as a
/// `/30` suffix or `;` is cut off before parsing.
fn first_address(line: &str, keyword: &str) -> Option<Ipv4Addr> {
    values_after(line, keyword).find_map(|value| {
        value
            .split(|c: char| !(c.is_ascii_digit() || c == '.'))
            .next()
            .and_then(|quad| quad.parse().ok())
    })
}

/// The leading `<prefix><digits or '-'>` part of `token`, if it has one.
fn tunnel_interface<'a>(token: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = token.strip_prefix(prefix)?;
    let len = rest
        .find(|c: char| !(c == '-' || c.is_ascii_digit()))
        .unwrap_or(rest.len());
    (len > 0).then(|| &token[..prefix.len() + len])
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "\
auto gre-1
iface gre-1 inet tunnel
    address 10.0.0.1
    netmask 255.255.255.252
    mode gre
    endpoint 198.51.100.4
    remote 203.0.113.7
    ttl 255
# remote: edge-b.example.net
";

    #[test]
    fn test_parse_full_definition() {
        let def = TunnelDefinition::parse(FULL, "gre");
        assert_eq!(def.interface_name.as_deref(), Some("gre-1"));
        assert_eq!(def.local_address, Some("10.0.0.1".parse().unwrap()));
        assert_eq!(def.netmask, Some("255.255.255.252".parse().unwrap()));
        assert_eq!(def.remote_address, Some("203.0.113.7".parse().unwrap()));
        assert_eq!(def.remote_hostname.as_deref(), Some("edge-b.example.net"));
        assert_eq!(def.missing_field(), None);

        let target = def.into_target().unwrap();
        assert_eq!(target.internal_peer_address, "10.0.0.2".parse::<Ipv4Addr>().unwrap());
    }

    #[test]
    fn test_missing_hostname() {
        let content = FULL.replace("# remote: edge-b.example.net\n", "");
        let def = TunnelDefinition::parse(&content, "gre");
        assert_eq!(def.missing_field(), Some("remote_hostname"));
        assert!(matches!(
            def.into_target(),
            Err(ParseError::MissingField("remote_hostname"))
        ));
    }

    #[test]
    fn test_hostname_comment_is_not_remote_address() {
        let content = "auto gre-2\n# remote: 192.0.2.1\n";
        let def = TunnelDefinition::parse(content, "gre");
        assert_eq!(def.remote_hostname.as_deref(), Some("192.0.2.1"));
        assert_eq!(def.remote_address, None);
    }

    #[test]
    fn test_non_tunnel_interface_ignored() {
        let def = TunnelDefinition::parse("auto eth0\n", "gre");
        assert_eq!(def.interface_name, None);

        let def = TunnelDefinition::parse("auto gre\n", "gre");
        assert_eq!(def.interface_name, None);

        let def = TunnelDefinition::parse("auto gre12\n", "gre");
        assert_eq!(def.interface_name.as_deref(), Some("gre12"));
    }

    #[test]
    fn test_malformed_address_left_unset() {
        let def = TunnelDefinition::parse("address 10.0.0.300\nnetmask 255.255.255.x\n", "gre");
        assert_eq!(def.local_address, None);
        assert_eq!(def.netmask, None);
    }

    #[test]
    fn test_last_declaration_wins() {
        let def = TunnelDefinition::parse("remote 192.0.2.1\nremote 192.0.2.9\n", "gre");
        assert_eq!(def.remote_address, Some("192.0.2.9".parse().unwrap()));
    }

    #[test]
    fn test_remote_inside_pre_up_command() {
        let content = "\
auto gre-1
iface gre-1 inet static
    address 10.0.0.1
    netmask 255.255.255.252
    pre-up ip tunnel add gre-1 mode gre remote 203.0.113.7 local 198.51.100.4 ttl 255
    post-down ip tunnel del gre-1
# remote: edge-b.example.net
";
        let def = TunnelDefinition::parse(content, "gre");
        assert_eq!(def.remote_address, Some("203.0.113.7".parse().unwrap()));
        assert_eq!(def.missing_field(), None);
    }

    #[test]
    fn test_trailing_hostname_comment() {
        let content = "auto gre-3\naddress 10.3.0.1\nnetmask 255.255.255.252\nremote 203.0.113.9 # remote: edge-c\n";
        let def = TunnelDefinition::parse(content, "gre");
        assert_eq!(def.remote_address, Some("203.0.113.9".parse().unwrap()));
        assert_eq!(def.remote_hostname.as_deref(), Some("edge-c"));
        assert_eq!(def.into_target().unwrap().internal_peer_address, Ipv4Addr::new(10, 3, 0, 2));
    }

    #[test]
    fn test_address_with_prefix_suffix() {
        let def = TunnelDefinition::parse("    address 10.0.0.1/30\n", "gre");
        assert_eq!(def.local_address, Some(Ipv4Addr::new(10, 0, 0, 1)));
    }

    #[test]
    fn test_first_valid_value_on_a_line_wins() {
        let def = TunnelDefinition::parse("remote bogus remote 192.0.2.4 remote 192.0.2.5\n", "gre");
        assert_eq!(def.remote_address, Some(Ipv4Addr::new(192, 0, 2, 4)));
    }

    #[test]
    fn test_invalid_netmask_is_parse_error() {
        let content = FULL.replace("255.255.255.252", "255.255.0.255");
        let def = TunnelDefinition::parse(&content, "gre");
        assert!(matches!(def.into_target(), Err(ParseError::InvalidNetmask(_))));
    }
}

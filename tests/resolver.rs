//! Target resolution against real directories.

use std::collections::HashSet;
use std::net::Ipv4Addr;

use tunnel_loss_exporter::config::TunnelsConfig;
use tunnel_loss_exporter::tunnel::TargetResolver;

mod common;
use common::Definition;

fn resolver(dir: &std::path::Path) -> TargetResolver {
    TargetResolver::new(TunnelsConfig {
        config_path: dir.to_path_buf(),
        ..TunnelsConfig::default()
    })
}

#[test]
fn test_slash_30_peer_address() {
    let dir = tempfile::tempdir().unwrap();
    Definition {
        address: Some("10.0.0.1".into()),
        ..Definition::numbered(1)
    }
    .write(dir.path(), "gre1.conf");

    let resolution = resolver(dir.path()).resolve();
    assert_eq!(resolution.targets.len(), 1);
    assert_eq!(resolution.unprocessed_count(), 0);

    let target = &resolution.targets[0];
    assert_eq!(target.local_address, Ipv4Addr::new(10, 0, 0, 1));
    assert_eq!(target.internal_peer_address, Ipv4Addr::new(10, 0, 0, 2));
    assert_eq!(target.remote_hostname, "edge-1.example.net");
}

#[test]
fn test_missing_hostname_does_not_affect_siblings() {
    let dir = tempfile::tempdir().unwrap();
    Definition::numbered(1).write(dir.path(), "gre1.conf");
    Definition::numbered(2).write(dir.path(), "gre2.conf");
    Definition {
        hostname: None,
        ..Definition::numbered(3)
    }
    .write(dir.path(), "gre3.conf");

    let resolution = resolver(dir.path()).resolve();
    assert_eq!(resolution.unprocessed_count(), 1);
    assert!(resolution.unprocessed[0].ends_with("gre3.conf"));

    let names: HashSet<_> = resolution
        .targets
        .iter()
        .map(|t| t.interface_name.as_str())
        .collect();
    assert_eq!(names, HashSet::from(["gre-1", "gre-2"]));
}

#[test]
fn test_each_missing_field_counts_once() {
    let dir = tempfile::tempdir().unwrap();
    let base = Definition::numbered(1);
    let broken = [
        Definition { interface: None, ..base.clone() },
        Definition { address: None, ..base.clone() },
        Definition { netmask: None, ..base.clone() },
        Definition { remote: None, ..base.clone() },
        Definition { hostname: None, ..base.clone() },
    ];

    let resolver = resolver(dir.path());
    for (i, def) in broken.iter().enumerate() {
        let before = resolver.resolve().unprocessed_count();
        def.write(dir.path(), &format!("gre-broken{}.conf", i));
        let after = resolver.resolve();
        assert_eq!(after.unprocessed_count(), before + 1, "definition {:?}", def);
        assert!(after.targets.is_empty());
    }
}

#[test]
fn test_all_valid_entries_resolved() {
    let dir = tempfile::tempdir().unwrap();
    for n in 1..=12 {
        Definition::numbered(n).write(dir.path(), &format!("gre{}.conf", n));
    }

    let resolution = resolver(dir.path()).resolve();
    assert_eq!(resolution.targets.len(), 12);
    assert_eq!(resolution.unprocessed_count(), 0);

    let remotes: HashSet<_> = resolution.targets.iter().map(|t| t.remote_address).collect();
    let expected: HashSet<_> = (1..=12).map(|n| Ipv4Addr::new(192, 0, 2, n)).collect();
    assert_eq!(remotes, expected);
}

#[test]
fn test_bad_subnets_are_unprocessed() {
    let dir = tempfile::tempdir().unwrap();
    Definition {
        netmask: Some("255.255.255.255".into()),
        ..Definition::numbered(1)
    }
    .write(dir.path(), "gre1.conf");
    Definition {
        netmask: Some("255.255.0.255".into()),
        ..Definition::numbered(2)
    }
    .write(dir.path(), "gre2.conf");
    Definition::numbered(3).write(dir.path(), "gre3.conf");

    let resolution = resolver(dir.path()).resolve();
    assert_eq!(resolution.targets.len(), 1);
    assert_eq!(resolution.unprocessed_count(), 2);
}

#[test]
fn test_resolution_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    for n in 1..=5 {
        Definition::numbered(n).write(dir.path(), &format!("gre{}.conf", n));
    }
    let resolver = resolver(dir.path());

    let first: HashSet<_> = resolver.resolve().targets.into_iter().collect();
    let second: HashSet<_> = resolver.resolve().targets.into_iter().collect();
    assert_eq!(first, second);
}

#[test]
fn test_pre_up_tunnel_command_resolves() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("gre7.conf"),
        "\
auto gre-7
iface gre-7 inet static
    address 10.7.0.1
    netmask 255.255.255.252
    pre-up ip tunnel add gre-7 mode gre remote 203.0.113.7 local 198.51.100.4 ttl 255 # remote: edge-7.example.net
    post-down ip tunnel del gre-7
",
    )
    .unwrap();

    let resolution = resolver(dir.path()).resolve();
    assert_eq!(resolution.unprocessed_count(), 0);
    let target = &resolution.targets[0];
    assert_eq!(target.remote_address, Ipv4Addr::new(203, 0, 113, 7));
    assert_eq!(target.remote_hostname, "edge-7.example.net");
    assert_eq!(target.internal_peer_address, Ipv4Addr::new(10, 7, 0, 2));
}

#![allow(dead_code)]

use fabdrift::{CmdResult, IntentLoader, IntentModel, MockAdapter};
use std::path::{Path, PathBuf};

pub fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

pub fn lab_dir() -> PathBuf {
    fixtures_root().join("lab1")
}

pub fn load_intent() -> IntentModel {
    IntentLoader::new().load_lab(fixtures_root(), "lab1").unwrap()
}

pub const SHOW_INTERFACES: &str = "\
Interface                      Status         Protocol           Description
Et1                            up             up                 fabric uplink
Et2                            up             up                 fabric uplink
Lo0                            up             up                 router-id
Ma0                            up             up                 mgmt
";

pub const SPINE_BGP: &str = "\
BGP summary information for VRF default
  Neighbor   V AS    MsgRcvd MsgSent InQ OutQ  Up/Down State   PfxRcd PfxAcc
  10.1.1.1   4 65011      40      42   0    0 01:02:03 Established 4   4
  10.1.2.1   4 65012      40      42   0    0 01:02:03 Established 4   4
";

pub const LEAF_BGP: &str = "\
  Neighbor   V AS    MsgRcvd MsgSent InQ OutQ  Up/Down State
  10.1.1.0   4 65000      40      42   0    0 01:02:03 Established
";

pub const EVPN_ROUTES: &str = "\
BGP routing table information for VRF default
 * >     RD: 10.0.1.11:10010 mac-ip 0050.7966.6801
 * >     RD: 10.0.1.12:10010 imet 10.0.1.12
";

/// A healthy lab1 where every scripted command succeeds.
pub fn healthy_adapter() -> MockAdapter {
    let mut adapter = MockAdapter::new(lab_dir())
        .with_node("spine1", "ceos")
        .with_node("leaf1", "ceos")
        .with_node("leaf2", "ceos")
        .with_node("host1", "linux")
        .with_node("host2", "linux")
        .with_eos("spine1", "show bgp summary", CmdResult::ok(SPINE_BGP))
        .with_eos("leaf1", "show bgp evpn", CmdResult::ok(EVPN_ROUTES))
        .with_exec("host1", "ping -c 2 -W 1 10.10.0.12", CmdResult::ok("2 packets received"))
        .with_exec("host1", "ip neigh show dev bond0.20", CmdResult::ok("10.20.1.1 lladdr 00:1c:73:aa:bb:01 REACHABLE"));

    for node in ["spine1", "leaf1", "leaf2"] {
        adapter = adapter.with_eos(node, "show interfaces description", CmdResult::ok(SHOW_INTERFACES));
    }
    for node in ["leaf1", "leaf2"] {
        adapter = adapter
            .with_eos(node, "show bgp summary", CmdResult::ok(LEAF_BGP))
            .with_eos(node, "show bgp evpn summary", CmdResult::ok("EVPN summary\n10.0.0.1 Established\n"));
    }
    for node in ["spine1", "leaf1", "leaf2"] {
        let desired = std::fs::read_to_string(lab_dir().join("configs").join(format!("{}.cfg", node))).unwrap();
        adapter = adapter.with_eos(node, "show running-config", CmdResult::ok(desired));
    }
    adapter
}

//! Evidence collectors: pure parsers plus thin wrappers that route
//! through the [`EvidenceClient`](super::EvidenceClient) cache.

pub mod eos;
pub mod linux;

pub use eos::{
    collect_bgp_summary, collect_evpn_routes, collect_evpn_summary, collect_interfaces,
    collect_running_config, is_neighbor_line, parse_bgp_summary, parse_evpn_summary,
    parse_interfaces_description, BgpSummary, EvpnSummary, InterfaceEntry,
};
pub use linux::{interfaces_present, neigh_show, ping, ping_command, HostInterfaces};

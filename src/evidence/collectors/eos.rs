use serde::{Deserialize, Serialize};
use serde_json::json;
use crate::adapter::Adapter;
use crate::error::{FabDriftError, Result};
use crate::evidence::{EvidenceClient, EvidenceRecord};

pub const INTERFACES_PATH: &str = "/interfaces/interface/state";
pub const BGP_SESSION_PATH: &str =
    "/network-instances/network-instance/protocols/protocol/bgp/neighbors/neighbor/state/session-state";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceEntry {
    pub interface: String,
    pub status: String,
    pub protocol: String,
    #[serde(default)]
    pub description: String,
}

impl InterfaceEntry {
    pub fn is_up(&self) -> bool {
        self.status == "up" && self.protocol == "up"
    }

    /// `name:status/protocol`
    pub fn label(&self) -> String {
        format!("{}:{}/{}", self.interface, self.status, self.protocol)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgpSummary {
    pub established: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvpnSummary {
    pub neighbors: usize,
    pub established: usize,
}

/// Parse `show interfaces description` output.
pub fn parse_interfaces_description(raw: &str) -> Vec<InterfaceEntry> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("Interface"))
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 3 {
                return None;
            }
            Some(InterfaceEntry {
                interface: parts[0].to_string(),
                status: parts[1].to_lowercase(),
                protocol: parts[2].to_lowercase(),
                description: parts[3..].join(" "),
            })
        })
        .collect()
}

/// A neighbor row starts with one or more digits followed by a dot.
pub fn is_neighbor_line(line: &str) -> bool {
    let trimmed = line.trim();
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && trimmed[digits..].starts_with('.')
}

pub fn parse_bgp_summary(text: &str) -> BgpSummary {
    let mut summary = BgpSummary::default();
    for line in text.lines().filter(|l| is_neighbor_line(l)) {
        summary.total += 1;
        if line.contains("Established") {
            summary.established += 1;
        }
    }
    summary
}

pub fn parse_evpn_summary(text: &str) -> EvpnSummary {
    let bgp = parse_bgp_summary(text);
    EvpnSummary {
        neighbors: bgp.total,
        established: bgp.established,
    }
}

pub async fn collect_interfaces(
    client: &mut EvidenceClient,
    adapter: &dyn Adapter,
    node: &str,
) -> Result<EvidenceRecord> {
    let key = format!("interfaces:{}", node);
    client
        .collect(&key, INTERFACES_PATH, node, move || async move {
            let r = adapter.eos_cli(node, "show interfaces description").await?;
            let parsed = parse_interfaces_description(&r.stdout);
            let up = parsed.iter().filter(|e| e.is_up()).count();
            Ok::<_, FabDriftError>(json!({
                "rc": r.rc,
                "up": up,
                "down": parsed.len() - up,
                "parsed": parsed,
                "raw": r.stdout,
                "err": r.stderr,
            }))
        })
        .await
}

pub async fn collect_bgp_summary(
    client: &mut EvidenceClient,
    adapter: &dyn Adapter,
    node: &str,
) -> Result<EvidenceRecord> {
    let key = format!("bgp-summary:{}", node);
    client
        .collect(&key, BGP_SESSION_PATH, node, move || async move {
            let r = adapter.eos_cli(node, "show bgp summary").await?;
            Ok::<_, FabDriftError>(json!({
                "rc": r.rc,
                "parsed": parse_bgp_summary(&r.stdout),
                "raw": r.stdout,
                "err": r.stderr,
            }))
        })
        .await
}

pub async fn collect_evpn_summary(
    client: &mut EvidenceClient,
    adapter: &dyn Adapter,
    node: &str,
) -> Result<EvidenceRecord> {
    let key = format!("evpn-summary:{}", node);
    client
        .collect_cli(&key, move || async move {
            let bgp = adapter.eos_cli(node, "show bgp summary").await?;
            let evpn = adapter.eos_cli(node, "show bgp evpn summary").await?;
            let lines = evpn.stdout.lines().filter(|l| !l.trim().is_empty()).count();
            Ok::<_, FabDriftError>(json!({
                "summary": parse_evpn_summary(&bgp.stdout),
                "evpn_summary_rc": evpn.rc,
                "evpn_summary_lines": lines,
                "raw": evpn.stdout,
                "err": evpn.stderr,
            }))
        })
        .await
}

pub async fn collect_running_config(
    client: &mut EvidenceClient,
    adapter: &dyn Adapter,
    node: &str,
) -> Result<EvidenceRecord> {
    let key = format!("running-config:{}", node);
    client
        .collect_cli(&key, move || async move {
            let r = adapter.eos_cli(node, "show running-config").await?;
            Ok::<_, FabDriftError>(json!({"rc": r.rc, "raw": r.stdout, "err": r.stderr}))
        })
        .await
}

pub async fn collect_evpn_routes(
    client: &mut EvidenceClient,
    adapter: &dyn Adapter,
    node: &str,
) -> Result<EvidenceRecord> {
    let key = format!("evpn-routes:{}", node);
    client
        .collect_cli(&key, move || async move {
            let r = adapter.eos_cli(node, "show bgp evpn").await?;
            Ok::<_, FabDriftError>(json!({"rc": r.rc, "raw": r.stdout, "err": r.stderr}))
        })
        .await
}

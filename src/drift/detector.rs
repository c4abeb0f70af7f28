use serde_json::{json, Value};
use tracing::{debug, info};
use crate::adapter::{read_desired_config, Adapter};
use crate::check::{CheckResult, Phase, RunSummary, Severity};
use crate::error::Result;
use crate::evidence::collectors::{collect_bgp_summary, collect_interfaces, collect_running_config};
use crate::evidence::EvidenceClient;
use crate::intent::IntentModel;
use super::checksum::sha256_json;
use super::config::{compare_config, format_config_diff, ConfigDrift};
use super::diff::DriftEntry;
use super::snapshot::{Fingerprint, Snapshot};

const SAMPLE_SIZE: usize = 20;
const HOST_KIND: &str = "linux";

/// Outcome of comparing the live lab against a baseline.
#[derive(Debug, Clone)]
pub struct DriftOutcome {
    pub current: Snapshot,
    pub state_diffs: Vec<DriftEntry>,
    pub config_drift: Vec<ConfigDrift>,
    pub summary: RunSummary,
}

impl DriftOutcome {
    pub fn has_drift(&self) -> bool {
        !self.state_diffs.is_empty() || !self.config_drift.is_empty()
    }

    /// Summary report plus the full `state_diffs` and `config_drift` lists.
    pub fn to_report(&self) -> Result<Value> {
        let mut report = self.summary.to_report();
        if let Value::Object(map) = &mut report {
            map.insert("state_diffs".to_string(), serde_json::to_value(&self.state_diffs)?);
            map.insert("config_drift".to_string(), serde_json::to_value(&self.config_drift)?);
        }
        Ok(report)
    }
}

/// Collects snapshots and configuration drift for one lab.
pub struct DriftDetector<'a> {
    intent: &'a IntentModel,
    adapter: &'a dyn Adapter,
    evidence: EvidenceClient,
}

impl<'a> DriftDetector<'a> {
    pub fn new(intent: &'a IntentModel, adapter: &'a dyn Adapter, evidence: EvidenceClient) -> Self {
        Self { intent, adapter, evidence }
    }

    fn fabric_nodes(&self) -> Vec<String> {
        self.adapter
            .list_nodes()
            .into_iter()
            .filter(|n| self.adapter.node_kind(n) != HOST_KIND)
            .collect()
    }

    pub async fn collect_snapshot(&mut self) -> Result<Snapshot> {
        let mut snapshot = Snapshot::new(
            self.intent.lab_name.clone(),
            sha256_json(&self.intent.fingerprint_payload())?,
        );

        for node in self.fabric_nodes() {
            let interfaces = collect_interfaces(&mut self.evidence, self.adapter, &node).await?;
            let bgp = collect_bgp_summary(&mut self.evidence, self.adapter, &node).await?;
            let bundle = json!({ "interfaces": interfaces.data, "bgp": bgp.data });
            let key_count = bundle.as_object().map_or(0, |m| m.len());

            debug!("Fingerprinted {} ({} keys)", node, key_count);
            snapshot.fingerprints.insert(
                node,
                Fingerprint {
                    hash: sha256_json(&bundle)?,
                    key_count,
                },
            );
        }

        info!(
            "Snapshot of {} collected: {} nodes",
            snapshot.label,
            snapshot.fingerprints.len()
        );
        Ok(snapshot)
    }

    pub async fn compute_config_drift(&mut self) -> Result<Vec<ConfigDrift>> {
        let mut drifts = Vec::new();

        for node in self.fabric_nodes() {
            let desired = read_desired_config(self.adapter, &node)?.unwrap_or_default();
            let running = collect_running_config(&mut self.evidence, self.adapter, &node).await?;
            let raw = running.get("raw").and_then(Value::as_str).unwrap_or("");
            let err = running.get("err").and_then(Value::as_str).unwrap_or("");
            let rc = running.rc().unwrap_or(1);

            if let Some(drift) = compare_config(&node, &desired, raw, rc, err) {
                debug!("Config drift: {}", drift.describe());
                drifts.push(drift);
            }
        }

        Ok(drifts)
    }

    /// Colored line diff of desired vs. running config for `node`.
    pub async fn render_config_diff(&mut self, node: &str) -> Result<String> {
        let desired = read_desired_config(self.adapter, node)?.unwrap_or_default();
        let running = collect_running_config(&mut self.evidence, self.adapter, node).await?;
        let raw = running.get("raw").and_then(Value::as_str).unwrap_or("");
        Ok(format_config_diff(node, &desired, raw))
    }

    pub async fn detect(&mut self, baseline: &Snapshot) -> Result<DriftOutcome> {
        let current = self.collect_snapshot().await?;
        let state_diffs = baseline.diff(&current)?;
        let config_drift = self.compute_config_drift().await?;
        let summary = drift_summary(&state_diffs, &config_drift)?;

        info!(
            "Drift for {}: {} state differences, {} config findings",
            self.intent.lab_name,
            state_diffs.len(),
            config_drift.len()
        );
        Ok(DriftOutcome {
            current,
            state_diffs,
            config_drift,
            summary,
        })
    }

    pub fn into_evidence(self) -> EvidenceClient {
        self.evidence
    }
}

/// Fold drift findings into the two `drift`-phase results.
pub fn drift_summary(state_diffs: &[DriftEntry], config_drift: &[ConfigDrift]) -> Result<RunSummary> {
    let mut summary = RunSummary::new();

    summary.add(if state_diffs.is_empty() {
        CheckResult::passed(Phase::Drift, "state drift", "No state drift")
    } else {
        let sample = &state_diffs[..state_diffs.len().min(SAMPLE_SIZE)];
        CheckResult::failed(
            Phase::Drift,
            "state drift",
            Severity::Error,
            format!("{} differences", state_diffs.len()),
        )
        .with_evidence(json!({ "sample": serde_json::to_value(sample)? }))
    });

    summary.add(if config_drift.is_empty() {
        CheckResult::passed(Phase::Drift, "config drift", "No config drift")
    } else {
        let sample = &config_drift[..config_drift.len().min(SAMPLE_SIZE)];
        CheckResult::failed(
            Phase::Drift,
            "config drift",
            Severity::Error,
            format!("{} nodes changed", config_drift.len()),
        )
        .with_evidence(json!({ "sample": serde_json::to_value(sample)? }))
        .with_remediation("reconcile running-config with configs/<node>.cfg or refresh the desired file")
    });

    Ok(summary)
}

use regex::Regex;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use tracing::{debug, error, info};
use uuid::Uuid;
use crate::adapter::{read_desired_config, Adapter};
use crate::error::Result;
use crate::evidence::collectors::{self, BgpSummary, EvpnSummary, InterfaceEntry};
use crate::evidence::{EvidenceClient, EvidenceRecord, EvidenceSource};
use crate::intent::{resolve_path, IntentModel};
use super::params::{
    plain_string, BgpEstablishedParams, ConfigContainsParams, EvpnRoutesParams,
    EvpnSessionsParams, IntentDistinctParams, InterfacesUpParams, NeighborAbsentParams,
    PingTargetsParams,
};
use super::result::{CheckResult, RunSummary};
use super::types::{CheckDef, CheckKind, RunMode};

/// Interprets the declared checks of one intent against one lab.
///
/// The engine owns the run's [`EvidenceClient`]; hand it back with
/// [`CheckEngine::into_evidence`] to reuse the cache for drift.
pub struct CheckEngine<'a> {
    intent: &'a IntentModel,
    adapter: &'a dyn Adapter,
    evidence: EvidenceClient,
    run_id: Uuid,
}

impl<'a> CheckEngine<'a> {
    pub fn new(intent: &'a IntentModel, adapter: &'a dyn Adapter, evidence: EvidenceClient) -> Self {
        Self {
            intent,
            adapter,
            evidence,
            run_id: Uuid::new_v4(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn evidence(&self) -> &EvidenceClient {
        &self.evidence
    }

    pub fn into_evidence(self) -> EvidenceClient {
        self.evidence
    }

    pub async fn run(&mut self, mode: RunMode) -> RunSummary {
        let intent = self.intent;
        info!(
            "Run {} started: lab={} mode={} checks={}",
            self.run_id,
            intent.lab_name,
            mode,
            intent.checks.len()
        );

        let mut summary = RunSummary::new();
        for check in intent.checks.iter().filter(|c| mode.includes(c.phase)) {
            let results = self.run_check(check).await;
            summary.extend(results);
        }

        info!(
            "Run {} finished: {} results, exit code {}",
            self.run_id,
            summary.len(),
            summary.exit_code()
        );
        summary
    }

    /// Evaluate one check. Never fails: handler errors become a FAIL result.
    pub async fn run_check(&mut self, check: &CheckDef) -> Vec<CheckResult> {
        debug!("Dispatching {} ({}, {})", check.name, check.kind, check.phase);
        match self.dispatch(check).await {
            Ok(results) => results,
            Err(e) => {
                error!("Check {} crashed: {}", check.name, e);
                vec![CheckResult::crashed(check, e)]
            }
        }
    }

    async fn dispatch(&mut self, check: &CheckDef) -> Result<Vec<CheckResult>> {
        match &check.kind {
            CheckKind::ConfigContains => self.check_config_contains(check),
            CheckKind::InterfacesUp => self.check_interfaces_up(check).await,
            CheckKind::BgpEstablished => self.check_bgp_established(check).await,
            CheckKind::EvpnRoutesPresent => self.check_evpn_routes(check).await,
            CheckKind::EvpnSessionsUp => self.check_evpn_sessions(check).await,
            CheckKind::PingTargets => self.check_ping_targets(check).await,
            CheckKind::L2NeighborAbsent => self.check_neighbor_absent(check).await,
            CheckKind::IntentDistinct => self.check_intent_distinct(check),
            CheckKind::Unsupported(_) => Ok(vec![CheckResult::unsupported(check)]),
        }
    }

    fn check_config_contains(&self, check: &CheckDef) -> Result<Vec<CheckResult>> {
        let params: ConfigContainsParams = check.typed_params()?;
        let mut results = Vec::new();

        for node in params.selector.resolve(&self.intent.inventory) {
            let text = read_desired_config(self.adapter, &node)?.unwrap_or_default();
            let missing: Vec<&String> = params
                .required
                .iter()
                .filter(|needle| !text.contains(needle.as_str()))
                .collect();

            let ok = missing.is_empty();
            let message = if ok {
                format!("{} required line(s) present", params.required.len())
            } else {
                format!("{} required line(s) missing", missing.len())
            };
            let mut result = CheckResult::outcome(check.phase, per_node(check, &node), ok, check.severity, message)
                .with_evidence(json!({ "missing": missing }));
            if !ok {
                result = result.with_remediation(format!("add the missing lines to configs/{}.cfg", node));
            }
            results.push(result);
        }

        Ok(results)
    }

    async fn check_interfaces_up(&mut self, check: &CheckDef) -> Result<Vec<CheckResult>> {
        let params: InterfacesUpParams = check.typed_params()?;
        let required_iface = compile_all(&params.required_interface_regex)?;
        let required_desc = compile_all(&params.required_description_regex)?;
        let ignore_iface = compile_all(&params.ignore_interface_regex)?;
        let scoped = params.has_required_rule();

        let mut results = Vec::new();
        for node in params.selector.resolve(&self.intent.inventory) {
            let record = collectors::collect_interfaces(&mut self.evidence, self.adapter, &node).await?;
            let rc = record_rc(&record);
            let entries: Vec<InterfaceEntry> = field_or_default(&record, "parsed")?;

            let selected: Vec<&InterfaceEntry> = entries
                .iter()
                .filter(|e| {
                    !params.ignore_interfaces.contains(&e.interface)
                        && !ignore_iface.iter().any(|rx| rx.is_match(&e.interface))
                })
                .filter(|e| {
                    !scoped
                        || params.required_interfaces.contains(&e.interface)
                        || required_iface.iter().any(|rx| rx.is_match(&e.interface))
                        || required_desc.iter().any(|rx| rx.is_match(&e.description))
                })
                .collect();
            let bad: Vec<String> = selected
                .iter()
                .filter(|e| !e.is_up())
                .map(|e| e.label())
                .collect();

            let ok = rc == 0 && !selected.is_empty() && bad.is_empty();
            let message = if rc != 0 {
                format!("interface collection failed (rc={})", rc)
            } else if selected.is_empty() {
                "no interfaces selected".to_string()
            } else {
                format!("{}/{} selected interfaces up", selected.len() - bad.len(), selected.len())
            };

            results.push(
                CheckResult::outcome(check.phase, per_node(check, &node), ok, check.severity, message)
                    .with_evidence(json!({
                        "source": record.source,
                        "selected_count": selected.len(),
                        "bad_count": bad.len(),
                        "bad_interfaces": bad,
                    })),
            );
        }

        Ok(results)
    }

    async fn check_bgp_established(&mut self, check: &CheckDef) -> Result<Vec<CheckResult>> {
        let params: BgpEstablishedParams = check.typed_params()?;

        let mut results = Vec::new();
        for node in params.selector.resolve(&self.intent.inventory) {
            let record = collectors::collect_bgp_summary(&mut self.evidence, self.adapter, &node).await?;
            let parsed: BgpSummary = field_or_default(&record, "parsed")?;
            let ok = params.is_satisfied(parsed.total as i64, parsed.established as i64);

            results.push(
                CheckResult::outcome(
                    check.phase,
                    per_node(check, &node),
                    ok,
                    check.severity,
                    format!("established {}/{}", parsed.established, parsed.total),
                )
                .with_evidence(json!({
                    "source": record.source,
                    "established": parsed.established,
                    "total": parsed.total,
                })),
            );
        }

        Ok(results)
    }

    async fn check_evpn_routes(&mut self, check: &CheckDef) -> Result<Vec<CheckResult>> {
        let params: EvpnRoutesParams = check.typed_params()?;

        let mut results = Vec::new();
        for node in params.selector.resolve(&self.intent.inventory) {
            let record = collectors::collect_evpn_routes(&mut self.evidence, self.adapter, &node).await?;
            let rc = record_rc(&record);
            let raw = record.get("raw").and_then(Value::as_str).unwrap_or("");
            let ok = rc == 0 && params.matches(raw);

            let message = if ok {
                "EVPN routes present".to_string()
            } else if rc != 0 {
                format!("show bgp evpn failed (rc={})", rc)
            } else {
                format!("no EVPN routes matching {} of {:?}", params.require, params.patterns)
            };
            results.push(
                CheckResult::outcome(check.phase, per_node(check, &node), ok, check.severity, message)
                    .with_evidence(json!({ "rc": rc, "patterns": params.patterns })),
            );
        }

        Ok(results)
    }

    async fn check_evpn_sessions(&mut self, check: &CheckDef) -> Result<Vec<CheckResult>> {
        let params: EvpnSessionsParams = check.typed_params()?;

        let mut results = Vec::new();
        for node in params.selector.resolve(&self.intent.inventory) {
            let record = collectors::collect_evpn_summary(&mut self.evidence, self.adapter, &node).await?;
            let summary: EvpnSummary = field_or_default(&record, "summary")?;
            let ok = summary.neighbors > 0 && summary.established > 0;

            results.push(
                CheckResult::outcome(
                    check.phase,
                    per_node(check, &node),
                    ok,
                    check.severity,
                    format!("EVPN sessions established {}/{}", summary.established, summary.neighbors),
                )
                .with_evidence(json!({
                    "summary": summary,
                    "evpn_summary_rc": record.get("evpn_summary_rc").cloned().unwrap_or(Value::Null),
                    "evpn_summary_lines": record.get("evpn_summary_lines").cloned().unwrap_or(Value::Null),
                })),
            );
        }

        Ok(results)
    }

    async fn check_ping_targets(&mut self, check: &CheckDef) -> Result<Vec<CheckResult>> {
        let params: PingTargetsParams = check.typed_params()?;
        let interface = params.interface.as_deref().filter(|i| !i.is_empty());

        let mut results = Vec::new();
        for probe in &params.probes {
            let absent_iface = match interface {
                Some(iface) => {
                    let present = collectors::interfaces_present(self.adapter, &probe.source).await?;
                    (present.rc == 0 && !present.has(iface)).then_some(iface)
                }
                None => None,
            };

            for target in &probe.targets {
                let name = probe_name(check, &probe.source, target);
                if let Some(iface) = absent_iface {
                    results.push(
                        CheckResult::failed(
                            check.phase,
                            name,
                            check.severity,
                            format!("interface {} not present on {}", iface, probe.source),
                        )
                        .with_evidence(json!({ "interface": iface })),
                    );
                    continue;
                }

                let r = collectors::ping(self.adapter, &probe.source, target, interface).await?;
                let message = if r.success() {
                    format!("ping {} ok", target)
                } else {
                    format!("ping {} failed (rc={})", target, r.rc)
                };
                results.push(
                    CheckResult::outcome(check.phase, name, r.success(), check.severity, message)
                        .with_evidence(json!({ "rc": r.rc })),
                );
            }
        }

        Ok(results)
    }

    async fn check_neighbor_absent(&mut self, check: &CheckDef) -> Result<Vec<CheckResult>> {
        let params: NeighborAbsentParams = check.typed_params()?;

        let mut results = Vec::new();
        for probe in &params.probes {
            // The ping only primes the neighbor table; its outcome is irrelevant.
            collectors::ping(self.adapter, &probe.source, &probe.target_ip, Some(probe.interface.as_str())).await?;
            let neigh = collectors::neigh_show(self.adapter, &probe.source, &probe.interface).await?;
            let ok = !neigh.stdout.contains(probe.target_ip.as_str());

            let message = if ok && !neigh.success() {
                format!("{} not learned on {} (ip neigh rc={})", probe.target_ip, probe.interface, neigh.rc)
            } else if ok {
                format!("{} not learned on {}", probe.target_ip, probe.interface)
            } else {
                format!("{} present in neighbor table of {}", probe.target_ip, probe.interface)
            };
            results.push(
                CheckResult::outcome(
                    check.phase,
                    probe_name(check, &probe.source, &probe.target_ip),
                    ok,
                    check.severity,
                    message,
                )
                .with_evidence(json!({ "interface": probe.interface, "rc": neigh.rc })),
            );
        }

        Ok(results)
    }

    fn check_intent_distinct(&self, check: &CheckDef) -> Result<Vec<CheckResult>> {
        let params: IntentDistinctParams = check.typed_params()?;

        let mut values = Map::new();
        let mut missing = Vec::new();
        let mut distinct = HashSet::new();
        for path in &params.paths {
            match resolve_path(&self.intent.raw, path) {
                Some(value) => {
                    distinct.insert(plain_string(value));
                    values.insert(path.clone(), value.clone());
                }
                None => {
                    missing.push(path.clone());
                    values.insert(path.clone(), Value::Null);
                }
            }
        }

        let ok = missing.is_empty() && distinct.len() == params.paths.len();
        let message = if !missing.is_empty() {
            format!("unresolved paths: {}", missing.join(", "))
        } else if ok {
            format!("{} values distinct", params.paths.len())
        } else {
            format!("{} paths share {} distinct values", params.paths.len(), distinct.len())
        };

        Ok(vec![CheckResult::outcome(check.phase, check.name.clone(), ok, check.severity, message)
            .with_evidence(json!({ "paths": params.paths, "values": values }))])
    }
}

fn per_node(check: &CheckDef, node: &str) -> String {
    format!("{}::{}", check.name, node)
}

fn probe_name(check: &CheckDef, source: &str, target: &str) -> String {
    format!("{}::{}->{}", check.name, source, target)
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Ok(Regex::new(p)?))
        .collect()
}

/// Telemetry records carry no return code and count as successful.
fn record_rc(record: &EvidenceRecord) -> i64 {
    match record.source {
        EvidenceSource::Telemetry => 0,
        EvidenceSource::Cli => record.rc().unwrap_or(1),
    }
}

fn field_or_default<T>(record: &EvidenceRecord, key: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    match record.get(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => Ok(serde_json::from_value(value.clone())?),
    }
}

mod common;

use fabdrift::adapter::CallKind;
use fabdrift::evidence::{StaticTransport, TelemetryTransport};
use fabdrift::{CheckEngine, CheckStatus, CmdResult, EvidenceClient, EvidenceSource, Phase, RunMode, Severity};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_full_run_against_fixture() {
    let intent = common::load_intent();
    let adapter = common::healthy_adapter();
    let mut engine = CheckEngine::new(&intent, &adapter, EvidenceClient::disabled());

    let summary = engine.run(RunMode::All).await;
    let names: Vec<&str> = summary.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "vxlan-basics::leaf1",
            "vxlan-basics::leaf2",
            "rack-vnis-distinct",
            "fabric-links::leaf1",
            "fabric-links::leaf2",
            "fabric-links::spine1",
            "underlay-bgp::spine1",
            "evpn-sessions::leaf1",
            "evpn-sessions::leaf2",
            "evpn-routes::leaf1",
            "vlan10-mesh::host1->10.10.0.12",
            "rack-isolation::host1->10.20.2.13",
            "future-check",
        ]
    );

    let failed: Vec<&str> = summary.failed().map(|r| r.name.as_str()).collect();
    assert_eq!(failed, vec!["vxlan-basics::leaf2", "future-check"]);

    let leaf2 = &summary.results[1];
    assert_eq!(leaf2.severity, Severity::Error);
    assert_eq!(leaf2.evidence["missing"], json!(["vxlan source-interface Loopback1"]));

    let unsupported = &summary.results[12];
    assert_eq!(unsupported.severity, Severity::Warn);
    assert!(unsupported.message.contains("Unsupported check kind"));

    assert_eq!(summary.exit_code(), 1);
    assert_eq!(summary.counts_by_status()[&CheckStatus::Pass], 11);
}

#[tokio::test]
async fn test_warn_failures_do_not_block() {
    let mut intent = common::load_intent();
    intent.checks.retain(|c| c.name != "vxlan-basics");

    let adapter = common::healthy_adapter();
    let mut engine = CheckEngine::new(&intent, &adapter, EvidenceClient::disabled());
    let summary = engine.run(RunMode::All).await;

    assert_eq!(summary.failed().count(), 1);
    assert_eq!(summary.exit_code(), 0);
}

#[tokio::test]
async fn test_mode_selects_single_phase() {
    let intent = common::load_intent();
    let adapter = common::healthy_adapter();
    let mut engine = CheckEngine::new(&intent, &adapter, EvidenceClient::disabled());

    let summary = engine.run("control_plane".parse().unwrap()).await;
    assert_eq!(summary.len(), 3);
    assert!(summary.results.iter().all(|r| r.phase == Phase::ControlPlane));
    assert!(adapter.calls().iter().all(|(kind, _, _)| *kind == CallKind::EosCli));
}

#[tokio::test]
async fn test_failing_telemetry_path_requested_once() {
    let intent = common::load_intent();
    let adapter = common::healthy_adapter();
    let transport = Arc::new(StaticTransport::new());
    let mut engine = CheckEngine::new(&intent, &adapter, EvidenceClient::new(transport.clone()));

    let summary = engine.run(RunMode::Only(Phase::Underlay)).await;
    assert_eq!(summary.len(), 4);
    assert!(!summary.has_errors());

    // one interfaces path and one BGP path, each tried once
    assert_eq!(transport.requests(), 2);
    for node in ["leaf1", "leaf2", "spine1"] {
        assert_eq!(adapter.call_count(CallKind::EosCli, node, "show interfaces description"), 1);
    }
    assert!(engine.evidence().is_unsupported("/interfaces/interface/state"));
}

#[tokio::test]
async fn test_telemetry_evidence_is_used_when_available() {
    let intent = common::load_intent();
    let adapter = common::healthy_adapter();
    let transport = StaticTransport::new().with_path(
        "/interfaces/interface/state",
        json!({"parsed": [
            {"interface": "Et1", "status": "up", "protocol": "up", "description": "gnmi"},
            {"interface": "Et2", "status": "up", "protocol": "down", "description": "gnmi"},
        ]}),
    );
    let transport: Arc<dyn TelemetryTransport> = Arc::new(transport);
    let mut engine = CheckEngine::new(&intent, &adapter, EvidenceClient::new(transport));

    let check = intent.checks.iter().find(|c| c.name == "fabric-links").unwrap();
    let results = engine.run_check(check).await;

    assert_eq!(results.len(), 3);
    for result in &results {
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.evidence["source"], json!(EvidenceSource::Telemetry));
        assert_eq!(result.evidence["bad_interfaces"], json!(["Et2:up/down"]));
    }
    assert_eq!(adapter.call_count(CallKind::EosCli, "leaf1", "show interfaces description"), 0);
}

#[tokio::test]
async fn test_broken_node_crashes_one_check_and_run_continues() {
    let intent = common::load_intent();
    let adapter = common::healthy_adapter().with_broken_node("leaf2", "container clab-lab1-leaf2 is not running");
    let mut engine = CheckEngine::new(&intent, &adapter, EvidenceClient::disabled());

    let summary = engine.run(RunMode::All).await;
    let crashed: Vec<&str> = summary
        .results
        .iter()
        .filter(|r| r.message.starts_with("Check crashed:"))
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(crashed, vec!["fabric-links", "evpn-sessions"]);
    assert!(summary.results.iter().any(|r| r.name == "future-check"));

    let evpn = summary.results.iter().find(|r| r.name == "evpn-sessions").unwrap();
    assert_eq!(evpn.severity, Severity::Error);
    assert!(evpn.message.contains("is not running"));
}

#[tokio::test]
async fn test_ping_failure_is_data() {
    let intent = common::load_intent();
    let adapter = common::healthy_adapter()
        .with_exec("host1", "ping -c 2 -W 1 10.10.0.12", CmdResult::failed(1, "100% packet loss"));
    let mut engine = CheckEngine::new(&intent, &adapter, EvidenceClient::disabled());

    let summary = engine.run(RunMode::Only(Phase::Dataplane)).await;
    let ping = &summary.results[0];
    assert_eq!(ping.status, CheckStatus::Fail);
    assert_eq!(ping.evidence["rc"], 1);
    assert_eq!(summary.exit_code(), 1);
}

#[tokio::test]
async fn test_report_document() {
    let intent = common::load_intent();
    let adapter = common::healthy_adapter();
    let mut engine = CheckEngine::new(&intent, &adapter, EvidenceClient::disabled());

    let report = engine.run(RunMode::Only(Phase::Intent)).await.to_report();
    assert_eq!(report["summary"]["exit_code"], 1);
    assert_eq!(report["summary"]["counts_by_status"]["PASS"], 2);
    assert_eq!(report["summary"]["counts_by_status"]["SKIP"], 0);
    assert_eq!(report["summary"]["counts_by_phase"]["intent"], 3);
    assert_eq!(report["results"].as_array().unwrap().len(), 3);
}

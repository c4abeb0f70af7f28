mod common;

use fabdrift::{Adapter, CheckKind, ContainerlabAdapter, IntentLoader, IntentValidator, Phase, Selector, Severity};

#[test]
fn test_fixture_intent_loads() {
    let intent = common::load_intent();

    assert_eq!(intent.lab_name, "lab1");
    assert_eq!(intent.inventory.len(), 5);
    assert_eq!(intent.checks.len(), 9);
    assert_eq!(intent.telemetry.username, "admin");
    assert_eq!(intent.checks[4].phase, Phase::ControlPlane);
    assert_eq!(intent.checks[4].severity, Severity::Warn);
    assert_eq!(intent.checks[8].kind, CheckKind::Unsupported("frobnicate".to_string()));
}

#[test]
fn test_fixture_lint_flags_unknown_kind() {
    let intent = common::load_intent();
    let report = IntentValidator::validate(&intent);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].code, "W001");
    assert!(report.warnings[0].message.contains("future-check"));
}

#[test]
fn test_selectors_against_fixture_inventory() {
    let intent = common::load_intent();
    let inventory = &intent.inventory;

    assert_eq!(Selector::role("leaf").resolve(inventory), vec!["leaf1", "leaf2"]);
    assert_eq!(
        Selector::default().resolve(inventory),
        vec!["host1", "host2", "leaf1", "leaf2", "spine1"]
    );
    assert_eq!(
        Selector::role("leaf").with_group("rackB").resolve(inventory),
        vec!["leaf2"]
    );
    assert_eq!(
        Selector::nodes(["leaf2", "leaf1", "leaf2"]).resolve(inventory),
        vec!["leaf2", "leaf1", "leaf2"]
    );
    assert_eq!(Selector::node("ghost").resolve(inventory), vec!["ghost"]);
}

#[test]
fn test_dotted_path_lookup() {
    let intent = common::load_intent();
    assert_eq!(
        intent.resolve_path("services.tenant1.rack_b.vni").and_then(|v| v.as_i64()),
        Some(10120)
    );
    assert!(intent.resolve_path("services.tenant1.rack_c.vni").is_none());
}

#[test]
fn test_missing_lab_is_not_found() {
    let err = IntentLoader::new()
        .load_lab(common::fixtures_root(), "nolab")
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_containerlab_topology_from_fixture() {
    let adapter = ContainerlabAdapter::new(common::fixtures_root(), "lab1").unwrap();
    assert_eq!(adapter.list_nodes(), vec!["spine1", "leaf1", "leaf2", "host1", "host2"]);
    assert_eq!(adapter.node_kind("leaf1"), "ceos");
    assert_eq!(adapter.node_kind("host2"), "linux");
    assert_eq!(adapter.container_name("spine1"), "clab-lab1-spine1");
    assert!(adapter.desired_config_path("leaf1").exists());
}

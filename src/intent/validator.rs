use std::collections::HashSet;
use crate::check::{CheckDef, CheckKind, Selector};
use super::model::IntentModel;

#[derive(Debug, Clone)]
pub struct IntentWarning {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct IntentLintReport {
    pub lab_name: String,
    pub warnings: Vec<IntentWarning>,
}

impl IntentLintReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Non-fatal findings on a loaded intent. Structural errors are already
/// rejected by the loader; nothing here stops a run.
pub struct IntentValidator;

impl IntentValidator {
    pub fn validate(intent: &IntentModel) -> IntentLintReport {
        let mut warnings = Vec::new();

        Self::check_unsupported_kinds(intent, &mut warnings);
        Self::check_duplicate_names(intent, &mut warnings);
        Self::check_selector_nodes(intent, &mut warnings);
        Self::check_empty_inventory(intent, &mut warnings);

        IntentLintReport {
            lab_name: intent.lab_name.clone(),
            warnings,
        }
    }

    fn check_unsupported_kinds(intent: &IntentModel, warnings: &mut Vec<IntentWarning>) {
        for check in &intent.checks {
            if let CheckKind::Unsupported(kind) = &check.kind {
                warnings.push(IntentWarning {
                    code: "W001",
                    message: format!("check '{}': unsupported kind '{}' will always fail", check.name, kind),
                });
            }
        }
    }

    fn check_duplicate_names(intent: &IntentModel, warnings: &mut Vec<IntentWarning>) {
        let mut seen = HashSet::new();
        for check in &intent.checks {
            if !seen.insert(check.name.as_str()) {
                warnings.push(IntentWarning {
                    code: "W002",
                    message: format!("duplicate check name: {}", check.name),
                });
            }
        }
    }

    fn check_selector_nodes(intent: &IntentModel, warnings: &mut Vec<IntentWarning>) {
        for check in &intent.checks {
            let Some(selector) = selector_of(check) else {
                continue;
            };
            let named = selector
                .node
                .iter()
                .chain(selector.nodes.iter().flatten());
            for node in named {
                if !intent.inventory.contains(node) {
                    warnings.push(IntentWarning {
                        code: "W003",
                        message: format!("check '{}': node '{}' is not in the inventory", check.name, node),
                    });
                }
            }
        }
    }

    fn check_empty_inventory(intent: &IntentModel, warnings: &mut Vec<IntentWarning>) {
        if intent.inventory.is_empty() && !intent.checks.is_empty() {
            warnings.push(IntentWarning {
                code: "W004",
                message: "inventory has no nodes; role/group selectors will match nothing".to_string(),
            });
        }
    }
}

fn selector_of(check: &CheckDef) -> Option<Selector> {
    let value = check.params.get("selector")?;
    serde_json::from_value(value.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::IntentLoader;

    #[test]
    fn test_lint_findings() {
        let yaml = r#"
inventory:
  nodes:
    leaf1: {roles: [leaf]}
checks:
  - {name: a, phase: intent, kind: frobnicate}
  - {name: a, phase: intent, kind: config_contains, params: {selector: {nodes: [leaf1, leaf7]}}}
"#;
        let intent = IntentLoader::new().from_yaml_str(yaml, "lab").unwrap();
        let report = IntentValidator::validate(&intent);
        let codes: Vec<_> = report.warnings.iter().map(|w| w.code).collect();
        assert_eq!(codes, vec!["W001", "W002", "W003"]);
        assert!(report.warnings[2].message.contains("leaf7"));
    }

    #[test]
    fn test_lint_clean() {
        let yaml = "inventory: {nodes: {leaf1: {roles: [leaf]}}}\nchecks:\n  - {name: a, phase: intent, kind: config_contains}\n";
        let intent = IntentLoader::new().from_yaml_str(yaml, "lab").unwrap();
        assert!(!IntentValidator::validate(&intent).has_warnings());
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use crate::check::CheckDef;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryNode {
    #[serde(default)]
    pub roles: BTreeSet<String>,
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

impl InventoryNode {
    pub fn new<R, G>(roles: R, groups: G) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub nodes: BTreeMap<String, InventoryNode>,
}

impl Inventory {
    pub fn insert(&mut self, name: impl Into<String>, node: InventoryNode) {
        self.nodes.insert(name.into(), node);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Connection defaults for a structured telemetry transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryDefaults {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_credential")]
    pub username: String,
    #[serde(default = "default_credential")]
    pub password: String,
}

impl Default for TelemetryDefaults {
    fn default() -> Self {
        Self {
            port: default_port(),
            username: default_credential(),
            password: default_credential(),
        }
    }
}

fn default_port() -> u16 {
    6030
}

fn default_credential() -> String {
    "clab".to_string()
}

/// Fabric intent for one lab. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct IntentModel {
    pub lab_name: String,
    pub telemetry: TelemetryDefaults,
    pub inventory: Inventory,
    pub services: Map<String, Value>,
    pub checks: Vec<CheckDef>,
    pub raw: Value,
}

impl IntentModel {
    /// Look up a dotted path (`services.tenant1.vrf`) in the raw document.
    /// Missing keys and explicit nulls both resolve to `None`.
    pub fn resolve_path(&self, dotted: &str) -> Option<&Value> {
        resolve_path(&self.raw, dotted)
    }

    pub fn fingerprint_payload(&self) -> Value {
        serde_json::json!({
            "inventory": self.inventory,
            "services": self.services,
        })
    }
}

pub fn resolve_path<'a>(raw: &'a Value, dotted: &str) -> Option<&'a Value> {
    let mut current = raw;
    for key in dotted.split('.') {
        current = current.as_object()?.get(key)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// YAML allows non-string mapping keys (`10: {...}`); they become strings here.
pub fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_json).collect()),
        serde_yaml::Value::Mapping(mapping) => {
            let map = mapping
                .into_iter()
                .map(|(k, v)| (yaml_key(k), yaml_to_json(v)))
                .collect();
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_path_nested() {
        let raw = json!({"services": {"tenant1": {"vrf": "TENANT1", "vni": 10010}}});
        assert_eq!(resolve_path(&raw, "services.tenant1.vrf"), Some(&json!("TENANT1")));
        assert_eq!(resolve_path(&raw, "services.tenant1.vni"), Some(&json!(10010)));
    }

    #[test]
    fn test_resolve_path_missing_and_null() {
        let raw = json!({"a": {"b": null, "c": [1, 2]}});
        assert_eq!(resolve_path(&raw, "a.b"), None);
        assert_eq!(resolve_path(&raw, "a.x"), None);
        assert_eq!(resolve_path(&raw, "a.c.0"), None);
    }

    #[test]
    fn test_yaml_to_json_integer_keys() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("vlans:\n  10: {vni: 10010}\n  20: {vni: 10020}\n").unwrap();
        let value = yaml_to_json(yaml);
        assert_eq!(value["vlans"]["10"]["vni"], 10010);
        assert_eq!(value["vlans"]["20"]["vni"], 10020);
    }

    #[test]
    fn test_telemetry_defaults() {
        let defaults = TelemetryDefaults::default();
        assert_eq!(defaults.port, 6030);
        assert_eq!(defaults.username, "clab");
    }
}

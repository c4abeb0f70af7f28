use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::check::{plain_string, CheckDef, CheckKind, Phase, Severity};
use crate::error::{FabDriftError, Result};
use super::model::{yaml_to_json, IntentModel, Inventory, TelemetryDefaults};

/// Loads `<root>/<lab>/intent/intent.yml` into an [`IntentModel`].
///
/// Every structural problem is reported here, before any check runs.
pub struct IntentLoader;

impl IntentLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn intent_path(repo_root: impl AsRef<Path>, lab: &str) -> PathBuf {
        repo_root.as_ref().join(lab).join("intent").join("intent.yml")
    }

    pub fn load_lab(&self, repo_root: impl AsRef<Path>, lab: &str) -> Result<IntentModel> {
        let path = Self::intent_path(repo_root, lab);
        self.load_file(&path, lab)
    }

    pub fn load_file(&self, path: impl AsRef<Path>, lab: &str) -> Result<IntentModel> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|_| FabDriftError::IntentNotFound(path.display().to_string()))?;
        debug!("Loaded intent from {}", path.display());
        self.from_yaml_str(&content, lab)
    }

    pub fn from_yaml_str(&self, content: &str, lab: &str) -> Result<IntentModel> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
        let raw = match yaml_to_json(yaml) {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        let doc = raw
            .as_object()
            .ok_or_else(|| invalid("intent document must be a mapping"))?;

        let inventory_value = required(doc, "inventory")?;
        if !inventory_value.is_object() {
            return Err(invalid("inventory must be a mapping"));
        }
        let inventory: Inventory = serde_json::from_value(inventory_value.clone())
            .map_err(|e| invalid(format!("invalid inventory: {}", e)))?;

        let services = match doc.get("services") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => return Err(invalid("services must be a mapping")),
        };

        let check_list = required(doc, "checks")?
            .as_array()
            .ok_or_else(|| invalid("checks must be a list"))?;
        let checks = check_list
            .iter()
            .map(parse_check)
            .collect::<Result<Vec<_>>>()?;

        let telemetry = match doc.get("gnmi") {
            None | Some(Value::Null) => TelemetryDefaults::default(),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| invalid(format!("invalid gnmi section: {}", e)))?,
        };

        Ok(IntentModel {
            lab_name: lab.to_string(),
            telemetry,
            inventory,
            services,
            checks,
            raw,
        })
    }
}

impl Default for IntentLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(message: impl Into<String>) -> FabDriftError {
    FabDriftError::IntentValidation(message.into())
}

fn required<'a>(data: &'a Map<String, Value>, key: &str) -> Result<&'a Value> {
    data.get(key)
        .ok_or_else(|| invalid(format!("Missing required key: {}", key)))
}

fn parse_check(item: &Value) -> Result<CheckDef> {
    let entry = item
        .as_object()
        .ok_or_else(|| invalid("each check entry must be a mapping"))?;

    let name = plain_string(required(entry, "name")?);
    let phase: Phase = plain_string(required(entry, "phase")?).parse()?;
    if phase == Phase::Drift {
        return Err(invalid(format!("check '{}': phase 'drift' is reserved", name)));
    }
    let kind = CheckKind::parse(&plain_string(required(entry, "kind")?));

    let severity = entry
        .get("severity")
        .map(|v| Severity::parse_lenient(&plain_string(v)))
        .unwrap_or_default();

    let params = match entry.get("params") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => return Err(invalid(format!("check '{}': params must be a mapping", name))),
    };

    Ok(CheckDef { name, phase, kind, severity, params })
}

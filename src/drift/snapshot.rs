use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;
use crate::error::{FabDriftError, Result};
use super::diff::{diff_values, strip_volatile, DriftEntry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub hash: String,
    pub key_count: usize,
}

/// Operational state of a lab at one point in time, reduced to per-node hashes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "lab", alias = "label")]
    pub label: String,
    pub timestamp: DateTime<Utc>,
    pub intent_hash: String,
    #[serde(default)]
    pub fingerprints: BTreeMap<String, Fingerprint>,
}

impl Snapshot {
    pub fn new(label: impl Into<String>, intent_hash: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            timestamp: Utc::now(),
            intent_hash: intent_hash.into(),
            fingerprints: BTreeMap::new(),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Baseline saved: {}", path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| FabDriftError::Baseline(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| FabDriftError::Baseline(format!("{}: {}", path.display(), e)))
    }

    /// Document form with volatile fields removed.
    pub fn comparable(&self) -> Result<Value> {
        Ok(strip_volatile(&serde_json::to_value(self)?))
    }

    /// State drift from `self` (the baseline) to `current`.
    pub fn diff(&self, current: &Snapshot) -> Result<Vec<DriftEntry>> {
        Ok(diff_values(&self.comparable()?, &current.comparable()?))
    }
}

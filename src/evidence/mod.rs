mod client;
mod transport;
pub mod collectors;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use client::EvidenceClient;
pub use transport::{DisabledTransport, StaticTransport, TelemetryResponse, TelemetryTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceSource {
    Telemetry,
    Cli,
}

/// One piece of collected evidence and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub source: EvidenceSource,
    pub data: Value,
}

impl EvidenceRecord {
    pub fn telemetry(data: Value) -> Self {
        Self { source: EvidenceSource::Telemetry, data }
    }

    pub fn cli(data: Value) -> Self {
        Self { source: EvidenceSource::Cli, data }
    }

    /// Return code of a CLI-sourced record, if it carries one.
    pub fn rc(&self) -> Option<i64> {
        self.data.get("rc").and_then(Value::as_i64)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

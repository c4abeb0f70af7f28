use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use crate::intent::TelemetryDefaults;

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryResponse {
    pub ok: bool,
    pub payload: Value,
    pub error: Option<String>,
}

impl TelemetryResponse {
    pub fn success(payload: Value) -> Self {
        Self { ok: true, payload, error: None }
    }

    pub fn declined(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            payload: Value::Null,
            error: Some(error.into()),
        }
    }
}

/// Structured telemetry source. A declined request is a normal response,
/// not an error.
#[async_trait]
pub trait TelemetryTransport: Send + Sync {
    async fn get(&self, node: &str, path: &str) -> TelemetryResponse;
}

/// Declines every request, so each path is downgraded to CLI after its
/// first use. No gNMI client is linked; the endpoint only shows up in the
/// decline reason.
#[derive(Debug, Clone)]
pub struct DisabledTransport {
    port: u16,
    username: String,
}

impl DisabledTransport {
    pub fn new(defaults: &TelemetryDefaults) -> Self {
        Self {
            port: defaults.port,
            username: defaults.username.clone(),
        }
    }
}

impl Default for DisabledTransport {
    fn default() -> Self {
        Self::new(&TelemetryDefaults::default())
    }
}

#[async_trait]
impl TelemetryTransport for DisabledTransport {
    async fn get(&self, node: &str, path: &str) -> TelemetryResponse {
        TelemetryResponse::declined(format!(
            "telemetry not available for {} (no gNMI client for {}@{}:{})",
            path, self.username, node, self.port
        ))
    }
}

/// Serves fixed payloads per path and counts requests.
#[derive(Debug, Default)]
pub struct StaticTransport {
    payloads: HashMap<String, Value>,
    requests: AtomicUsize,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: &str, payload: Value) -> Self {
        self.payloads.insert(path.to_string(), payload);
        self
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TelemetryTransport for StaticTransport {
    async fn get(&self, _node: &str, path: &str) -> TelemetryResponse {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match self.payloads.get(path) {
            Some(payload) => TelemetryResponse::success(payload.clone()),
            None => TelemetryResponse::declined(format!("unsupported path {}", path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_transport_names_endpoint() {
        let defaults = TelemetryDefaults {
            port: 57400,
            username: "admin".to_string(),
            password: "secret".to_string(),
        };
        let response = DisabledTransport::new(&defaults).get("leaf1", "/interfaces").await;
        assert!(!response.ok);
        let error = response.error.unwrap();
        assert!(error.contains("admin@leaf1:57400"));
        assert!(!error.contains("secret"));
    }
}

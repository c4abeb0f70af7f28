use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};
use crate::error::Result;
use crate::intent::TelemetryDefaults;
use super::transport::{DisabledTransport, TelemetryTransport};
use super::EvidenceRecord;

/// Run-scoped evidence cache with telemetry-first collection.
///
/// Each cache key is collected at most once per run. A telemetry path that
/// fails once is marked unsupported for the rest of the run, for every node,
/// and later requests for it go straight to the CLI fallback.
pub struct EvidenceClient {
    transport: Arc<dyn TelemetryTransport>,
    cache: HashMap<String, EvidenceRecord>,
    unsupported: HashSet<String>,
}

impl EvidenceClient {
    pub fn new(transport: Arc<dyn TelemetryTransport>) -> Self {
        Self {
            transport,
            cache: HashMap::new(),
            unsupported: HashSet::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Arc::new(DisabledTransport::default()))
    }

    /// Client for a lab's `gnmi` settings.
    pub fn for_telemetry(defaults: &TelemetryDefaults) -> Self {
        Self::new(Arc::new(DisabledTransport::new(defaults)))
    }

    pub async fn collect<F, Fut>(
        &mut self,
        key: &str,
        path: &str,
        node: &str,
        fallback: F,
    ) -> Result<EvidenceRecord>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        if let Some(record) = self.cache.get(key) {
            return Ok(record.clone());
        }

        if !self.unsupported.contains(path) {
            let response = self.transport.get(node, path).await;
            if response.ok {
                debug!("Telemetry hit for {} ({})", key, path);
                let record = EvidenceRecord::telemetry(response.payload);
                self.cache.insert(key.to_string(), record.clone());
                return Ok(record);
            }
            warn!(
                "Telemetry path {} unsupported, using CLI for the rest of the run: {}",
                path,
                response.error.unwrap_or_default()
            );
            self.unsupported.insert(path.to_string());
        }

        self.collect_cli(key, fallback).await
    }

    /// Memoized CLI-only collection, for evidence with no telemetry path.
    pub async fn collect_cli<F, Fut>(&mut self, key: &str, fallback: F) -> Result<EvidenceRecord>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        if let Some(record) = self.cache.get(key) {
            return Ok(record.clone());
        }

        let record = EvidenceRecord::cli(fallback().await?);
        self.cache.insert(key.to_string(), record.clone());
        Ok(record)
    }

    pub fn is_unsupported(&self, path: &str) -> bool {
        self.unsupported.contains(path)
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl Default for EvidenceClient {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FabDriftError;
    use crate::evidence::{EvidenceSource, StaticTransport};
    use serde_json::json;
    use std::cell::Cell;

    const PATH: &str = "/interfaces/interface/state";

    #[tokio::test]
    async fn test_failing_path_is_requested_once() {
        let transport = Arc::new(StaticTransport::new());
        let mut client = EvidenceClient::new(transport.clone());
        let fallbacks = Cell::new(0);

        for node in ["leaf1", "leaf2", "spine1"] {
            let record = client
                .collect(&format!("interfaces:{}", node), PATH, node, || async {
                    fallbacks.set(fallbacks.get() + 1);
                    Ok(json!({"node": node}))
                })
                .await
                .unwrap();
            assert_eq!(record.source, EvidenceSource::Cli);
        }

        assert_eq!(transport.requests(), 1);
        assert_eq!(fallbacks.get(), 3);
        assert!(client.is_unsupported(PATH));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_everything() {
        let transport = Arc::new(StaticTransport::new().with_path(PATH, json!({"up": 4})));
        let mut client = EvidenceClient::new(transport.clone());

        let first = client
            .collect("interfaces:leaf1", PATH, "leaf1", || async { Ok(json!({})) })
            .await
            .unwrap();
        let second = client
            .collect("interfaces:leaf1", PATH, "leaf1", || async {
                Err(FabDriftError::adapter("leaf1", "should not run"))
            })
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.source, EvidenceSource::Telemetry);
        assert_eq!(first.data["up"], 4);
        assert_eq!(transport.requests(), 1);
        assert_eq!(client.cached(), 1);
    }

    #[tokio::test]
    async fn test_fallback_error_is_not_cached() {
        let mut client = EvidenceClient::disabled();

        let err = client
            .collect_cli("running-config:leaf1", || async {
                Err(FabDriftError::adapter("leaf1", "container gone"))
            })
            .await;
        assert!(err.is_err());
        assert_eq!(client.cached(), 0);

        let ok = client
            .collect_cli("running-config:leaf1", || async { Ok(json!({"rc": 0})) })
            .await
            .unwrap();
        assert_eq!(ok.rc(), Some(0));
    }
}

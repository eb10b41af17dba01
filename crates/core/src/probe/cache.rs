//! Process-wide memo of backend probe results.

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use super::types::{ProbeStatus, UnavailableReason};
use crate::backend::{BackendAdapter, BackendRegistry};
use crate::config::ProbeConfig;

type Slot = Arc<OnceCell<ProbeStatus>>;

/// Caches one [`ProbeStatus`] per adapter id.
///
/// Concurrent callers asking for the same adapter share a single in-flight
/// probe, so each tool is spawned at most once until the entry is
/// invalidated.
#[derive(Debug)]
pub struct ProbeCache {
    timeout: Duration,
    entries: Mutex<HashMap<String, Slot>>,
}

impl ProbeCache {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(config.timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the cached status for `adapter`, probing it on first use.
    pub async fn probe(&self, adapter: &dyn BackendAdapter) -> ProbeStatus {
        let slot = self.slot(adapter.id()).await;
        slot.get_or_init(|| self.run_probe(adapter)).await.clone()
    }

    /// Returns the cached status without probing.
    pub async fn cached(&self, id: &str) -> Option<ProbeStatus> {
        let entries = self.entries.lock().await;
        entries.get(id).and_then(|slot| slot.get().cloned())
    }

    /// Forgets the result for one adapter so the next lookup probes again.
    pub async fn invalidate(&self, id: &str) {
        if self.entries.lock().await.remove(id).is_some() {
            debug!("Invalidated probe result for {}", id);
        }
    }

    /// Forgets every cached result.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Invalidates and immediately probes one adapter.
    pub async fn reprobe(&self, adapter: &dyn BackendAdapter) -> ProbeStatus {
        self.invalidate(adapter.id()).await;
        self.probe(adapter).await
    }

    /// Probes every registered adapter concurrently.
    ///
    /// Results come back in registration order.
    pub async fn probe_all(&self, registry: &BackendRegistry) -> Vec<(String, ProbeStatus)> {
        let probes = registry.adapters().iter().map(|adapter| async move {
            let status = self.probe(adapter.as_ref()).await;
            (adapter.id().to_string(), status)
        });
        join_all(probes).await
    }

    async fn slot(&self, id: &str) -> Slot {
        let mut entries = self.entries.lock().await;
        entries
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    async fn run_probe(&self, adapter: &dyn BackendAdapter) -> ProbeStatus {
        debug!("Probing {}", adapter.id());
        let status = match tokio::time::timeout(self.timeout, adapter.probe()).await {
            Ok(status) => status,
            Err(_) => ProbeStatus::unavailable(UnavailableReason::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        };

        match &status {
            ProbeStatus::Available { version } => {
                info!("{} available: {}", adapter.display_name(), version)
            }
            ProbeStatus::Unavailable { reason } => {
                warn!("{} unavailable: {}", adapter.display_name(), reason)
            }
        }
        status
    }
}

//! Free-model probing and selection
//!
//! The prober walks the candidate list in priority order until one model
//! answers a minimal completion request. The winning selection is held in a
//! shared cache slot so later requests skip straight to forwarding.

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::core::upstream::{GeminiClient, UpstreamError};
use crate::utils::error::ServiceError;

/// Prompt used for availability probes. Each probe is a real metered call,
/// which is why successful selections are cached instead of re-probed.
pub const PROBE_PROMPT: &str = "Hello";

/// A confirmed-reachable model: its identifier plus the client used to talk
/// to it.
#[derive(Debug, Clone)]
pub struct SelectedModel {
    pub name: String,
    client: GeminiClient,
}

impl SelectedModel {
    fn new(name: String, client: GeminiClient) -> Self {
        Self { name, client }
    }

    /// Forward a completion request to this model.
    pub async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        self.client.generate(&self.name, prompt).await
    }
}

/// Availability of one candidate, as reported by [`ModelProber::probe_all`].
#[derive(Debug, Clone)]
pub struct CandidateStatus {
    pub name: String,
    pub available: bool,
    /// Failure detail when unavailable.
    pub detail: Option<String>,
}

/// Walks the candidate list looking for a reachable free model.
#[derive(Debug)]
pub struct ModelProber {
    client: GeminiClient,
    candidates: Vec<String>,
}

impl ModelProber {
    pub fn new(client: GeminiClient, candidates: Vec<String>) -> Self {
        Self { client, candidates }
    }

    /// Find the first candidate that answers a minimal completion request.
    pub async fn probe(&self) -> Result<SelectedModel, ServiceError> {
        for name in &self.candidates {
            info!(model = %name, "probing candidate model");
            match self.client.generate(name, PROBE_PROMPT).await {
                Ok(_) => {
                    info!(model = %name, "candidate model is available");
                    return Ok(SelectedModel::new(name.clone(), self.client.clone()));
                }
                Err(error) => {
                    warn!(model = %name, error = %error, "candidate model failed probe");
                }
            }
        }

        warn!("no candidate model passed probing");
        Err(ServiceError::NoModelAvailable)
    }

    /// Probe every candidate independently and report each outcome. Used by
    /// the model listing endpoint; never consults or updates the selection
    /// cache.
    pub async fn probe_all(&self) -> Vec<CandidateStatus> {
        let probes = self.candidates.iter().map(|name| async move {
            match self.client.generate(name, PROBE_PROMPT).await {
                Ok(_) => CandidateStatus {
                    name: name.clone(),
                    available: true,
                    detail: None,
                },
                Err(error) => CandidateStatus {
                    name: name.clone(),
                    available: false,
                    detail: Some(error.to_string()),
                },
            }
        });
        futures::future::join_all(probes).await
    }
}

/// Shared slot holding the currently selected model.
#[derive(Debug, Default)]
pub struct ModelCache {
    slot: Mutex<Option<SelectedModel>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached selection, probing first when the slot is empty.
    ///
    /// The lock is held across the probe so concurrent requests arriving
    /// with an empty slot cannot both probe; the second caller observes the
    /// first one's result. A failed probe leaves the slot empty.
    pub async fn get_or_probe(&self, prober: &ModelProber) -> Result<SelectedModel, ServiceError> {
        let mut slot = self.slot.lock().await;
        if let Some(selected) = slot.as_ref() {
            return Ok(selected.clone());
        }

        let selected = prober.probe().await?;
        *slot = Some(selected.clone());
        Ok(selected)
    }

    /// Drop the cached selection, returning the evicted model name.
    pub async fn invalidate(&self) -> Option<String> {
        self.slot.lock().await.take().map(|selected| selected.name)
    }

    /// Name of the currently cached model, if any.
    pub async fn cached_name(&self) -> Option<String> {
        self.slot
            .lock()
            .await
            .as_ref()
            .map(|selected| selected.name.clone())
    }
}

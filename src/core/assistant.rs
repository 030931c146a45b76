//! Question forwarding with model fallback
//!
//! Ties together admission control, model selection and the upstream client.
//! A request makes at most two passes: the initial attempt, plus one
//! re-probe-and-forward cycle if the selected model turns out to be gone.

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::core::limiter::RequestLimiter;
use crate::core::selection::{CandidateStatus, ModelCache, ModelProber};
use crate::core::upstream::{GeminiClient, UpstreamError};
use crate::utils::error::{Result, ServiceError};

/// Initial attempt plus one fallback retry.
const MAX_ATTEMPTS: u32 = 2;

/// Retry hint returned for quota failures when the upstream did not send one.
const DEFAULT_QUOTA_RETRY_SECS: u64 = 3600;

/// A successfully answered question.
#[derive(Debug, Clone)]
pub struct AssistantAnswer {
    /// Generated text to show the user.
    pub answer: String,
    /// Model that actually served the request.
    pub model: String,
    /// Outbound requests admitted in the current window, this one included.
    pub request_count: u32,
}

/// The assistant proxy service: owns the selection cache, the admission
/// window and the upstream client.
#[derive(Debug)]
pub struct AssistantService {
    client: GeminiClient,
    prober: ModelProber,
    cache: ModelCache,
    limiter: RequestLimiter,
}

impl AssistantService {
    pub fn new(config: &Config) -> Result<Self> {
        let client = GeminiClient::new(config.upstream.clone())?;
        Ok(Self {
            prober: ModelProber::new(client.clone(), config.upstream.candidates.clone()),
            cache: ModelCache::new(),
            limiter: RequestLimiter::new(&config.rate_limit),
            client,
        })
    }

    /// Answer a question with the currently selected free model.
    ///
    /// Each pass through the loop is individually admitted by the rate
    /// limiter, so a fallback retry counts as a fresh request against the
    /// window. When the limiter rejects the retry, the rate-limit error wins
    /// over the upstream failure that triggered it.
    pub async fn ask(&self, question: &str) -> Result<AssistantAnswer> {
        if !self.client.has_credential() {
            warn!("assistant request refused: no API key configured");
            return Err(ServiceError::MissingCredential);
        }

        let mut attempt = 1;
        loop {
            let admission = self.limiter.check_and_admit().await;
            if !admission.allowed {
                debug!(attempt = attempt, "request rejected by the admission window");
                return Err(ServiceError::RateLimited {
                    retry_after_secs: admission.retry_after_secs.unwrap_or(1),
                });
            }

            let selected = self.cache.get_or_probe(&self.prober).await?;
            info!(
                model = %selected.name,
                request = admission.count,
                attempt = attempt,
                "forwarding question to free model"
            );

            match selected.generate(question).await {
                Ok(answer) => {
                    return Ok(AssistantAnswer {
                        answer,
                        model: selected.name,
                        request_count: admission.count,
                    });
                }
                Err(err @ UpstreamError::ModelNotFound { .. }) => {
                    let evicted = self.cache.invalidate().await;
                    warn!(
                        model = ?evicted,
                        error = %err,
                        "selected model rejected the request, selection cleared"
                    );
                    if attempt >= MAX_ATTEMPTS {
                        return Err(err.into());
                    }
                    attempt += 1;
                }
                Err(UpstreamError::QuotaExhausted {
                    message,
                    retry_after,
                }) => {
                    // The model itself is fine, only throttled; keep it
                    // selected.
                    warn!(model = %selected.name, error = %message, "upstream quota exhausted");
                    return Err(ServiceError::UpstreamQuota {
                        retry_after_secs: retry_after.unwrap_or(DEFAULT_QUOTA_RETRY_SECS),
                    });
                }
                Err(err) => {
                    error!(model = %selected.name, error = %err, "upstream call failed");
                    return Err(err.into());
                }
            }
        }
    }

    /// Probe every configured candidate fresh and report availability.
    pub async fn free_models(&self) -> Vec<CandidateStatus> {
        self.prober.probe_all().await
    }

    /// Name of the currently selected model, if one is cached.
    pub async fn current_model(&self) -> Option<String> {
        self.cache.cached_name().await
    }
}

//! HTTP client for the Generative Language API
//!
//! One client instance is shared by the prober and every forwarded request;
//! cloning is cheap (the underlying connection pool is shared). The API key
//! travels as a query parameter, so URLs are never logged.

use serde_json::Value;
use tracing::debug;

use super::error::UpstreamError;
use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::config::UpstreamConfig;

/// Client for `models/{model}:generateContent` calls.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: UpstreamConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    /// Build a client from the upstream configuration.
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| UpstreamError::Network {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { config, http })
    }

    /// Whether a non-empty API key is configured.
    pub fn has_credential(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Send `prompt` to `model` and return the generated text.
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String, UpstreamError> {
        if !self.has_credential() {
            return Err(UpstreamError::MissingCredential);
        }

        let url = self.config.endpoint(model);
        let request = GenerateContentRequest::from_prompt(prompt);
        debug!(model = %model, prompt_chars = prompt.len(), "sending generateContent request");

        let timeout_secs = self.config.request_timeout_secs;
        let exchange = async {
            let response = self
                .http
                .post(&url)
                .json(&request)
                .send()
                .await
                .map_err(|e| transport_error(e, timeout_secs))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| transport_error(e, timeout_secs))?;
            Ok::<_, UpstreamError>((status, body))
        };

        let (status, body) = tokio::time::timeout(self.config.request_timeout(), exchange)
            .await
            .map_err(|_| UpstreamError::Timeout {
                seconds: timeout_secs,
            })??;

        if !(200..300).contains(&status) {
            debug!(model = %model, status = status, "upstream returned error status");
            return Err(UpstreamError::from_http_response(status, model, &body));
        }

        // A 200 body can still carry an error object on some API versions.
        let value: Value = serde_json::from_str(&body).map_err(|e| UpstreamError::Decode {
            message: format!("invalid JSON from upstream: {e}"),
        })?;
        if value.get("error").is_some() {
            return Err(UpstreamError::from_error_payload(&value, model));
        }

        let decoded: GenerateContentResponse =
            serde_json::from_value(value).map_err(|e| UpstreamError::Decode {
                message: format!("unexpected response shape: {e}"),
            })?;

        match decoded.text() {
            Some(text) => Ok(text),
            None => {
                let blocked = decoded
                    .prompt_feedback
                    .as_ref()
                    .and_then(|feedback| feedback.block_reason.as_deref());
                Err(match blocked {
                    Some(reason) => UpstreamError::InvalidRequest {
                        message: format!("prompt blocked by upstream safety filter: {reason}"),
                    },
                    None => UpstreamError::Decode {
                        message: "response contained no candidates".to_string(),
                    },
                })
            }
        }
    }
}

/// Classify a reqwest transport failure. The URL is stripped first so the
/// API key never reaches logs or client responses.
fn transport_error(error: reqwest::Error, timeout_secs: u64) -> UpstreamError {
    if error.is_timeout() {
        return UpstreamError::Timeout {
            seconds: timeout_secs,
        };
    }
    UpstreamError::Network {
        message: error.without_url().to_string(),
    }
}

//! Upstream error classification
//!
//! Maps HTTP status codes and the structured `{"error": {...}}` payloads
//! returned by the Generative Language API onto typed variants. Callers
//! branch on the variant, never on message substrings.

use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by the upstream text-generation service.
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// No API key configured; detected locally before any network call.
    #[error("no API key configured for the upstream service")]
    MissingCredential,

    /// The key was rejected or lacks permission.
    #[error("upstream authentication failed: {message}")]
    Authentication { message: String },

    /// The requested model does not exist or is not served by this API
    /// version. Selecting a different model can succeed.
    #[error("model '{model}' not found or unsupported")]
    ModelNotFound { model: String },

    /// The project's free-tier quota or rate limit is exhausted upstream.
    /// Retrying with another model will not help, the quota is per project.
    #[error("upstream quota exhausted: {message}")]
    QuotaExhausted {
        message: String,
        /// Retry hint in seconds, when the error payload carried one.
        retry_after: Option<u64>,
    },

    /// The request itself was rejected (malformed prompt, safety block).
    #[error("upstream rejected the request: {message}")]
    InvalidRequest { message: String },

    /// Transient upstream outage.
    #[error("upstream service unavailable: {message}")]
    Unavailable { message: String },

    /// Connection or transport failure before a response arrived.
    #[error("network error reaching upstream: {message}")]
    Network { message: String },

    /// No response within the configured deadline.
    #[error("upstream request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The response body could not be decoded into the expected shape.
    #[error("could not decode upstream response: {message}")]
    Decode { message: String },

    /// Anything the API returned that fits no narrower class.
    #[error("upstream API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl UpstreamError {
    /// Classify a non-2xx HTTP response. Prefers the structured error payload
    /// when the body carries one and falls back to the bare status code.
    pub fn from_http_response(status: u16, model: &str, body: &str) -> Self {
        if let Ok(value) = serde_json::from_str::<Value>(body) {
            if value.get("error").is_some() {
                return Self::from_error_payload(&value, model);
            }
        }

        let message = truncate(body, 200);
        match status {
            400 => Self::InvalidRequest { message },
            401 | 403 => Self::Authentication { message },
            404 => Self::ModelNotFound {
                model: model.to_string(),
            },
            429 => Self::QuotaExhausted {
                message,
                retry_after: None,
            },
            500..=599 => Self::Unavailable { message },
            _ => Self::Api { status, message },
        }
    }

    /// Classify a structured `{"error": {"code", "message", "status"}}`
    /// payload as emitted by Google APIs.
    pub fn from_error_payload(payload: &Value, model: &str) -> Self {
        let error = &payload["error"];
        let code = error.get("code").and_then(Value::as_u64).unwrap_or(0) as u16;
        let status = error.get("status").and_then(Value::as_str).unwrap_or("");
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown upstream error")
            .to_string();

        match (code, status) {
            (404, _) | (_, "NOT_FOUND") => Self::ModelNotFound {
                model: model.to_string(),
            },
            (429, _) | (_, "RESOURCE_EXHAUSTED") => Self::QuotaExhausted {
                message,
                retry_after: retry_hint(error),
            },
            (401, _) | (_, "UNAUTHENTICATED") => Self::Authentication { message },
            (403, _) | (_, "PERMISSION_DENIED") => Self::Authentication { message },
            (400, _) | (_, "INVALID_ARGUMENT") | (_, "FAILED_PRECONDITION") => {
                Self::InvalidRequest { message }
            }
            (503, _) | (_, "UNAVAILABLE") => Self::Unavailable { message },
            (0, _) => Self::Api {
                status: 500,
                message,
            },
            _ => Self::Api {
                status: code,
                message,
            },
        }
    }
}

/// Pull a retry hint out of the error's `details` array. Google attaches a
/// `google.rpc.RetryInfo` detail with a `retryDelay` like `"37s"`.
fn retry_hint(error: &Value) -> Option<u64> {
    let details = error.get("details")?.as_array()?;
    for detail in details {
        if let Some(delay) = detail.get("retryDelay").and_then(Value::as_str) {
            if let Ok(seconds) = delay.trim_end_matches('s').parse::<u64>() {
                return Some(seconds);
            }
        }
    }
    None
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        text.to_string()
    } else {
        let mut end = max;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}

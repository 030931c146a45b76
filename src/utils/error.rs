//! Service error types and HTTP response rendering
//!
//! Every failure path in the proxy funnels into [`ServiceError`], which knows
//! how to render itself as the exact JSON shapes the mobile app consumes.
//! The `answer` field always carries a human-readable notice the app can show
//! in the chat thread as-is, while `error` carries the diagnostic detail.

use crate::core::upstream::UpstreamError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Canned notice shown to the user when the local request window is full.
pub const RATE_LIMIT_ANSWER: &str = "請求太頻繁，請稍後再試。免費版本有使用限制。";

/// Canned notice shown to the user when the upstream free quota is exhausted.
pub const QUOTA_ANSWER: &str = "免費額度已用完，請稍後再試或考慮升級到付費版本。";

/// Canned notice shown to the user for any other failure.
pub const UNAVAILABLE_ANSWER: &str = "抱歉，免費的 AI 助手暫時無法使用。請稍後再試或檢查免費額度。";

/// Canned notice shown to the user when the server has no API key configured.
pub const MISSING_KEY_ANSWER: &str = "API Key 未設定";

/// Canned notice shown to the user when the question was empty.
pub const EMPTY_QUESTION_ANSWER: &str = "請提供問題內容。";

/// Top-level error type for the assistant service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The incoming request was malformed (empty or missing question).
    #[error("{0}")]
    Validation(String),

    /// No upstream credential is configured; nothing was attempted.
    #[error("GOOGLE_API_KEY is not configured")]
    MissingCredential,

    /// The proxy's own outbound request window is full.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The upstream free-tier quota is exhausted.
    #[error("upstream quota exceeded, retry after {retry_after_secs}s")]
    UpstreamQuota { retry_after_secs: u64 },

    /// Every candidate model failed its probe.
    #[error("no free model is currently available")]
    NoModelAvailable,

    /// A forward or probe failed in a way that is surfaced directly.
    #[error("{0}")]
    Upstream(#[from] UpstreamError),

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP server itself failed to bind or run.
    #[error("server error: {0}")]
    Server(String),
}

/// Body of the two 429 responses (local window and upstream quota).
#[derive(Debug, Serialize)]
pub struct RetryAfterBody {
    pub answer: &'static str,
    pub error: &'static str,
    #[serde(rename = "retryAfter")]
    pub retry_after: u64,
}

/// Body of every non-429 failure response.
#[derive(Debug, Serialize)]
pub struct FailureBody {
    pub answer: &'static str,
    pub error: String,
    pub status: &'static str,
    pub plan: &'static str,
}

impl FailureBody {
    fn new(answer: &'static str, error: String) -> Self {
        Self {
            answer,
            error,
            status: "error",
            plan: "free",
        }
    }
}

impl ServiceError {
    /// The canned user-facing notice for this failure class.
    fn answer(&self) -> &'static str {
        match self {
            Self::Validation(_) => EMPTY_QUESTION_ANSWER,
            Self::MissingCredential => MISSING_KEY_ANSWER,
            Self::RateLimited { .. } => RATE_LIMIT_ANSWER,
            Self::UpstreamQuota { .. } => QUOTA_ANSWER,
            _ => UNAVAILABLE_ANSWER,
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited { .. } | Self::UpstreamQuota { .. } => {
                StatusCode::TOO_MANY_REQUESTS
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::RateLimited { retry_after_secs } => {
                HttpResponse::TooManyRequests().json(RetryAfterBody {
                    answer: RATE_LIMIT_ANSWER,
                    error: "Rate limit exceeded",
                    retry_after: *retry_after_secs,
                })
            }
            Self::UpstreamQuota { retry_after_secs } => {
                HttpResponse::TooManyRequests().json(RetryAfterBody {
                    answer: QUOTA_ANSWER,
                    error: "Quota exceeded",
                    retry_after: *retry_after_secs,
                })
            }
            _ => HttpResponse::build(self.status_code())
                .json(FailureBody::new(self.answer(), self.to_string())),
        }
    }
}

//! Canned Generative Language API responses and matchers

use serde_json::json;
use wiremock::matchers::body_partial_json;
use wiremock::{Match, ResponseTemplate};

/// Path of the generateContent endpoint for `model`.
pub fn model_path(model: &str) -> String {
    format!("/v1beta/models/{model}:generateContent")
}

/// Matches the availability probe request.
pub fn probe_matcher() -> impl Match {
    text_matcher("Hello")
}

/// Matches a request whose first part carries exactly `text`.
pub fn text_matcher(text: &str) -> impl Match {
    body_partial_json(json!({"contents": [{"parts": [{"text": text}]}]}))
}

/// A successful generation answering with `text`.
pub fn answer(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }]
    }))
}

/// The structured 404 returned for unknown models.
pub fn not_found(model: &str) -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "error": {
            "code": 404,
            "message": format!("models/{model} is not found for API version v1beta"),
            "status": "NOT_FOUND"
        }
    }))
}

/// The structured 429 returned when the free-tier quota is exhausted.
/// `retry_delay` is the optional RetryInfo hint, e.g. `"39s"`.
pub fn quota_exhausted(retry_delay: Option<&str>) -> ResponseTemplate {
    let mut error = json!({
        "code": 429,
        "message": "You exceeded your current quota, please check your plan and billing details",
        "status": "RESOURCE_EXHAUSTED"
    });
    if let Some(delay) = retry_delay {
        error["details"] = json!([{
            "@type": "type.googleapis.com/google.rpc.RetryInfo",
            "retryDelay": delay
        }]);
    }
    ResponseTemplate::new(429).set_body_json(json!({"error": error}))
}

/// A transient 503 from the upstream.
pub fn unavailable() -> ResponseTemplate {
    ResponseTemplate::new(503).set_body_json(json!({
        "error": {
            "code": 503,
            "message": "The model is overloaded. Please try again later.",
            "status": "UNAVAILABLE"
        }
    }))
}

//! Liveness endpoint

use actix_web::{HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

/// Payload returned from `GET /`. The mobile app pings this endpoint to wake
/// the host before sending a first question.
#[derive(Debug, Clone, Serialize)]
pub struct LivenessStatus {
    pub message: &'static str,
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Liveness check.
pub async fn liveness() -> ActixResult<HttpResponse> {
    debug!("liveness check requested");
    Ok(HttpResponse::Ok().json(LivenessStatus {
        message: "Poopalooza AI Assistant API is running!",
        status: "healthy",
        timestamp: Utc::now(),
    }))
}

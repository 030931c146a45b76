//! Chat assistant endpoint

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::server::state::AppState;
use crate::utils::error::ServiceError;

/// Fixed notice attached to every successful answer, reminding the user the
/// free plan has usage limits.
const FREE_PLAN_MESSAGE: &str = "使用免費版本 - 有使用限制";

/// Body of `POST /api/assistant`.
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
}

/// Successful answer payload.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub model: String,
    pub status: &'static str,
    pub plan: &'static str,
    #[serde(rename = "requestCount")]
    pub request_count: u32,
    pub message: &'static str,
}

/// Handle `POST /api/assistant`: validate, then hand off to the service.
pub async fn ask(
    state: web::Data<AppState>,
    request: web::Json<AskRequest>,
) -> Result<HttpResponse, ServiceError> {
    let question = request
        .question
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if question.is_empty() {
        return Err(ServiceError::Validation(
            "question must not be empty".to_string(),
        ));
    }

    let answered = state.assistant.ask(question).await?;
    info!(
        model = %answered.model,
        request = answered.request_count,
        "question answered"
    );

    Ok(HttpResponse::Ok().json(AnswerResponse {
        answer: answered.answer,
        model: answered.model,
        status: "success",
        plan: "free",
        request_count: answered.request_count,
        message: FREE_PLAN_MESSAGE,
    }))
}

//! Free-model availability listing

use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use tracing::debug;

use crate::server::state::AppState;

/// Availability entry for one candidate model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub name: String,
    pub status: String,
    pub available: bool,
    pub limits: String,
    pub cost: &'static str,
}

/// Body of `GET /api/models/free`.
#[derive(Debug, Clone, Serialize)]
pub struct ModelListResponse {
    pub models: Vec<ModelStatus>,
    pub plan: &'static str,
    pub note: &'static str,
}

/// Published free-tier limits for the models we know about.
fn free_tier_limits(model: &str) -> &'static str {
    match model {
        "gemini-1.5-flash" => "15 requests/min, 1,500/day",
        "gemini-1.5-pro" => "2 requests/min, 50/day",
        "gemini-1.0-pro" => "15 requests/min, 1,500/day",
        _ => "",
    }
}

/// Handle `GET /api/models/free`: probe every configured candidate fresh,
/// bypassing the selection cache.
pub async fn list_free_models(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("free model availability requested");
    let statuses = state.assistant.free_models().await;

    let models = statuses
        .into_iter()
        .map(|probe| ModelStatus {
            status: match &probe.detail {
                None => "✅ 免費可用".to_string(),
                Some(reason) => format!("❌ 不可用: {reason}"),
            },
            available: probe.available,
            limits: free_tier_limits(&probe.name).to_string(),
            cost: if probe.available { "FREE 🎉" } else { "FREE" },
            name: probe.name,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ModelListResponse {
        models,
        plan: "free",
        note: "所有模型都是免費使用，但有使用限制",
    }))
}

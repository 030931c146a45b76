//! Application state

use std::sync::Arc;

use crate::config::Config;
use crate::core::assistant::AssistantService;
use crate::utils::error::Result;

/// State shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The assistant proxy service.
    pub assistant: Arc<AssistantService>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let assistant = AssistantService::new(&config)?;
        Ok(Self {
            assistant: Arc::new(assistant),
        })
    }
}

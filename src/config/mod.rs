//! Configuration management
//!
//! Settings come from three layers, weakest first: built-in defaults, an
//! optional YAML file, then environment variables. The API key is
//! environment-only.

pub mod models;

pub use models::{RateLimitConfig, ServerConfig, UpstreamConfig};

use std::env;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::utils::error::{Result, ServiceError};

/// Default config file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/assistant.yaml";

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Config {
    /// Load configuration from a YAML file.
    pub async fn from_file(path: &str) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ServiceError::Config(format!("failed to read config file {path}: {e}"))
        })?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| ServiceError::Config(format!("failed to parse config file: {e}")))?;
        debug!("loaded configuration from {}", path);
        Ok(config)
    }

    /// Load the effective configuration: file (when present), then
    /// environment overrides, then validation.
    pub async fn load() -> Result<Self> {
        let mut config = match Self::from_file(DEFAULT_CONFIG_PATH).await {
            Ok(config) => config,
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// `GOOGLE_API_KEY` is the canonical credential variable; `GEMINI_API_KEY`
    /// is accepted as a fallback.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(host) = env::var("ASSISTANT_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| ServiceError::Config(format!("invalid PORT: {e}")))?;
        }
        if let Ok(key) = env::var("GOOGLE_API_KEY") {
            self.upstream.api_key = Some(key);
        } else if let Ok(key) = env::var("GEMINI_API_KEY") {
            self.upstream.api_key = Some(key);
        }
        Ok(())
    }

    /// Check invariants that would otherwise surface as confusing runtime
    /// failures.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ServiceError::Config("server port must be non-zero".to_string()));
        }
        if self.upstream.candidates.is_empty() {
            return Err(ServiceError::Config(
                "at least one candidate model is required".to_string(),
            ));
        }
        if self.upstream.request_timeout_secs == 0 || self.upstream.connect_timeout_secs == 0 {
            return Err(ServiceError::Config(
                "upstream timeouts must be non-zero".to_string(),
            ));
        }
        if self.upstream.connect_timeout_secs > self.upstream.request_timeout_secs {
            return Err(ServiceError::Config(
                "connect timeout must not exceed the request timeout".to_string(),
            ));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(ServiceError::Config(
                "rate limit ceiling must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(ServiceError::Config(
                "rate limit window must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}

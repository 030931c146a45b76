//! # Poopalooza Assistant
//!
//! Backend proxy for the Poopalooza mobile app's AI chat assistant. The
//! proxy walks a fixed list of free-tier Gemini models, caches the first one
//! that answers a probe, forwards user questions to it, and falls back to
//! re-probing once when the selected model disappears mid-flight. A single
//! process-wide window caps outbound request volume so the app stays inside
//! the free quota.
//!
//! ## Endpoints
//!
//! - `POST /api/assistant` - forward a question to the selected free model
//! - `GET /api/models/free` - probe every candidate and report availability
//! - `GET /` - liveness check, used by the app to wake the host
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use poopalooza_assistant::Config;
//! use poopalooza_assistant::server::HttpServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load().await?;
//!     HttpServer::new(&config)?.start().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::assistant::{AssistantAnswer, AssistantService};
pub use utils::error::{Result, ServiceError};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

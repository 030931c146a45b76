//! Upstream text-generation service (Google Generative Language API)

pub mod client;
pub mod error;
pub mod types;

pub use client::GeminiClient;
pub use error::UpstreamError;

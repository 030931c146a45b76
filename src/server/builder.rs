//! Server startup with automatic configuration loading

use tracing::info;

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::Result;

/// Run the server with automatic configuration loading.
pub async fn run_server() -> Result<()> {
    info!("🚀 Starting Poopalooza AI Assistant");

    let config = Config::load().await?;
    info!(
        "API key loaded: {}",
        if config.upstream.api_key.is_some() {
            "✓"
        } else {
            "✗"
        }
    );

    let server = HttpServer::new(&config)?;
    info!(
        "🌐 Server starting at: http://{}:{}",
        server.config().host,
        server.config().port
    );
    info!("📋 API Endpoints:");
    info!("   GET  /                - liveness check");
    info!("   POST /api/assistant   - ask the assistant");
    info!("   GET  /api/models/free - free model availability");

    server.start().await
}

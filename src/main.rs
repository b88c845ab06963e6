//! Landing page + chat widget server.
//!
//! Entry point: loads configuration and serves the landing page.

use std::sync::Arc;

use dotenvy::dotenv;
use mimalloc::MiMalloc;

use landing_chat::client::HttpChatBackend;
use landing_chat::config::AppConfig;
use landing_chat::server::start_server;
use landing_chat::telemetry;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {err}");
            std::process::exit(1);
        }
    };

    // Initialize tracing (M-LOG-STRUCTURED)
    telemetry::init(config.logging.format, &config.logging.filter);

    let backend = Arc::new(HttpChatBackend::new());
    tracing::info!(
        name: "chat.endpoint",
        endpoint = %backend.endpoint(),
        "Chat endpoint configured"
    );

    start_server(Arc::new(config), backend).await
}

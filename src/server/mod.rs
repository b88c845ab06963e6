//! HTTP server.
//!
//! Serves the landing page, the widget endpoints and static assets. Widget
//! state lives in the [`WidgetRegistry`]; the browser only forwards clicks
//! and submits and applies what the event stream sends back.

pub mod handlers;
pub mod sse;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::client::ChatBackend;
use crate::config::AppConfig;
use crate::widget::WidgetRegistry;

use handlers::{
    close_handler, events_handler, index_handler, send_handler, state_handler, toggle_handler,
    unmount_handler,
};

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config.server.static_dir);

    Router::new()
        // HTML pages
        .route("/", get(index_handler))
        // Widget API
        .route("/widget/{id}/toggle", post(toggle_handler))
        .route("/widget/{id}/close", post(close_handler))
        .route("/widget/{id}/send", post(send_handler))
        .route("/widget/{id}/events", get(events_handler))
        .route("/widget/{id}/state", get(state_handler))
        .route("/widget/{id}/unmount", post(unmount_handler))
        // Static assets
        .nest_service("/static", static_dir)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server with the provided configuration.
pub async fn start_server(
    config: Arc<AppConfig>,
    backend: Arc<dyn ChatBackend>,
) -> anyhow::Result<()> {
    let widgets = WidgetRegistry::new(backend, config.widget.settings());
    widgets.spawn_sweeper(
        config.widget.sweep_interval(),
        config.widget.idle_timeout(),
    );

    let state = AppState {
        widgets,
        config: Arc::clone(&config),
    };
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

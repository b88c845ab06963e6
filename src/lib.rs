//! Landing page with a floating chat widget.
//!
//! A server-rendered landing page mounts one chat widget per page view. The
//! widget's session state lives on the server; the browser forwards clicks
//! and submits and receives rendered updates over Server-Sent Events.
//!
//! # Architecture
//!
//! - **Server**: Axum router for the page, widget endpoints and SSE
//! - **Widget**: per-mount session state, greeting timer and send flow
//! - **Client**: the remote chat endpoint behind a small trait
//! - **UI**: HTML rendered with `format!`, plus a custom element in `static/`
//!
//! # Modules
//!
//! - [`client`]: remote chat endpoint
//! - [`config`]: layered configuration
//! - [`events`]: widget change events
//! - [`server`]: router and handlers
//! - [`telemetry`]: logging setup
//! - [`ui`]: HTML rendering
//! - [`widget`]: widget state and lifecycle

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unused_async)]

pub mod client;
pub mod config;
pub mod events;
pub mod server;
pub mod telemetry;
pub mod ui;
pub mod widget;

use std::sync::Arc;

use crate::config::AppConfig;
use widget::WidgetRegistry;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Mounted widgets.
    pub widgets: WidgetRegistry,
    /// Global configuration.
    pub config: Arc<AppConfig>,
}

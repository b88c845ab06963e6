//! HTTP handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::{Deserialize, Serialize};

use super::sse::build_sse_response;
use crate::AppState;
use crate::ui::landing::landing_page;
use crate::widget::{ChatWidget, WidgetSnapshot};

/// Request body for the send endpoint.
#[derive(Debug, Deserialize, Serialize)]
pub struct SendRequest {
    /// Current contents of the input field.
    pub message: String,
}

/// Response from the send endpoint.
#[derive(Debug, Deserialize, Serialize)]
pub struct SendResponse {
    /// Whether a send was started.
    pub accepted: bool,
    /// Input field contents after the call.
    pub input: String,
}

/// Response from the toggle and close endpoints.
#[derive(Debug, Deserialize, Serialize)]
pub struct PanelResponse {
    /// Panel visibility after the call.
    pub open: bool,
}

fn lookup(state: &AppState, id: &str) -> Result<ChatWidget, StatusCode> {
    state.widgets.get(id).ok_or(StatusCode::NOT_FOUND)
}

/// GET / - Render the landing page with a freshly mounted widget.
pub async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    let widget = state.widgets.mount();
    Html(landing_page(&widget.snapshot()))
}

/// POST /widget/:id/toggle - Flip panel visibility.
pub async fn toggle_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PanelResponse>, StatusCode> {
    let widget = lookup(&state, &id)?;
    let open = widget.toggle();
    Ok(Json(PanelResponse { open }))
}

/// POST /widget/:id/close - Hide the panel.
pub async fn close_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PanelResponse>, StatusCode> {
    let widget = lookup(&state, &id)?;
    widget.close();
    Ok(Json(PanelResponse { open: false }))
}

/// POST /widget/:id/send - Submit the input field.
///
/// Answers `202 Accepted` once the user message is appended; the reply is
/// delivered over the event stream. A blank message is answered with `200`
/// and changes nothing.
pub async fn send_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SendRequest>,
) -> Result<(StatusCode, Json<SendResponse>), StatusCode> {
    let widget = lookup(&state, &id)?;

    widget.set_input(req.message);
    let accepted = widget.submit().is_some();

    tracing::debug!(widget_id = %id, accepted, "Send requested");

    let status = if accepted {
        StatusCode::ACCEPTED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(SendResponse {
            accepted,
            input: widget.snapshot().pending_input,
        }),
    ))
}

/// GET /widget/:id/events - Stream widget updates.
pub async fn events_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let widget = lookup(&state, &id)?;
    widget.touch();
    Ok(build_sse_response(widget))
}

/// GET /widget/:id/state - Current widget state.
pub async fn state_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WidgetSnapshot>, StatusCode> {
    let widget = lookup(&state, &id)?;
    Ok(Json(widget.snapshot()))
}

/// POST /widget/:id/unmount - Discard the widget.
pub async fn unmount_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> StatusCode {
    match state.widgets.unmount(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

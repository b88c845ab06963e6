//! Remote chat endpoint.
//!
//! The widget has exactly one outbound dependency: a JSON endpoint that takes
//! `{"message": "..."}` and may answer with `{"reply": "..."}`. The
//! [`ChatBackend`] trait is the seam between the widget and that endpoint so
//! the send flow can be driven by scripted backends in tests.
//!
//! - [`HttpChatBackend`]: the real endpoint over reqwest
//! - [`ChatError`]: everything that can go wrong on the way

mod error;
mod http;

pub use error::{ChatError, Result};
pub use http::{CHAT_ENDPOINT, HttpChatBackend};

use serde_json::Value;

/// Something that answers chat messages.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync + std::fmt::Debug {
    /// Send one message.
    ///
    /// `Ok(None)` means the call succeeded but carried no usable reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the call failed or the answer was not a JSON value.
    async fn send(&self, message: &str) -> Result<Option<String>>;
}

/// Pull the reply text out of a decoded response body.
///
/// A non-empty string is used as is. Non-zero numbers and `true` are shown in
/// their JSON form. A missing, empty, zero, `false`, `null`, array or object
/// `reply` yields `Ok(None)`. A `null` body is an error, matching a client
/// that dereferences the body before reading the field.
pub fn extract_reply(body: &Value) -> Result<Option<String>> {
    if body.is_null() {
        return Err(ChatError::EmptyBody);
    }

    let reply = match body.get("reply") {
        Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
        Some(Value::Number(n)) if n.as_f64().is_some_and(|v| v.abs() > 0.0) => {
            Some(n.to_string())
        }
        Some(Value::Bool(true)) => Some("true".to_string()),
        _ => None,
    };
    Ok(reply)
}

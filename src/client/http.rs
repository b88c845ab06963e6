//! reqwest-backed chat endpoint.

use serde::Serialize;
use url::Url;

use super::error::Result;
use super::{ChatBackend, extract_reply};

/// The only endpoint the widget talks to.
pub const CHAT_ENDPOINT: &str = "http://localhost:8080/api/chat";

/// Request body posted to the endpoint.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// POSTs each message as JSON and reads `reply` from the JSON answer.
///
/// Uses the transport defaults: no request timeout, no retries, no auth. The
/// HTTP status is not inspected; a `500` carrying `{"reply": "..."}` is still
/// a reply.
///
/// # Example
///
/// ```rust,no_run
/// use landing_chat::client::{ChatBackend, HttpChatBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpChatBackend::new();
/// let reply = backend.send("Hello!").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    endpoint: Url,
    http: reqwest::Client,
}

impl Default for HttpChatBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpChatBackend {
    /// Backend for the fixed [`CHAT_ENDPOINT`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            endpoint: Url::parse(CHAT_ENDPOINT).expect("CHAT_ENDPOINT is a valid URL"),
            http: reqwest::Client::new(),
        }
    }

    /// Backend for an explicit endpoint (stub servers in tests).
    pub fn with_endpoint(endpoint: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            endpoint: Url::parse(endpoint.as_ref())?,
            http: reqwest::Client::new(),
        })
    }

    /// Target URL.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send(&self, message: &str) -> Result<Option<String>> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&ChatRequest { message })
            .send()
            .await?;

        tracing::debug!(
            name: "chat.request.completed",
            status = response.status().as_u16(),
            "Chat endpoint answered"
        );

        let body = response.bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&body)?;
        extract_reply(&value)
    }
}

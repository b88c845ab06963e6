//! Integration tests for the HTTP surface.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use axum_test::TestServer;
use futures::StreamExt;
use serde_json::json;
use tokio::sync::Semaphore;
use tower::ServiceExt;

use landing_chat::AppState;
use landing_chat::client::{ChatBackend, Result as ChatResult};
use landing_chat::config::{AppConfig, LoggingConfig, ServerConfig, WidgetConfig};
use landing_chat::events::WidgetEvent;
use landing_chat::server::build_router;
use landing_chat::server::handlers::{PanelResponse, SendResponse};
use landing_chat::widget::{GREETING_TEXT, Sender, WidgetRegistry, WidgetSnapshot};

/// Replies `re: <message>` once a permit is released.
#[derive(Debug)]
struct Scripted {
    gate: Semaphore,
}

impl Scripted {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            gate: Semaphore::new(0),
        })
    }

    fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait::async_trait]
impl ChatBackend for Scripted {
    async fn send(&self, message: &str) -> ChatResult<Option<String>> {
        let permit = self.gate.acquire().await.expect("gate closed");
        permit.forget();
        Ok(Some(format!("re: {message}")))
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
            static_dir: "static".to_string(),
        },
        widget: WidgetConfig {
            greeting_min_ms: 20,
            greeting_max_ms: 20,
            idle_timeout_secs: 1800,
            sweep_interval_secs: 60,
            event_buffer: 64,
        },
        logging: LoggingConfig::default(),
    }
}

fn test_state(backend: Arc<Scripted>) -> AppState {
    let config = Arc::new(test_config());
    AppState {
        widgets: WidgetRegistry::new(backend, config.widget.settings()),
        config,
    }
}

/// Render the landing page and return the id of the widget it mounted.
async fn mount_via_index(server: &TestServer, state: &AppState) -> String {
    let response = server.get("/").await;
    response.assert_status_ok();
    let ids = state.widgets.list_ids();
    assert_eq!(ids.len(), 1);
    ids.into_iter().next().unwrap()
}

#[tokio::test]
async fn test_index_mounts_widget() {
    let state = test_state(Scripted::new());
    let server = TestServer::new(build_router(state.clone())).unwrap();

    let response = server.get("/").await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Welcome to My Chat App"));
    assert!(html.contains("<chat-widget"));

    let ids = state.widgets.list_ids();
    assert_eq!(ids.len(), 1);
    assert!(html.contains(&format!("data-widget-id=\"{}\"", ids[0])));

    // Each page view gets its own widget
    server.get("/").await.assert_status_ok();
    assert_eq!(state.widgets.len(), 2);
}

#[tokio::test]
async fn test_toggle_and_close() {
    let state = test_state(Scripted::new());
    let server = TestServer::new(build_router(state.clone())).unwrap();
    let id = mount_via_index(&server, &state).await;

    let opened: PanelResponse = server.post(&format!("/widget/{id}/toggle")).await.json();
    assert!(opened.open);

    let closed: PanelResponse = server.post(&format!("/widget/{id}/close")).await.json();
    assert!(!closed.open);

    // Closing twice is harmless
    let closed: PanelResponse = server.post(&format!("/widget/{id}/close")).await.json();
    assert!(!closed.open);

    let reopened: PanelResponse = server.post(&format!("/widget/{id}/toggle")).await.json();
    assert!(reopened.open);
}

#[tokio::test]
async fn test_greeting_reaches_state() {
    let state = test_state(Scripted::new());
    let server = TestServer::new(build_router(state.clone())).unwrap();
    let id = mount_via_index(&server, &state).await;

    let widget = state.widgets.get(&id).unwrap();
    let mut events = widget.subscribe();

    server
        .post(&format!("/widget/{id}/toggle"))
        .await
        .assert_status_ok();

    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Ok(WidgetEvent::MessageAppended { message }) = events.recv().await {
                assert_eq!(message.text, GREETING_TEXT);
                break;
            }
        }
    })
    .await
    .expect("greeting never arrived");

    let snapshot: WidgetSnapshot = server.get(&format!("/widget/{id}/state")).await.json();
    assert_eq!(snapshot.messages.len(), 1);
    assert_eq!(snapshot.messages[0].sender, Sender::Bot);
}

#[tokio::test]
async fn test_blank_send_is_ignored() {
    let state = test_state(Scripted::new());
    let server = TestServer::new(build_router(state.clone())).unwrap();
    let id = mount_via_index(&server, &state).await;

    let response = server
        .post(&format!("/widget/{id}/send"))
        .json(&json!({ "message": "   " }))
        .await;
    response.assert_status(StatusCode::OK);
    let body: SendResponse = response.json();
    assert!(!body.accepted);
    assert_eq!(body.input, "   ");

    let snapshot: WidgetSnapshot = server.get(&format!("/widget/{id}/state")).await.json();
    assert!(snapshot.messages.is_empty());
    assert!(!snapshot.bot_typing);
}

#[tokio::test]
async fn test_send_then_reply() {
    let backend = Scripted::new();
    let state = test_state(Arc::clone(&backend));
    let server = TestServer::new(build_router(state.clone())).unwrap();
    let id = mount_via_index(&server, &state).await;

    let widget = state.widgets.get(&id).unwrap();
    let mut events = widget.subscribe();

    let response = server
        .post(&format!("/widget/{id}/send"))
        .json(&json!({ "message": "Hello" }))
        .await;
    response.assert_status(StatusCode::ACCEPTED);
    let body: SendResponse = response.json();
    assert!(body.accepted);
    assert_eq!(body.input, "");

    // Reply is held back: user line is in, indicator is on
    let snapshot: WidgetSnapshot = server.get(&format!("/widget/{id}/state")).await.json();
    assert_eq!(snapshot.messages.len(), 1);
    assert_eq!(snapshot.messages[0].text, "Hello");
    assert!(snapshot.bot_typing);

    backend.release();

    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match events.recv().await {
                Ok(WidgetEvent::MessageAppended { message }) if message.sender == Sender::Bot => {
                    break;
                }
                _ => {}
            }
        }
    })
    .await
    .expect("reply never arrived");

    let snapshot: WidgetSnapshot = server.get(&format!("/widget/{id}/state")).await.json();
    assert_eq!(snapshot.messages.len(), 2);
    assert_eq!(snapshot.messages[1].text, "re: Hello");
    assert!(!snapshot.bot_typing);
}

#[tokio::test]
async fn test_unknown_widget_is_not_found() {
    let state = test_state(Scripted::new());
    let server = TestServer::new(build_router(state)).unwrap();

    server
        .post("/widget/nope/toggle")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .post("/widget/nope/send")
        .json(&json!({ "message": "hi" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/widget/nope/state")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/widget/nope/events")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unmount() {
    let state = test_state(Scripted::new());
    let server = TestServer::new(build_router(state.clone())).unwrap();
    let id = mount_via_index(&server, &state).await;
    let widget = state.widgets.get(&id).unwrap();

    server
        .post(&format!("/widget/{id}/unmount"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    assert!(state.widgets.is_empty());
    assert!(!widget.is_mounted());

    server
        .get(&format!("/widget/{id}/state"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .post(&format!("/widget/{id}/unmount"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_event_stream_resyncs_then_ends_on_unmount() {
    let state = test_state(Scripted::new());
    let widget = state.widgets.mount();
    let app = build_router(state.clone());

    let response = app
        .oneshot(
            Request::get(format!("/widget/{}/events", widget.id()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/event-stream"
    );

    let mut body = response.into_body().into_data_stream();
    let mut seen = String::new();
    tokio::time::timeout(Duration::from_secs(5), async {
        while !(seen.contains("event: panel")
            && seen.contains("event: messages")
            && seen.contains("event: input"))
        {
            let chunk = body.next().await.expect("stream ended early").unwrap();
            seen.push_str(&String::from_utf8_lossy(&chunk));
        }
    })
    .await
    .expect("initial sync never arrived");

    state.widgets.unmount(widget.id());

    let ended = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(chunk) = body.next().await {
            chunk.unwrap();
        }
    })
    .await;
    assert!(ended.is_ok(), "stream kept running after unmount");
}

/// Read SSE chunks until `needle` shows up.
async fn read_until<S>(body: &mut S, needle: &str) -> String
where
    S: futures::Stream<Item = Result<axum::body::Bytes, axum::Error>> + Unpin,
{
    let mut seen = String::new();
    tokio::time::timeout(Duration::from_secs(5), async {
        while !seen.contains(needle) {
            let chunk = body.next().await.expect("stream ended early").unwrap();
            seen.push_str(&String::from_utf8_lossy(&chunk));
        }
    })
    .await
    .expect("expected event never arrived");
    seen
}

#[tokio::test]
async fn test_reconnect_resyncs_history() {
    let backend = Scripted::new();
    let state = test_state(Arc::clone(&backend));
    let widget = state.widgets.mount();
    let app = build_router(state.clone());
    let events_url = format!("/widget/{}/events", widget.id());

    widget.set_input("Hello");
    backend.release();
    widget.send().await.expect("send should start");

    // First page connection goes away without unmounting
    let first = app
        .clone()
        .oneshot(Request::get(&events_url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let mut body = first.into_body().into_data_stream();
    read_until(&mut body, "\"count\":2").await;
    drop(body);

    assert!(widget.is_mounted());

    // Restored page reconnects and gets the same history back
    let second = app
        .oneshot(Request::get(&events_url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let mut body = second.into_body().into_data_stream();
    let seen = read_until(&mut body, "\"count\":2").await;
    assert!(seen.contains("re: Hello"));
}

#[tokio::test]
async fn test_widget_script_lifecycle_guards() {
    let state = test_state(Scripted::new());
    let server = TestServer::new(build_router(state)).unwrap();

    let response = server.get("/static/widget.js").await;
    response.assert_status_ok();
    let script = response.text();

    // Back/forward cache keeps the widget mounted
    assert!(script.contains("if (!event.persisted)"));
    assert!(script.contains("\"pageshow\""));
    // Unknown widget reloads instead of failing silently
    assert!(script.contains("response.status === 404"));

    // Field is cleared before the send request goes out
    let send = script.find("async send()").unwrap();
    let clear = send + script[send..].find("this.input.value = \"\";").unwrap();
    let request = send + script[send..].find("this.request(").unwrap();
    assert!(clear < request);
    assert!(script.contains("if (!accepted && this.input.value === \"\")"));
}

//! Mounted widget instances.

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::state::{WidgetSnapshot, WidgetState};
use super::{FAILURE_REPLY, FALLBACK_REPLY, GREETING_TEXT, Message, WidgetSettings};
use crate::client::ChatBackend;
use crate::events::WidgetEvent;

/// A mounted chat widget.
///
/// Cheap to clone; all clones share one session. Background work (the
/// greeting timer and reply calls) is tied to the widget's lifetime token, so
/// nothing is applied after [`unmount`](Self::unmount). Closing the panel is
/// not unmounting: replies that arrive while the panel is closed still land.
#[derive(Debug, Clone)]
pub struct ChatWidget {
    inner: Arc<WidgetInner>,
}

#[derive(Debug)]
struct WidgetInner {
    id: String,
    state: RwLock<WidgetState>,
    events: broadcast::Sender<WidgetEvent>,
    lifetime: CancellationToken,
    backend: Arc<dyn ChatBackend>,
    settings: WidgetSettings,
    created_at: DateTime<Utc>,
    last_activity: RwLock<DateTime<Utc>>,
}

impl ChatWidget {
    /// Mount a fresh widget with empty state.
    #[must_use]
    pub fn mount(
        id: impl Into<String>,
        backend: Arc<dyn ChatBackend>,
        settings: WidgetSettings,
    ) -> Self {
        let (events, _) = broadcast::channel(settings.event_buffer.max(1));
        let now = Utc::now();
        Self {
            inner: Arc::new(WidgetInner {
                id: id.into(),
                state: RwLock::new(WidgetState::new()),
                events,
                lifetime: CancellationToken::new(),
                backend,
                settings,
                created_at: now,
                last_activity: RwLock::new(now),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> WidgetSnapshot {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot(&self.inner.id)
    }

    /// Receive every change from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.inner.events.subscribe()
    }

    /// False once the widget has been unmounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        !self.inner.lifetime.is_cancelled()
    }

    /// Resolves once the widget has been unmounted.
    pub async fn unmounted(&self) {
        self.inner.lifetime.cancelled().await;
    }

    /// Flip panel visibility and return the new value.
    ///
    /// Opening with an empty message list arms a greeting.
    pub fn toggle(&self) -> bool {
        let toggled = self.write_state().toggle();
        self.touch();
        self.emit(WidgetEvent::PanelToggled {
            open: toggled.open,
        });

        if toggled.arm_greeting {
            self.arm_greeting();
        }
        toggled.open
    }

    /// Hide the panel. Pending work keeps running.
    pub fn close(&self) {
        let changed = self.write_state().close();
        self.touch();
        if changed {
            self.emit(WidgetEvent::PanelToggled { open: false });
        }
    }

    /// Replace the input draft.
    pub fn set_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.write_state().set_input(text.clone());
        self.touch();
        self.emit(WidgetEvent::InputChanged { text });
    }

    /// Send the current draft and deliver the reply in the background.
    ///
    /// Returns `None` if the draft was blank. The user message, cleared draft
    /// and typing indicator are applied before this returns.
    pub fn submit(&self) -> Option<JoinHandle<Option<Message>>> {
        let text = self.begin_send()?;
        let widget = self.clone();
        Some(tokio::spawn(async move { widget.deliver_reply(text).await }))
    }

    /// Send the current draft and wait for the bot message.
    ///
    /// Returns `None` if the draft was blank or the widget was unmounted
    /// before the reply arrived.
    pub async fn send(&self) -> Option<Message> {
        let text = self.begin_send()?;
        self.deliver_reply(text).await
    }

    /// Cancel all pending work. Results that arrive later are dropped.
    pub fn unmount(&self) {
        self.inner.lifetime.cancel();
        info!(
            name: "widget.unmounted",
            widget_id = %self.inner.id,
            age_secs = (Utc::now() - self.inner.created_at).num_seconds(),
            "Widget unmounted"
        );
    }

    /// Record activity now.
    pub fn touch(&self) {
        *self
            .inner
            .last_activity
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Utc::now();
    }

    /// Whether nothing happened for longer than `timeout`.
    ///
    /// A widget with a live event subscriber (an open page) is never idle.
    #[must_use]
    pub fn is_idle_for(&self, timeout: Duration) -> bool {
        if self.inner.events.receiver_count() > 0 {
            return false;
        }
        let last = *self
            .inner
            .last_activity
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        // Negative spans mean clock skew; treat as active.
        (Utc::now() - last)
            .to_std()
            .is_ok_and(|idle| idle > timeout)
    }

    fn begin_send(&self) -> Option<String> {
        let sent = self.write_state().begin_send()?;
        self.touch();

        self.emit(WidgetEvent::MessageAppended {
            message: sent.clone(),
        });
        self.emit(WidgetEvent::InputChanged {
            text: String::new(),
        });
        self.emit(WidgetEvent::TypingChanged { bot_typing: true });
        Some(sent.text)
    }

    async fn deliver_reply(&self, text: String) -> Option<Message> {
        let outcome = tokio::select! {
            biased;
            () = self.inner.lifetime.cancelled() => {
                debug!(widget_id = %self.inner.id, "Reply dropped, widget unmounted");
                return None;
            }
            outcome = self.inner.backend.send(&text) => outcome,
        };

        let reply = match outcome {
            Ok(Some(reply)) => reply,
            Ok(None) => FALLBACK_REPLY.to_string(),
            Err(err) => {
                warn!(
                    name: "chat.reply.failed",
                    widget_id = %self.inner.id,
                    error = %err,
                    "Chat endpoint call failed"
                );
                FAILURE_REPLY.to_string()
            }
        };

        let message = self.write_state().finish_send(reply);
        self.emit(WidgetEvent::TypingChanged { bot_typing: false });
        self.emit(WidgetEvent::MessageAppended {
            message: message.clone(),
        });
        Some(message)
    }

    fn arm_greeting(&self) {
        let delay = self.inner.settings.sample_greeting_delay();
        info!(
            name: "widget.greeting.scheduled",
            widget_id = %self.inner.id,
            delay_ms = delay.as_millis() as u64,
            "Greeting scheduled"
        );

        let widget = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = widget.inner.lifetime.cancelled() => {}
                () = tokio::time::sleep(delay) => widget.greet(),
            }
        });
    }

    fn greet(&self) {
        let message = self.write_state().push_bot(GREETING_TEXT);
        self.emit(WidgetEvent::MessageAppended { message });
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, WidgetState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: WidgetEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }
}

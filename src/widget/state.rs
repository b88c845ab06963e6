//! Widget session state.
//!
//! [`WidgetState`] is the synchronous core of the widget: every user action and
//! every resolved task is a single method call here. The async plumbing in
//! [`ChatWidget`](super::ChatWidget) only decides *when* those calls happen.

use serde::{Deserialize, Serialize};

use super::message::{Message, MessageIds, Sender};

/// Outcome of flipping the panel visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggled {
    /// Visibility after the flip.
    pub open: bool,
    /// Whether a greeting task should be armed.
    ///
    /// True whenever the panel ends up open while the message list is still
    /// empty. Reopening before a pending greeting lands therefore arms a
    /// second one.
    pub arm_greeting: bool,
}

/// All data a mounted widget owns.
#[derive(Debug, Default)]
pub struct WidgetState {
    open: bool,
    messages: Vec<Message>,
    pending_input: String,
    bot_typing: bool,
    ids: MessageIds,
}

/// Read-only copy of a widget's state, used for rendering and the JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    /// Widget identifier.
    pub id: String,
    /// Whether the panel is visible.
    pub open: bool,
    /// Whether the typing indicator is shown.
    pub bot_typing: bool,
    /// Current contents of the input field.
    pub pending_input: String,
    /// Messages in display order.
    pub messages: Vec<Message>,
}

impl WidgetState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    #[must_use]
    pub fn bot_typing(&self) -> bool {
        self.bot_typing
    }

    /// Flip visibility. History is kept across closes.
    pub fn toggle(&mut self) -> Toggled {
        self.open = !self.open;
        Toggled {
            open: self.open,
            arm_greeting: self.open && self.messages.is_empty(),
        }
    }

    /// Hide the panel. Returns false if it was already hidden.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    /// Replace the draft in the input field.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// Start a send from the current draft.
    ///
    /// Returns `None` without touching anything when the draft is blank.
    /// Otherwise appends the untrimmed draft as a user message, clears the
    /// draft and raises the typing flag.
    pub fn begin_send(&mut self) -> Option<Message> {
        if self.pending_input.trim().is_empty() {
            return None;
        }

        let text = std::mem::take(&mut self.pending_input);
        let message = self.append(Sender::User, text);
        self.bot_typing = true;
        Some(message)
    }

    /// Resolve a send: lower the typing flag and append the bot line.
    pub fn finish_send(&mut self, text: impl Into<String>) -> Message {
        self.bot_typing = false;
        self.append(Sender::Bot, text.into())
    }

    /// Append a bot line without touching the typing flag.
    pub fn push_bot(&mut self, text: impl Into<String>) -> Message {
        self.append(Sender::Bot, text.into())
    }

    /// Copy the state out for rendering.
    #[must_use]
    pub fn snapshot(&self, id: &str) -> WidgetSnapshot {
        WidgetSnapshot {
            id: id.to_string(),
            open: self.open,
            bot_typing: self.bot_typing,
            pending_input: self.pending_input.clone(),
            messages: self.messages.clone(),
        }
    }

    fn append(&mut self, sender: Sender, text: String) -> Message {
        let message = Message {
            id: self.ids.next(),
            sender,
            text,
        };
        self.messages.push(message.clone());
        message
    }
}

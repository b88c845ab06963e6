//! Widget change events.
//!
//! Every mutation of a mounted widget publishes one [`WidgetEvent`]. The SSE
//! endpoint maps each event to the page [`Region`] that has to be redrawn and
//! sends a freshly rendered fragment for it.
//!
//! # Example
//!
//! ```rust
//! use landing_chat::events::{Region, WidgetEvent};
//!
//! let event = WidgetEvent::TypingChanged { bot_typing: true };
//! assert_eq!(event.name(), "typing.changed");
//! assert_eq!(event.region(), Region::Messages);
//! ```

use serde::{Deserialize, Serialize};

use crate::widget::Message;

/// A single state change of a mounted widget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum WidgetEvent {
    /// The panel was opened or closed.
    #[serde(rename = "panel.toggled")]
    PanelToggled {
        /// Visibility after the toggle.
        open: bool,
    },

    /// A message was appended to the list.
    #[serde(rename = "message.appended")]
    MessageAppended {
        /// The new message.
        message: Message,
    },

    /// The typing indicator was raised or lowered.
    #[serde(rename = "typing.changed")]
    TypingChanged {
        /// New value of the flag.
        bot_typing: bool,
    },

    /// The input field draft changed.
    #[serde(rename = "input.changed")]
    InputChanged {
        /// New draft.
        text: String,
    },
}

/// Part of the widget markup that an event invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Panel visibility.
    Panel,
    /// Message list and typing indicator.
    Messages,
    /// Input field value.
    Input,
}

impl Region {
    /// All regions, in the order a resync sends them.
    pub const ALL: [Region; 3] = [Region::Panel, Region::Messages, Region::Input];

    /// SSE event name the browser element listens for.
    #[must_use]
    pub fn sse_name(self) -> &'static str {
        match self {
            Self::Panel => "panel",
            Self::Messages => "messages",
            Self::Input => "input",
        }
    }
}

impl WidgetEvent {
    /// Dotted event name, identical to the serde tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PanelToggled { .. } => "panel.toggled",
            Self::MessageAppended { .. } => "message.appended",
            Self::TypingChanged { .. } => "typing.changed",
            Self::InputChanged { .. } => "input.changed",
        }
    }

    /// Region to redraw after this event.
    #[must_use]
    pub fn region(&self) -> Region {
        match self {
            Self::PanelToggled { .. } => Region::Panel,
            Self::MessageAppended { .. } | Self::TypingChanged { .. } => Region::Messages,
            Self::InputChanged { .. } => Region::Input,
        }
    }
}

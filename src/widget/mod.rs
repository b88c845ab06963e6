//! The floating chat widget.
//!
//! A widget is mounted once per rendered landing page and owns its session
//! state until it is unmounted. Nothing survives a reload.
//!
//! # Architecture
//!
//! - [`WidgetState`]: synchronous state transitions (toggle, draft, send)
//! - [`ChatWidget`]: a mounted instance; runs the greeting and reply tasks
//! - [`WidgetRegistry`]: all mounted instances, keyed by id
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use landing_chat::client::HttpChatBackend;
//! use landing_chat::widget::{WidgetRegistry, WidgetSettings};
//!
//! # async fn example() {
//! let registry = WidgetRegistry::new(Arc::new(HttpChatBackend::new()), WidgetSettings::default());
//! let widget = registry.mount();
//!
//! widget.toggle();
//! widget.set_input("Hello!");
//! let reply = widget.send().await;
//! # }
//! ```

mod handle;
mod message;
mod registry;
mod state;

pub use handle::ChatWidget;
pub use message::{Message, MessageIds, Sender};
pub use registry::WidgetRegistry;
pub use state::{Toggled, WidgetSnapshot, WidgetState};

use std::time::Duration;

use rand::Rng;

/// Bot line appended when the greeting timer fires.
pub const GREETING_TEXT: &str = "Hey there! I'm your assistant. How can I help you?";

/// Bot line used when the endpoint answered without a reply.
pub const FALLBACK_REPLY: &str = "I received your message!";

/// Bot line used when the endpoint could not be reached or understood.
pub const FAILURE_REPLY: &str = "⚠️ Server connection failed.";

/// Per-widget tuning.
#[derive(Debug, Clone)]
pub struct WidgetSettings {
    /// Shortest greeting delay.
    pub greeting_delay_min: Duration,
    /// Upper bound of the greeting delay (exclusive).
    pub greeting_delay_max: Duration,
    /// Capacity of the change-event channel.
    pub event_buffer: usize,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            greeting_delay_min: Duration::from_millis(1000),
            greeting_delay_max: Duration::from_millis(3000),
            event_buffer: 64,
        }
    }
}

impl WidgetSettings {
    /// Draw a greeting delay uniformly from `[min, max)` in whole milliseconds.
    #[must_use]
    pub fn sample_greeting_delay(&self) -> Duration {
        let min = self.greeting_delay_min.as_millis() as u64;
        let max = self.greeting_delay_max.as_millis() as u64;
        if max <= min {
            return Duration::from_millis(min);
        }
        Duration::from_millis(rand::rng().random_range(min..max))
    }
}

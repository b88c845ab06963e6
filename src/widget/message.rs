//! Chat lines and their identifiers.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Who authored a chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed by the visitor.
    User,
    /// Greeting, remote reply or fallback text.
    Bot,
}

impl Sender {
    /// Lowercase wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

/// One chat line. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Creation timestamp in milliseconds, strictly increasing per widget.
    pub id: i64,
    /// Author of the line.
    pub sender: Sender,
    /// Display text, stored exactly as entered or received.
    pub text: String,
}

/// Hands out message ids derived from the wall clock.
///
/// Two messages created within the same millisecond would collide on the raw
/// timestamp, so the generator bumps to `last + 1` whenever the clock has not
/// moved past the previous id.
#[derive(Debug, Default, Clone)]
pub struct MessageIds {
    last: i64,
}

impl MessageIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id based on the current time.
    pub fn next(&mut self) -> i64 {
        self.next_at(Utc::now().timestamp_millis())
    }

    /// Next id for an explicit timestamp.
    pub fn next_at(&mut self, now_ms: i64) -> i64 {
        let id = now_ms.max(self.last + 1);
        self.last = id;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_strictly_increasing() {
        let mut ids = MessageIds::new();
        let a = ids.next_at(1_000);
        let b = ids.next_at(1_000);
        let c = ids.next_at(999);
        let d = ids.next_at(5_000);

        assert_eq!(a, 1_000);
        assert_eq!(b, 1_001);
        assert_eq!(c, 1_002);
        assert_eq!(d, 5_000);
    }

    #[test]
    fn test_wall_clock_ids_never_repeat() {
        let mut ids = MessageIds::new();
        let mut seen: Vec<i64> = (0..100).map(|_| ids.next()).collect();
        let len = seen.len();
        seen.dedup();
        assert_eq!(seen.len(), len);
    }

    #[test]
    fn test_sender_serializes_lowercase() {
        let msg = Message {
            id: 1,
            sender: Sender::Bot,
            text: "hi".to_string(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "bot");
        assert_eq!(Sender::User.as_str(), "user");
    }
}

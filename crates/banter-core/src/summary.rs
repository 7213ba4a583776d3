//! Persisted conversation summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::Message;

/// A generated recap of a prefix of old messages in one session.
///
/// A summary is valid for a given old-message prefix only while its
/// covered id range and count match that prefix exactly; any drift
/// (history edited, messages inserted before the range) invalidates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageSummary {
    pub id: String,
    pub session_id: String,
    pub summary_text: String,
    pub start_message_id: String,
    pub end_message_id: String,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
    pub token_count: usize,
}

impl MessageSummary {
    /// Build a summary covering exactly the given old-message prefix.
    ///
    /// Returns `None` for an empty prefix, which has no id range to cover.
    pub fn covering(
        session_id: impl Into<String>,
        messages: &[Message],
        summary_text: impl Into<String>,
        token_count: usize,
    ) -> Option<Self> {
        let first = messages.first()?;
        let last = messages.last()?;
        Some(Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            summary_text: summary_text.into(),
            start_message_id: first.id.clone(),
            end_message_id: last.id.clone(),
            message_count: messages.len(),
            created_at: Utc::now(),
            token_count,
        })
    }

    /// Whether this summary still covers the given old-message prefix.
    pub fn covers(&self, messages: &[Message]) -> bool {
        let (Some(first), Some(last)) = (messages.first(), messages.last()) else {
            return false;
        };
        self.start_message_id == first.id
            && self.end_message_id == last.id
            && self.message_count == messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix() -> Vec<Message> {
        vec![
            Message::user("first").with_id("m1"),
            Message::assistant("second").with_id("m2"),
            Message::user("third").with_id("m3"),
        ]
    }

    #[test]
    fn covering_captures_id_range_and_count() {
        let messages = prefix();
        let summary =
            MessageSummary::covering("session-1", &messages, "they talked", 3).unwrap();

        assert_eq!(summary.start_message_id, "m1");
        assert_eq!(summary.end_message_id, "m3");
        assert_eq!(summary.message_count, 3);
        assert!(summary.covers(&messages));
    }

    #[test]
    fn covering_empty_prefix_is_none() {
        assert!(MessageSummary::covering("session-1", &[], "recap", 1).is_none());
    }

    #[test]
    fn covers_rejects_count_drift() {
        let mut messages = prefix();
        let summary =
            MessageSummary::covering("session-1", &messages, "they talked", 3).unwrap();

        messages.push(Message::assistant("fourth").with_id("m4"));
        assert!(!summary.covers(&messages));
    }

    #[test]
    fn covers_rejects_shifted_range() {
        let messages = prefix();
        let summary =
            MessageSummary::covering("session-1", &messages, "they talked", 3).unwrap();

        let shifted = vec![
            Message::user("zeroth").with_id("m0"),
            messages[0].clone(),
            messages[1].clone(),
        ];
        assert!(!summary.covers(&shifted));
    }

    #[test]
    fn covers_rejects_empty_prefix() {
        let messages = prefix();
        let summary =
            MessageSummary::covering("session-1", &messages, "they talked", 3).unwrap();
        assert!(!summary.covers(&[]));
    }
}

//! Summary store trait and in-memory implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use banter_core::MessageSummary;

use crate::error::StoreResult;

/// Summary persistence abstraction.
///
/// Each session keeps one current summary; saving replaces any previous
/// summary for the same session rather than merging with it.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Get the current summary for a session, if any
    async fn get(&self, session_id: &str) -> StoreResult<Option<MessageSummary>>;

    /// Save a summary, superseding the session's previous one
    async fn save(&self, summary: &MessageSummary) -> StoreResult<()>;

    /// Delete a session's summary
    async fn delete(&self, session_id: &str) -> StoreResult<()>;
}

/// In-memory summary store keyed by session id
#[derive(Default)]
pub struct InMemorySummaryStore {
    summaries: Arc<RwLock<HashMap<String, MessageSummary>>>,
}

impl InMemorySummaryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SummaryStore for InMemorySummaryStore {
    async fn get(&self, session_id: &str) -> StoreResult<Option<MessageSummary>> {
        Ok(self.summaries.read().await.get(session_id).cloned())
    }

    async fn save(&self, summary: &MessageSummary) -> StoreResult<()> {
        self.summaries
            .write()
            .await
            .insert(summary.session_id.clone(), summary.clone());
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> StoreResult<()> {
        self.summaries.write().await.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banter_core::Message;

    fn summary(session_id: &str, text: &str) -> MessageSummary {
        let messages = vec![
            Message::user("first").with_id("m1"),
            Message::assistant("second").with_id("m2"),
        ];
        MessageSummary::covering(session_id, &messages, text, 4).unwrap()
    }

    #[tokio::test]
    async fn save_and_get() {
        let store = InMemorySummaryStore::new();
        let original = summary("session-1", "they said hello");

        store.save(&original).await.unwrap();
        let loaded = store.get("session-1").await.unwrap().unwrap();

        assert_eq!(loaded, original);
    }

    #[tokio::test]
    async fn get_missing_session_is_none() {
        let store = InMemorySummaryStore::new();
        assert!(store.get("session-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_supersedes_previous_summary() {
        let store = InMemorySummaryStore::new();
        store.save(&summary("session-1", "old recap")).await.unwrap();

        let newer = summary("session-1", "new recap");
        store.save(&newer).await.unwrap();

        let loaded = store.get("session-1").await.unwrap().unwrap();
        assert_eq!(loaded.summary_text, "new recap");
    }

    #[tokio::test]
    async fn delete_removes_summary() {
        let store = InMemorySummaryStore::new();
        store.save(&summary("session-1", "recap")).await.unwrap();

        store.delete("session-1").await.unwrap();
        assert!(store.get("session-1").await.unwrap().is_none());
    }
}

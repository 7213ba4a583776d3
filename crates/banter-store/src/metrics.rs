//! Metrics store trait and in-memory implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use banter_core::TokenMetrics;

use crate::error::StoreResult;

/// Compaction metrics persistence abstraction.
///
/// Writes are append-only; the read side serves reporting surfaces
/// outside the engine.
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Append a compaction event
    async fn save(&self, metrics: &TokenMetrics) -> StoreResult<()>;

    /// Most recent event for a session
    async fn latest(&self, session_id: &str) -> StoreResult<Option<TokenMetrics>>;

    /// Mean compression ratio over a session's events
    async fn average_ratio(&self, session_id: &str) -> StoreResult<Option<f64>>;

    /// Total tokens saved across a session's events
    async fn total_saved(&self, session_id: &str) -> StoreResult<usize>;

    /// Number of recorded events for a session
    async fn count(&self, session_id: &str) -> StoreResult<usize>;
}

/// In-memory metrics store, one append-only list per session
#[derive(Default)]
pub struct InMemoryMetricsStore {
    events: Arc<RwLock<HashMap<String, Vec<TokenMetrics>>>>,
}

impl InMemoryMetricsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetricsStore for InMemoryMetricsStore {
    async fn save(&self, metrics: &TokenMetrics) -> StoreResult<()> {
        self.events
            .write()
            .await
            .entry(metrics.session_id.clone())
            .or_default()
            .push(metrics.clone());
        Ok(())
    }

    async fn latest(&self, session_id: &str) -> StoreResult<Option<TokenMetrics>> {
        Ok(self
            .events
            .read()
            .await
            .get(session_id)
            .and_then(|events| events.last().cloned()))
    }

    async fn average_ratio(&self, session_id: &str) -> StoreResult<Option<f64>> {
        let events = self.events.read().await;
        let Some(events) = events.get(session_id).filter(|e| !e.is_empty()) else {
            return Ok(None);
        };
        let sum: f64 = events.iter().map(|e| e.compression_ratio).sum();
        Ok(Some(sum / events.len() as f64))
    }

    async fn total_saved(&self, session_id: &str) -> StoreResult<usize> {
        Ok(self
            .events
            .read()
            .await
            .get(session_id)
            .map(|events| events.iter().map(TokenMetrics::tokens_saved).sum())
            .unwrap_or(0))
    }

    async fn count(&self, session_id: &str) -> StoreResult<usize> {
        Ok(self
            .events
            .read()
            .await
            .get(session_id)
            .map(Vec::len)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banter_core::CompactStrategy;

    fn event(session_id: &str, before: usize, after: usize) -> TokenMetrics {
        TokenMetrics::new(session_id, before, after, 10, CompactStrategy::EncodedOnly)
    }

    #[tokio::test]
    async fn latest_returns_most_recent_event() {
        let store = InMemoryMetricsStore::new();
        store.save(&event("session-1", 100, 50)).await.unwrap();
        store.save(&event("session-1", 200, 40)).await.unwrap();

        let latest = store.latest("session-1").await.unwrap().unwrap();
        assert_eq!(latest.tokens_before, 200);
        assert_eq!(store.count("session-1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn average_ratio_over_all_events() {
        let store = InMemoryMetricsStore::new();
        store.save(&event("session-1", 100, 50)).await.unwrap(); // 0.5
        store.save(&event("session-1", 100, 25)).await.unwrap(); // 0.25

        let average = store.average_ratio("session-1").await.unwrap().unwrap();
        assert!((average - 0.375).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn total_saved_sums_events() {
        let store = InMemoryMetricsStore::new();
        store.save(&event("session-1", 100, 50)).await.unwrap();
        store.save(&event("session-1", 200, 40)).await.unwrap();

        assert_eq!(store.total_saved("session-1").await.unwrap(), 210);
    }

    #[tokio::test]
    async fn empty_session_has_no_aggregates() {
        let store = InMemoryMetricsStore::new();
        assert!(store.latest("session-1").await.unwrap().is_none());
        assert!(store.average_ratio("session-1").await.unwrap().is_none());
        assert_eq!(store.total_saved("session-1").await.unwrap(), 0);
        assert_eq!(store.count("session-1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = InMemoryMetricsStore::new();
        store.save(&event("session-1", 100, 50)).await.unwrap();

        assert_eq!(store.count("session-2").await.unwrap(), 0);
    }
}

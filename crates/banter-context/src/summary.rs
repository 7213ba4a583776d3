//! Summary caching with per-session mutual exclusion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use banter_core::{Message, MessageSummary};
use banter_runtime::Summarizer;
use banter_store::SummaryStore;

use crate::encoder;
use crate::error::ContextResult;

/// Minimum old-message count worth a summarization round trip
const MIN_SUMMARIZABLE_MESSAGES: usize = 3;

/// Produces or reuses summaries for old-message prefixes.
///
/// Work is serialized per session, never globally: each session gets a
/// lazily created lock, and the registry guarding those locks is held
/// only for the lookup-or-insert, never across summarization.
pub struct SummaryCoordinator {
    store: Arc<dyn SummaryStore>,
    summarizer: Arc<dyn Summarizer>,
    session_locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SummaryCoordinator {
    pub fn new(store: Arc<dyn SummaryStore>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            store,
            summarizer,
            session_locks: StdMutex::new(HashMap::new()),
        }
    }

    fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .session_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Whether summarizing this prefix is worth a provider round trip.
    ///
    /// A handful of short messages costs more to summarize than to send.
    fn worthwhile(old_messages: &[Message], summary_max_tokens: usize) -> bool {
        old_messages.len() >= MIN_SUMMARIZABLE_MESSAGES
            && encoder::estimate_conversation_tokens(old_messages) > summary_max_tokens
    }

    /// Get a valid cached summary for this prefix, or generate one.
    ///
    /// Returns `Ok(None)` when no summary is available for any reason:
    /// empty prefix, prefix not worth summarizing, or summarizer failure.
    /// The caller is expected to fall back to truncation.
    pub async fn get_or_generate(
        &self,
        session_id: &str,
        old_messages: &[Message],
        summary_max_tokens: usize,
    ) -> ContextResult<Option<MessageSummary>> {
        if old_messages.is_empty() {
            return Ok(None);
        }

        let lock = self.session_lock(session_id);
        let _guard = lock.lock().await;

        // Re-check under the lock; a concurrent caller may have just
        // generated the summary we need.
        if let Some(existing) = self.store.get(session_id).await? {
            if existing.covers(old_messages) {
                debug!(session_id, count = old_messages.len(), "summary cache hit");
                return Ok(Some(existing));
            }
            debug!(session_id, "cached summary is stale, regenerating");
        }

        if !Self::worthwhile(old_messages, summary_max_tokens) {
            debug!(session_id, count = old_messages.len(), "prefix not worth summarizing");
            return Ok(None);
        }

        let Some(text) = self
            .summarizer
            .summarize(old_messages, summary_max_tokens)
            .await
        else {
            debug!(session_id, "summarizer returned no summary");
            return Ok(None);
        };

        let token_count = encoder::estimate_tokens(&text);
        let Some(summary) =
            MessageSummary::covering(session_id, old_messages, text, token_count)
        else {
            return Ok(None);
        };

        // Fire and forget: a failed save must not cost us the summary we
        // already have in hand.
        if let Err(err) = self.store.save(&summary).await {
            warn!(session_id, %err, "failed to persist summary");
        }

        Ok(Some(summary))
    }
}

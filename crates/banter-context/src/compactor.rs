//! Compaction orchestration.
//!
//! `ContextCompactor` is the single entry point the chat layer calls
//! before every model request: it decides between pass-through encoding,
//! summary-backed compaction, and truncation, and records before/after
//! token metrics whenever messages were elided.

use std::sync::Arc;

use tracing::{debug, warn};

use banter_core::{CompactStrategy, Message, TokenMetrics};
use banter_store::MetricsStore;

use crate::config::CompressionConfig;
use crate::encoder;
use crate::error::ContextResult;
use crate::summary::SummaryCoordinator;
use crate::window::OptimizedContext;

/// Prefix marking the synthetic recap message in an optimized context.
pub const SUMMARY_MARKER: &str = "[Summary of earlier conversation]";

pub struct ContextCompactor {
    coordinator: Arc<SummaryCoordinator>,
    metrics: Arc<dyn MetricsStore>,
}

impl ContextCompactor {
    pub fn new(coordinator: Arc<SummaryCoordinator>, metrics: Arc<dyn MetricsStore>) -> Self {
        Self {
            coordinator,
            metrics,
        }
    }

    /// Produce an optimized context for one model call.
    ///
    /// Summarization failures and persistence failures never surface to
    /// the caller; the worst case is a context that looks as if
    /// summarization were disabled for this call.
    pub async fn compact(
        &self,
        session_id: &str,
        messages: &[Message],
        config: &CompressionConfig,
    ) -> ContextResult<OptimizedContext> {
        if !config.needs_compression(messages) {
            return Ok(OptimizedContext::from_window(
                messages.to_vec(),
                CompactStrategy::NoneNeeded,
                0,
            ));
        }

        let old_count = config.summary_message_count(messages);
        let (old, recent) = messages.split_at(old_count);

        let summary = if config.enable_summary_generation {
            self.coordinator
                .get_or_generate(session_id, old, config.summary_max_tokens)
                .await?
        } else {
            None
        };

        let context = match summary {
            Some(summary) => {
                debug!(session_id, elided = old.len(), "compacting with summary");
                let mut window = Vec::with_capacity(recent.len() + 1);
                window.push(Message::assistant(format!(
                    "{SUMMARY_MARKER} {}",
                    summary.summary_text
                )));
                window.extend_from_slice(recent);
                OptimizedContext::from_window(window, CompactStrategy::EncodedOnly, old.len())
            }
            None if config.fallback_to_truncation => {
                debug!(session_id, elided = old.len(), "falling back to truncation");
                OptimizedContext::from_window(
                    recent.to_vec(),
                    CompactStrategy::TruncatedWithEncoding,
                    old.len(),
                )
            }
            None => OptimizedContext::from_window(
                messages.to_vec(),
                CompactStrategy::EncodedOnly,
                0,
            ),
        };

        if context.elided_messages > 0 {
            let metrics = TokenMetrics::new(
                session_id,
                encoder::estimate_conversation_tokens(messages),
                context.estimated_tokens,
                messages.len(),
                context.strategy,
            );
            if let Err(err) = self.metrics.save(&metrics).await {
                warn!(session_id, %err, "failed to persist compaction metrics");
            }
        }

        Ok(context)
    }
}

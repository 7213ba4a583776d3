//! Compaction audit metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which strategy produced an optimized context.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompactStrategy {
    /// History was small enough that nothing had to change.
    NoneNeeded,
    /// Compact encoding alone (possibly with a summary standing in for
    /// elided messages) fit the budget.
    EncodedOnly,
    /// Older messages were truncated away before encoding.
    TruncatedWithEncoding,
}

impl CompactStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            CompactStrategy::NoneNeeded => "none_needed",
            CompactStrategy::EncodedOnly => "encoded_only",
            CompactStrategy::TruncatedWithEncoding => "truncated_with_encoding",
        }
    }
}

impl std::fmt::Display for CompactStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the append-only compaction audit trail.
///
/// Recorded only for compaction events where messages were actually
/// elided; a pass-through encode leaves no row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenMetrics {
    pub id: String,
    pub session_id: String,
    pub tokens_before: usize,
    pub tokens_after: usize,
    pub compression_ratio: f64,
    pub messages_processed: usize,
    pub strategy: CompactStrategy,
    pub created_at: DateTime<Utc>,
}

impl TokenMetrics {
    pub fn new(
        session_id: impl Into<String>,
        tokens_before: usize,
        tokens_after: usize,
        messages_processed: usize,
        strategy: CompactStrategy,
    ) -> Self {
        let compression_ratio = if tokens_before == 0 {
            1.0
        } else {
            tokens_after as f64 / tokens_before as f64
        };
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            tokens_before,
            tokens_after,
            compression_ratio,
            messages_processed,
            strategy,
            created_at: Utc::now(),
        }
    }

    /// Tokens removed by this compaction event.
    pub fn tokens_saved(&self) -> usize {
        self.tokens_before.saturating_sub(self.tokens_after)
    }
}

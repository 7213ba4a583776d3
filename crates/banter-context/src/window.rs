//! Budget-bounded window selection over conversation history.

use serde::{Deserialize, Serialize};

use banter_core::{CompactStrategy, Message};

use crate::encoder;

/// The context actually sent to the model: a message window, its compact
/// encoding, and how it was produced. Ephemeral; recomputed per call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizedContext {
    pub messages: Vec<Message>,
    pub encoded: String,
    pub estimated_tokens: usize,
    pub strategy: CompactStrategy,
    pub elided_messages: usize,
}

impl OptimizedContext {
    /// Encode a window and wrap it with its cost and provenance.
    pub fn from_window(
        messages: Vec<Message>,
        strategy: CompactStrategy,
        elided_messages: usize,
    ) -> Self {
        let encoded = encoder::encode(&messages);
        let estimated_tokens = encoder::estimate_tokens(&encoded);
        Self {
            messages,
            encoded,
            estimated_tokens,
            strategy,
            elided_messages,
        }
    }

    fn empty() -> Self {
        Self {
            messages: Vec::new(),
            encoded: String::new(),
            estimated_tokens: 0,
            strategy: CompactStrategy::NoneNeeded,
            elided_messages: 0,
        }
    }
}

/// Select the maximal contiguous trailing window that fits `max_tokens`.
///
/// The last `keep_recent` messages are always kept; older messages are
/// admitted most-recent-first until the encoded cost would exceed the
/// budget. Encoding the whole history is tried first and short-circuits
/// the search in the common case.
pub fn optimize(messages: &[Message], max_tokens: usize, keep_recent: usize) -> OptimizedContext {
    if messages.is_empty() {
        return OptimizedContext::empty();
    }

    let full = encoder::encode(messages);
    if encoder::estimate_tokens(&full) <= max_tokens {
        return OptimizedContext {
            messages: messages.to_vec(),
            estimated_tokens: encoder::estimate_tokens(&full),
            encoded: full,
            strategy: CompactStrategy::EncodedOnly,
            elided_messages: 0,
        };
    }

    let split_at = messages.len().saturating_sub(keep_recent);
    let (older, tail) = messages.split_at(split_at);

    // Admit older messages one at a time from the recent end of the older
    // set. Cost only grows with each admission, so the first violation is
    // the true boundary.
    let mut kept_older = 0;
    while kept_older < older.len() {
        let candidate = &older[older.len() - kept_older - 1..];
        let mut window: Vec<Message> = candidate.to_vec();
        window.extend_from_slice(tail);
        if encoder::estimate_tokens(&encoder::encode(&window)) > max_tokens {
            break;
        }
        kept_older += 1;
    }

    let mut window: Vec<Message> = older[older.len() - kept_older..].to_vec();
    window.extend_from_slice(tail);
    let elided = older.len() - kept_older;

    OptimizedContext::from_window(window, CompactStrategy::TruncatedWithEncoding, elided)
}

//! Compaction configuration.

use serde::{Deserialize, Serialize};

use banter_core::Message;

/// Compression configuration.
///
/// Immutable value; the presets differ only in these six fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompressionConfig {
    /// Messages always kept verbatim at the recent end
    pub keep_recent_messages: usize,
    /// Informational chunk size for summary generation
    pub summary_chunk_size: usize,
    /// Hard token ceiling for the optimized context
    pub max_tokens: usize,
    /// Token ceiling for generated summary text
    pub summary_max_tokens: usize,
    /// Whether to ask the summarizer at all
    pub enable_summary_generation: bool,
    /// Whether to fall back to truncation when no summary is available
    pub fallback_to_truncation: bool,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            keep_recent_messages: 10,
            summary_chunk_size: 20,
            max_tokens: 4000,
            summary_max_tokens: 500,
            enable_summary_generation: true,
            fallback_to_truncation: true,
        }
    }
}

impl CompressionConfig {
    /// Retains more history and never summarizes.
    pub fn conservative() -> Self {
        Self {
            keep_recent_messages: 15,
            summary_chunk_size: 30,
            max_tokens: 6000,
            summary_max_tokens: 400,
            enable_summary_generation: false,
            fallback_to_truncation: true,
        }
    }

    /// Compacts early and hard for tight context windows.
    pub fn aggressive() -> Self {
        Self {
            keep_recent_messages: 5,
            summary_chunk_size: 10,
            max_tokens: 2000,
            summary_max_tokens: 300,
            enable_summary_generation: true,
            fallback_to_truncation: true,
        }
    }

    /// Whether this history is long enough to compact at all.
    pub fn needs_compression(&self, messages: &[Message]) -> bool {
        messages.len() > self.keep_recent_messages
    }

    /// How many leading messages would be summarized away.
    pub fn summary_message_count(&self, messages: &[Message]) -> usize {
        messages.len().saturating_sub(self.keep_recent_messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turns(count: usize) -> Vec<Message> {
        (0..count)
            .map(|i| {
                if i % 2 == 0 {
                    Message::user(format!("question {i}"))
                } else {
                    Message::assistant(format!("answer {i}"))
                }
            })
            .collect()
    }

    #[test]
    fn twelve_turns_with_keep_ten_need_compression() {
        let config = CompressionConfig::default();
        let messages = turns(12);

        assert!(config.needs_compression(&messages));
        assert_eq!(config.summary_message_count(&messages), 2);
    }

    #[test]
    fn short_history_needs_no_compression() {
        let config = CompressionConfig::default();
        let messages = turns(10);

        assert!(!config.needs_compression(&messages));
        assert_eq!(config.summary_message_count(&messages), 0);
    }

    #[test]
    fn presets_are_ordered_by_retention() {
        let conservative = CompressionConfig::conservative();
        let default = CompressionConfig::default();
        let aggressive = CompressionConfig::aggressive();

        assert!(conservative.keep_recent_messages > default.keep_recent_messages);
        assert!(default.keep_recent_messages > aggressive.keep_recent_messages);
        assert!(!conservative.enable_summary_generation);
    }
}

//! Banter Context Engine - token budgets and conversation compaction
//!
//! This crate provides:
//! - Compact wire encoding of message lists with token estimation
//! - Budget-bounded window selection over conversation history
//! - Code-block-safe splitting of oversized outgoing messages
//! - Summary caching with per-session mutual exclusion
//! - The compaction orchestrator that ties it all together

pub mod compactor;
pub mod config;
pub mod encoder;
pub mod error;
pub mod splitter;
pub mod summary;
pub mod window;

pub use compactor::{ContextCompactor, SUMMARY_MARKER};
pub use config::CompressionConfig;
pub use encoder::EncodingSavings;
pub use error::{ContextError, ContextResult};
pub use splitter::{MessagePart, SplitResult, DEFAULT_SPLIT_LIMIT};
pub use summary::SummaryCoordinator;
pub use window::OptimizedContext;

/// Prelude for common imports
pub mod prelude {
    pub use crate::compactor::ContextCompactor;
    pub use crate::config::CompressionConfig;
    pub use crate::window::OptimizedContext;
    pub use crate::error::{ContextError, ContextResult};
    pub use crate::summary::SummaryCoordinator;
    pub use banter_core::{CompactStrategy, Message, MessageRole};
}

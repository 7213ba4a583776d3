//! Banter core domain types.
//!
//! This crate defines the conversation value types shared by the context
//! engine, the runtime providers, and the stores:
//! - `Message` / `MessageRole`: one turn of a conversation
//! - `MessageSummary`: a persisted recap of an old-message prefix
//! - `TokenMetrics` / `CompactStrategy`: the compaction audit trail

pub mod message;
pub mod metrics;
pub mod summary;

pub use message::{Message, MessageRole};
pub use metrics::{CompactStrategy, TokenMetrics};
pub use summary::MessageSummary;

pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

//! Banter persistence seams.
//!
//! This crate provides:
//! - `SummaryStore`: one current conversation summary per session
//! - `MetricsStore`: the append-only compaction audit trail
//! - In-memory implementations used by tests and database-less callers

pub mod error;
pub mod metrics;
pub mod summary;

pub use error::{StoreError, StoreResult};
pub use metrics::{InMemoryMetricsStore, MetricsStore};
pub use summary::{InMemorySummaryStore, SummaryStore};

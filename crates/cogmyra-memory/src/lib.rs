//! Per-user conversational memory for CogMyra.
//!
//! [`MemoryStore`] keeps timestamped entries in insertion order, answers
//! recency and substring queries, and can persist itself to a JSONL file.

pub mod error;
pub mod jsonl;
pub mod model;
pub mod policy;
pub mod scope;
pub mod store;

/// Memory error type.
pub use error::MemoryError;
/// JSONL maintenance helpers.
pub use jsonl::{CompactReport, compact};
/// Entry model.
pub use model::{MemoryEntry, MemoryStats, Metadata};
/// Persistence policy.
pub use policy::PersistPolicy;
/// Scoped store guard.
pub use scope::ScopedStore;
/// The store itself.
pub use store::MemoryStore;

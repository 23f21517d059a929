//! Memory entry model shared by the store and its JSONL codec.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque metadata attached to an entry.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// One stored utterance.
///
/// Entries are immutable: the fields are only readable through accessors and
/// an update is modelled as a new entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryEntry {
    timestamp: f64,
    user_id: String,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,
}

impl MemoryEntry {
    /// Build an entry with an explicit timestamp (seconds since the UNIX epoch).
    pub fn new(
        timestamp: f64,
        user_id: impl Into<String>,
        text: impl Into<String>,
        metadata: Option<Metadata>,
    ) -> Self {
        Self {
            timestamp,
            user_id: user_id.into(),
            text: text.into(),
            metadata,
        }
    }

    /// Creation time in seconds since the UNIX epoch.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Owner of the entry; any string, including empty.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Stored utterance.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caller-supplied metadata, carried through unchanged.
    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub(crate) fn belongs_to(&self, user_id: Option<&str>) -> bool {
        user_id.is_none_or(|user_id| self.user_id == user_id)
    }
}

/// Current wall-clock time as fractional UNIX seconds.
pub(crate) fn now_seconds() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Entry counts for a store.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct MemoryStats {
    /// Number of entries across all users.
    pub total: usize,
    /// Number of entries per user id.
    pub by_user: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::{MemoryEntry, Metadata};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn serializes_without_absent_metadata() {
        let entry = MemoryEntry::new(1.5, "alice", "hi", None);
        let line = serde_json::to_string(&entry).expect("serialize");
        assert_eq!(line, r#"{"timestamp":1.5,"user_id":"alice","text":"hi"}"#);
    }

    #[test]
    fn accepts_null_metadata() {
        let entry: MemoryEntry =
            serde_json::from_str(r#"{"timestamp":2.0,"user_id":"bob","text":"x","metadata":null}"#)
                .expect("decode");
        assert_eq!(entry.metadata(), None);
    }

    #[test]
    fn keeps_metadata_opaque() {
        let mut metadata = Metadata::new();
        metadata.insert("role".to_string(), json!("user"));
        metadata.insert("tokens".to_string(), json!([1, 2, 3]));
        let entry = MemoryEntry::new(3.25, "u", "t", Some(metadata.clone()));
        let line = serde_json::to_string(&entry).expect("serialize");
        let decoded: MemoryEntry = serde_json::from_str(&line).expect("decode");
        assert_eq!(decoded.metadata(), Some(&metadata));
    }

    #[test]
    fn user_filter_matches_exactly() {
        let entry = MemoryEntry::new(0.0, "alice", "", None);
        assert!(entry.belongs_to(None));
        assert!(entry.belongs_to(Some("alice")));
        assert!(!entry.belongs_to(Some("Alice")));
    }
}

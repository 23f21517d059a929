//! Ordered, optionally file-backed memory store.

use crate::error::MemoryError;
use crate::jsonl;
use crate::model::{MemoryEntry, MemoryStats, Metadata, now_seconds};
use crate::policy::PersistPolicy;
use log::{debug, info};
use parking_lot::RwLock;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// Append-only collection of [`MemoryEntry`] values, oldest first.
///
/// A single lock guards the entry sequence. `add` and `import` take it
/// exclusively; queries share it. `save` holds an upgradable read so readers
/// keep going while writers and other saves wait, which keeps every file
/// snapshot consistent.
#[derive(Debug, Default)]
pub struct MemoryStore {
    path: Option<PathBuf>,
    policy: PersistPolicy,
    journal: RwLock<Journal>,
}

#[derive(Debug, Default)]
struct Journal {
    entries: Vec<MemoryEntry>,
    /// Timestamp of the newest entry stamped by `add` on this instance.
    /// Loaded and imported records never move it.
    last_stamped: Option<f64>,
}

impl MemoryStore {
    /// Create an empty store with no backing file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by `path` using the deferred persistence policy.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        Self::open_with_policy(path, PersistPolicy::default())
    }

    /// Open a store backed by `path`, loading any records already on disk.
    pub fn open_with_policy(
        path: impl AsRef<Path>,
        policy: PersistPolicy,
    ) -> Result<Self, MemoryError> {
        let path = path.as_ref().to_path_buf();
        let decoded = jsonl::read_file(&path)?;
        info!(
            "opened memory store (path={}, policy={}, loaded={}, skipped={})",
            path.display(),
            policy.as_str(),
            decoded.entries.len(),
            decoded.skipped
        );
        Ok(Self {
            path: Some(path),
            policy,
            journal: RwLock::new(Journal {
                entries: decoded.entries,
                last_stamped: None,
            }),
        })
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// When `add` and `import` reach the backing file.
    pub fn policy(&self) -> PersistPolicy {
        self.policy
    }

    /// Append a new entry stamped with the current time and return it.
    ///
    /// The stamp never goes below the previous `add` on this store, so a
    /// backwards clock step cannot reorder entries.
    ///
    /// Under [`PersistPolicy::WriteThrough`] the record is appended to the
    /// backing file first; if that fails the entry is not added.
    pub fn add(
        &self,
        user_id: impl Into<String>,
        text: impl Into<String>,
        metadata: Option<Metadata>,
    ) -> Result<MemoryEntry, MemoryError> {
        let mut journal = self.journal.write();
        let now = now_seconds();
        let timestamp = journal.last_stamped.map_or(now, |last| now.max(last));
        let entry = MemoryEntry::new(timestamp, user_id, text, metadata);
        if let Some(path) = self.write_through_path() {
            jsonl::append_file(path, std::slice::from_ref(&entry))?;
        }
        journal.entries.push(entry.clone());
        journal.last_stamped = Some(timestamp);
        debug!(
            "added memory entry (user_id={}, text_len={}, total={})",
            entry.user_id(),
            entry.text().len(),
            journal.entries.len()
        );
        Ok(entry)
    }

    /// Up to `n` entries, most recent first, optionally restricted to one user.
    ///
    /// `n == 0` yields an empty result.
    pub fn get_last(&self, n: usize, user_id: Option<&str>) -> Vec<MemoryEntry> {
        self.journal
            .read()
            .entries
            .iter()
            .rev()
            .filter(|entry| entry.belongs_to(user_id))
            .take(n)
            .cloned()
            .collect()
    }

    /// Every entry whose text contains `query`, ignoring case, most recent first.
    pub fn search(&self, query: &str, user_id: Option<&str>) -> Vec<MemoryEntry> {
        let needle = query.to_lowercase();
        self.journal
            .read()
            .entries
            .iter()
            .rev()
            .filter(|entry| entry.belongs_to(user_id))
            .filter(|entry| entry.text().to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Rewrite the backing file with the full in-memory sequence.
    ///
    /// A store without a backing file has nothing to persist and returns `Ok`.
    pub fn save(&self) -> Result<(), MemoryError> {
        let Some(path) = self.path.as_deref() else {
            debug!("save skipped: memory store has no backing file");
            return Ok(());
        };
        let journal = self.journal.upgradable_read();
        jsonl::write_file(path, &journal.entries)?;
        info!(
            "saved memory store (path={}, entries={})",
            path.display(),
            journal.entries.len()
        );
        Ok(())
    }

    /// Number of entries held in memory.
    pub fn len(&self) -> usize {
        self.journal.read().entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.journal.read().entries.is_empty()
    }

    /// Snapshot of all entries in insertion order.
    pub fn entries(&self) -> Vec<MemoryEntry> {
        self.journal.read().entries.clone()
    }

    /// Entry counts overall and per user.
    pub fn stats(&self) -> MemoryStats {
        let journal = self.journal.read();
        let entries = &journal.entries;
        let mut stats = MemoryStats {
            total: entries.len(),
            ..MemoryStats::default()
        };
        for entry in entries.iter() {
            *stats.by_user.entry(entry.user_id().to_string()).or_default() += 1;
        }
        stats
    }

    /// Write every entry as JSONL, oldest first.
    pub fn export(&self, out: &mut dyn Write) -> Result<usize, MemoryError> {
        let journal = self.journal.read();
        let count = jsonl::encode(out, &journal.entries)?;
        debug!("exported memory entries (count={count})");
        Ok(count)
    }

    /// Append JSONL records from `input`, keeping their timestamps.
    ///
    /// Malformed lines are skipped. Returns the number of records imported.
    pub fn import(&self, input: &mut dyn Read) -> Result<usize, MemoryError> {
        let decoded = jsonl::decode(BufReader::new(input), "import")?;
        let count = decoded.entries.len();
        let mut journal = self.journal.write();
        if let Some(path) = self.write_through_path() {
            jsonl::append_file(path, &decoded.entries)?;
        }
        journal.entries.extend(decoded.entries);
        info!(
            "imported memory entries (imported={count}, skipped={}, total={})",
            decoded.skipped,
            journal.entries.len()
        );
        Ok(count)
    }

    fn write_through_path(&self) -> Option<&Path> {
        match self.policy {
            PersistPolicy::WriteThrough => self.path.as_deref(),
            PersistPolicy::Deferred => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::{MemoryEntry, Metadata, PersistPolicy};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    fn texts(entries: &[MemoryEntry]) -> Vec<&str> {
        entries.iter().map(MemoryEntry::text).collect()
    }

    #[test]
    fn empty_store_returns_nothing() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(store.get_last(10, None).is_empty());
        assert!(store.search("", None).is_empty());
    }

    #[test]
    fn add_returns_the_stored_entry() {
        let store = MemoryStore::new();
        let mut metadata = Metadata::new();
        metadata.insert("role".to_string(), json!("assistant"));
        let entry = store
            .add("u1", "hello", Some(metadata.clone()))
            .expect("add");
        assert_eq!(entry.user_id(), "u1");
        assert_eq!(entry.metadata(), Some(&metadata));
        assert_eq!(store.get_last(1, None), vec![entry]);
    }

    #[test]
    fn accepts_empty_strings() {
        let store = MemoryStore::new();
        store.add("", "", None).expect("add");
        assert_eq!(store.len(), 1);
        assert_eq!(store.search("", Some("")).len(), 1);
    }

    #[test]
    fn zero_limit_is_empty() {
        let store = MemoryStore::new();
        store.add("u", "x", None).expect("add");
        assert!(store.get_last(0, None).is_empty());
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let store = MemoryStore::new();
        for i in 0..100 {
            store.add("u", format!("{i}"), None).expect("add");
        }
        let entries = store.entries();
        assert!(
            entries
                .windows(2)
                .all(|pair| pair[0].timestamp() <= pair[1].timestamp())
        );
    }

    #[test]
    fn search_folds_non_ascii_case() {
        let store = MemoryStore::new();
        store.add("u", "ÜBER alles", None).expect("add");
        assert_eq!(texts(&store.search("über", None)), vec!["ÜBER alles"]);
    }

    #[test]
    fn stats_count_per_user() {
        let store = MemoryStore::new();
        store.add("alice", "a", None).expect("add");
        store.add("bob", "b", None).expect("add");
        store.add("alice", "c", None).expect("add");
        let stats = store.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_user.get("alice"), Some(&2));
        assert_eq!(stats.by_user.get("bob"), Some(&1));
    }

    #[test]
    fn save_without_backing_file_is_noop() {
        let store = MemoryStore::new();
        store.add("u", "x", None).expect("add");
        store.save().expect("save");
        assert_eq!(store.path(), None);
    }

    #[test]
    fn write_through_appends_on_add() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("mem.jsonl");
        let store =
            MemoryStore::open_with_policy(&path, PersistPolicy::WriteThrough).expect("open");
        store.add("u", "first", None).expect("add");
        store.add("u", "second", None).expect("add");

        let reopened = MemoryStore::open(&path).expect("reopen");
        assert_eq!(texts(&reopened.get_last(10, None)), vec!["second", "first"]);
    }

    #[test]
    fn write_through_failure_keeps_memory_unchanged() {
        let temp = tempdir().expect("tempdir");
        let parent = temp.path().join("sub");
        let store =
            MemoryStore::open_with_policy(parent.join("mem.jsonl"), PersistPolicy::WriteThrough)
                .expect("open");
        std::fs::write(&parent, "file, not a directory").expect("write blocker");

        assert!(store.add("u", "lost", None).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn export_then_import_into_fresh_store() {
        let source = MemoryStore::new();
        source.add("alice", "one", None).expect("add");
        source.add("bob", "two", None).expect("add");
        let mut buf = Vec::new();
        assert_eq!(source.export(&mut buf).expect("export"), 2);

        let target = MemoryStore::new();
        let imported = target.import(&mut buf.as_slice()).expect("import");
        assert_eq!(imported, 2);
        assert_eq!(target.entries(), source.entries());
    }
}

use cogmyra_memory::{MemoryEntry, MemoryStore};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory holding a single backing file path.
pub struct TempMemoryFile {
    dir: TempDir,
    path: PathBuf,
}

impl TempMemoryFile {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mem.jsonl");
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Write raw JSONL contents to the backing file.
    pub fn write_raw(&self, contents: &str) {
        std::fs::write(&self.path, contents).expect("write memory file");
    }

    pub fn read_raw(&self) -> String {
        std::fs::read_to_string(&self.path).expect("read memory file")
    }
}

impl Default for TempMemoryFile {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory store pre-filled with `(user_id, text)` pairs in order.
pub fn seeded_store(items: &[(&str, &str)]) -> MemoryStore {
    let store = MemoryStore::new();
    for (user_id, text) in items {
        store.add(*user_id, *text, None).expect("seed entry");
    }
    store
}

/// Texts of the given entries, in order.
pub fn texts(entries: &[MemoryEntry]) -> Vec<String> {
    entries.iter().map(|entry| entry.text().to_string()).collect()
}

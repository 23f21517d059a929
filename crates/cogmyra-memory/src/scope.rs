//! Bounded-lifetime use of a file-backed store.

use crate::error::MemoryError;
use crate::store::MemoryStore;
use log::{error, warn};
use std::ops::Deref;
use std::path::Path;

/// Owning guard that saves its store when it goes out of scope.
///
/// Drop cannot report failures, so a failed implicit save is logged. Call
/// [`ScopedStore::close`] to observe the result instead. No save happens while
/// the thread is unwinding from a panic.
#[derive(Debug)]
pub struct ScopedStore {
    store: MemoryStore,
    closed: bool,
}

impl ScopedStore {
    /// Save now and disarm the drop hook.
    pub fn close(mut self) -> Result<(), MemoryError> {
        self.closed = true;
        self.store.save()
    }
}

impl Deref for ScopedStore {
    type Target = MemoryStore;

    fn deref(&self) -> &MemoryStore {
        &self.store
    }
}

impl Drop for ScopedStore {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if std::thread::panicking() {
            warn!("skipping memory save on scope exit: thread is panicking");
            return;
        }
        if let Err(err) = self.store.save() {
            error!("failed to save memory store on scope exit: {err}");
        }
    }
}

impl MemoryStore {
    /// Wrap the store so it is saved when the returned guard is dropped.
    pub fn scoped(self) -> ScopedStore {
        ScopedStore {
            store: self,
            closed: false,
        }
    }

    /// Open `path`, run `f` against the store, then save.
    ///
    /// The save error, if any, is returned in place of `f`'s output.
    pub fn with_scope<T>(
        path: impl AsRef<Path>,
        f: impl FnOnce(&MemoryStore) -> T,
    ) -> Result<T, MemoryError> {
        let store = MemoryStore::open(path)?;
        let output = f(&store);
        store.save()?;
        Ok(output)
    }
}

//! Configuration schema for CogMyra.

use cogmyra_memory::PersistPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default backing file, relative to the working directory.
pub const DEFAULT_MEMORY_FILE: &str = ".cogmyra/memory.jsonl";

/// Root config.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CogmyraConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl CogmyraConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> CogmyraConfigBuilder {
        CogmyraConfigBuilder::new()
    }
}

/// Builder for assembling a `CogmyraConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct CogmyraConfigBuilder {
    config: CogmyraConfig,
}

impl CogmyraConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: CogmyraConfig::default(),
        }
    }

    /// Replace the memory store configuration.
    pub fn memory(mut self, memory: MemoryConfig) -> Self {
        self.config.memory = memory;
        self
    }

    /// Replace the session configuration.
    pub fn session(mut self, session: SessionConfig) -> Self {
        self.config.session = session;
        self
    }

    /// Finalize and return the built `CogmyraConfig`.
    pub fn build(self) -> CogmyraConfig {
        self.config
    }
}

/// Memory store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Backing JSONL file; relative paths resolve against the working directory.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub persist: PersistPolicy,
    /// User id applied when a caller does not name one.
    #[serde(default = "default_user")]
    pub default_user: String,
    /// Entries returned by recency listings when no count is given.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            persist: PersistPolicy::default(),
            default_user: default_user(),
            recent_limit: default_recent_limit(),
        }
    }
}

impl MemoryConfig {
    /// Backing file location for a process running in `cwd`.
    pub fn resolve_path(&self, cwd: &Path) -> PathBuf {
        let path = self
            .path
            .as_deref()
            .map_or_else(|| PathBuf::from(DEFAULT_MEMORY_FILE), PathBuf::from);
        if path.is_absolute() {
            path
        } else {
            cwd.join(path)
        }
    }
}

fn default_user() -> String {
    "default".to_string()
}

fn default_recent_limit() -> usize {
    10
}

/// Session labelling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Print a fresh session id whenever an entry is added from the CLI.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}

//! Persistence policy for file-backed stores.

use serde::{Deserialize, Serialize};

/// When entries added to a file-backed store reach the backing file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistPolicy {
    /// Entries stay in memory until `save()` or scope exit.
    #[default]
    Deferred,
    /// Every `add` appends its record to the backing file before returning.
    WriteThrough,
}

impl PersistPolicy {
    /// Parse a policy name as used in config files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "deferred" => Some(Self::Deferred),
            "write_through" => Some(Self::WriteThrough),
            _ => None,
        }
    }

    /// Config name of the policy, the inverse of [`PersistPolicy::from_name`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deferred => "deferred",
            Self::WriteThrough => "write_through",
        }
    }
}

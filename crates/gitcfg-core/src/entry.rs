//! Entry records flowing through the engine

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::scope::Scope;

/// One tuple as reported by the raw-store reader, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub key: String,
    pub value: String,
    pub scope: Scope,
    pub origin: PathBuf,
}

impl RawEntry {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        scope: Scope,
        origin: impl Into<PathBuf>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            scope,
            origin: origin.into(),
        }
    }
}

/// A normalized key/value observation at one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    /// Value exactly as the store reported it
    pub value: String,
    pub scope: Scope,
    pub origin: PathBuf,
    pub category_id: String,
    /// True for the highest-precedence entry of its key
    pub is_active: bool,
    /// Strictly higher scopes that also define this key, ascending
    pub overridden_by: Vec<Scope>,
    pub annotations: Vec<String>,
}

impl ConfigEntry {
    pub fn is_overridden(&self) -> bool {
        !self.overridden_by.is_empty()
    }
}

/// Resolved view of one key across all scopes that define it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub key: String,
    /// Entry from the highest-precedence scope present
    pub active_entry: ConfigEntry,
    /// Every entry for the key, lowest precedence first
    pub all_entries: Vec<ConfigEntry>,
}

impl EffectiveConfig {
    /// The value that takes effect.
    pub fn value(&self) -> &str {
        &self.active_entry.value
    }

    pub fn scopes(&self) -> Vec<Scope> {
        self.all_entries.iter().map(|e| e.scope).collect()
    }

    pub fn entry_at(&self, scope: Scope) -> Option<&ConfigEntry> {
        self.all_entries.iter().find(|e| e.scope == scope)
    }
}

/// A raw tuple the normalizer dropped, kept so one bad line never hides the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub key: String,
    pub scope: Scope,
    pub origin: PathBuf,
    pub message: String,
}

//! Entry normalization
//!
//! Turns raw store tuples into [`ConfigEntry`] records: validates keys,
//! canonicalizes origins, classifies keys and collapses duplicate
//! declarations within one scope (last declaration wins).

use std::collections::HashMap;
use std::path::PathBuf;

use crate::category::CategoryRegistry;
use crate::entry::{ConfigEntry, Diagnostic, RawEntry};
use crate::key::validate_key;
use crate::scope::{Scope, ScopeMap, canonicalize_path};

/// Output of [`normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// One canonical entry per `(key, scope)`, in first-declaration order
    pub entries: Vec<ConfigEntry>,
    /// Tuples dropped because their key is malformed
    pub diagnostics: Vec<Diagnostic>,
}

/// Normalize raw tuples. Never fails; bad tuples become diagnostics.
pub fn normalize(
    raw: impl IntoIterator<Item = RawEntry>,
    scopes: &ScopeMap,
    registry: &CategoryRegistry,
) -> Normalized {
    let mut normalized = Normalized::default();
    let mut positions: HashMap<(String, Scope), usize> = HashMap::new();
    let mut declarations: Vec<usize> = Vec::new();
    let mut origins: HashMap<PathBuf, PathBuf> = HashMap::new();

    for record in raw {
        let origin = if record.origin.as_os_str().is_empty() {
            scopes
                .get(&record.scope)
                .map(|meta| meta.path.clone())
                .unwrap_or_default()
        } else {
            origins
                .entry(record.origin.clone())
                .or_insert_with(|| canonicalize_path(&record.origin))
                .clone()
        };

        if let Err(err) = validate_key(&record.key) {
            tracing::warn!(
                key = %record.key,
                scope = %record.scope,
                origin = %origin.display(),
                "Dropping malformed configuration key"
            );
            normalized.diagnostics.push(Diagnostic {
                key: record.key,
                scope: record.scope,
                origin,
                message: err.to_string(),
            });
            continue;
        }

        let slot = (record.key.clone(), record.scope);
        if let Some(&index) = positions.get(&slot) {
            let existing = &mut normalized.entries[index];
            existing.value = record.value;
            existing.origin = origin;
            declarations[index] += 1;
            continue;
        }

        let category_id = registry.classify(&record.key).to_string();
        positions.insert(slot, normalized.entries.len());
        declarations.push(1);
        normalized.entries.push(ConfigEntry {
            key: record.key,
            value: record.value,
            scope: record.scope,
            origin,
            category_id,
            is_active: false,
            overridden_by: Vec::new(),
            annotations: Vec::new(),
        });
    }

    for (entry, count) in normalized.entries.iter_mut().zip(declarations) {
        if count > 1 {
            tracing::debug!(key = %entry.key, scope = %entry.scope, count, "Collapsed duplicate declarations");
            entry.annotations.push(format!(
                "{count} values defined at {} scope; using the most recent definition.",
                entry.scope
            ));
        }
    }

    normalized
}

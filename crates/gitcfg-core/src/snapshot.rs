//! Snapshot assembly and filtering
//!
//! A [`Snapshot`] is the only structure presentation code may depend on. It
//! is never mutated after assembly: filters return a new snapshot and a
//! mutation is followed by a fresh read.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::{ConfigEntry, Diagnostic, EffectiveConfig};
use crate::error::{Error, Result};
use crate::key::same_key;
use crate::resolve::{EffectiveMap, resolve};
use crate::scope::{Scope, ScopeMap};

/// Full resolved configuration state at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub scopes: ScopeMap,
    /// Entries ordered by category id, key and scope
    pub entries: Vec<ConfigEntry>,
    pub effective_map: EffectiveMap,
    pub generated_at: DateTime<Utc>,
    /// Raw tuples dropped during normalization
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

/// Combine scope metadata, entries and the effective map into a snapshot.
///
/// Fails with [`Error::InternalConsistency`] when the effective map and the
/// entry list disagree; that indicates a resolver defect, not bad input.
pub fn assemble(
    scopes: ScopeMap,
    mut entries: Vec<ConfigEntry>,
    effective_map: EffectiveMap,
) -> Result<Snapshot> {
    check_consistency(&entries, &effective_map)?;

    entries.sort_by(|a, b| {
        (a.category_id.as_str(), a.key.as_str(), a.scope).cmp(&(
            b.category_id.as_str(),
            b.key.as_str(),
            b.scope,
        ))
    });

    tracing::debug!(
        entries = entries.len(),
        keys = effective_map.len(),
        scopes = scopes.len(),
        "Assembled configuration snapshot"
    );

    Ok(Snapshot {
        scopes,
        entries,
        effective_map,
        generated_at: Utc::now(),
        diagnostics: Vec::new(),
    })
}

fn check_consistency(entries: &[ConfigEntry], effective_map: &EffectiveMap) -> Result<()> {
    let entry_keys: BTreeSet<&str> = entries.iter().map(|e| e.key.as_str()).collect();
    let map_keys: BTreeSet<&str> = effective_map.keys().map(String::as_str).collect();

    if let Some(key) = entry_keys.difference(&map_keys).next() {
        return Err(Error::internal(format!(
            "key '{key}' has entries but no effective value"
        )));
    }
    if let Some(key) = map_keys.difference(&entry_keys).next() {
        return Err(Error::internal(format!(
            "key '{key}' has an effective value but no entries"
        )));
    }

    for (key, effective) in effective_map {
        if effective.key != *key {
            return Err(Error::internal(format!(
                "effective map entry '{key}' describes key '{}'",
                effective.key
            )));
        }
        let Some(last) = effective.all_entries.last() else {
            return Err(Error::internal(format!("key '{key}' has an empty entry list")));
        };
        if effective
            .all_entries
            .windows(2)
            .any(|pair| pair[0].scope >= pair[1].scope)
        {
            return Err(Error::internal(format!(
                "entries for '{key}' are not strictly ordered by scope"
            )));
        }
        if *last != effective.active_entry || !effective.active_entry.is_active {
            return Err(Error::internal(format!(
                "active entry for '{key}' is not its highest-precedence entry"
            )));
        }
    }

    Ok(())
}

impl Snapshot {
    /// Attach normalization diagnostics (builder pattern).
    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn get(&self, key: &str) -> Option<&EffectiveConfig> {
        self.effective_map.get(key)
    }

    /// Look up a key as a user would type it.
    ///
    /// git reports section and variable names in lowercase, so an exact miss
    /// falls back to a match that folds case outside the subsection.
    pub fn lookup(&self, key: &str) -> Option<&EffectiveConfig> {
        self.get(key).or_else(|| {
            self.effective_map
                .iter()
                .find(|(candidate, _)| same_key(candidate, key))
                .map(|(_, effective)| effective)
        })
    }

    /// The effective value of a key.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(EffectiveConfig::value)
    }

    /// True when the key has an entry at exactly this scope.
    pub fn has_entry(&self, key: &str, scope: Scope) -> bool {
        self.entries.iter().any(|e| e.key == key && e.scope == scope)
    }

    pub fn entries_at(&self, scope: Scope) -> impl Iterator<Item = &ConfigEntry> {
        self.entries.iter().filter(move |e| e.scope == scope)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to pretty JSON with stable field names.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Return a filtered view of this snapshot.
    ///
    /// Filters compose by logical AND and are idempotent.
    ///
    /// A scope filter keeps only that scope's entries and **re-resolves**
    /// precedence over them, so "active" then means active among the
    /// filtered scope only (every entry is active in a single-scope view).
    /// Category and keyword filters are plain projections: surviving entries
    /// keep the flags computed across all scopes, and the effective map keeps
    /// the full resolved view for every surviving key.
    pub fn filter(&self, filter: &SnapshotFilter) -> Snapshot {
        let mut scopes = self.scopes.clone();
        let mut entries = self.entries.clone();
        let mut effective_map = self.effective_map.clone();

        if let Some(scope) = filter.scope {
            scopes.retain(|s, _| *s == scope);
            entries.retain(|e| e.scope == scope);
            for entry in &mut entries {
                entry.is_active = false;
                entry.overridden_by.clear();
            }
            effective_map = resolve(&mut entries);
        }

        if filter.category.is_some() || filter.needle().is_some() {
            entries.retain(|e| filter.matches_projection(e));
            let kept: BTreeSet<&str> = entries.iter().map(|e| e.key.as_str()).collect();
            effective_map.retain(|key, _| kept.contains(key.as_str()));
        }

        let diagnostics = self
            .diagnostics
            .iter()
            .filter(|d| filter.scope.is_none_or(|scope| d.scope == scope))
            .filter(|_| filter.category.is_none())
            .filter(|d| filter.needle().is_none_or(|kw| contains_ignore_case(&d.key, &kw)))
            .cloned()
            .collect();

        Snapshot {
            scopes,
            entries,
            effective_map,
            generated_at: self.generated_at,
            diagnostics,
        }
    }
}

/// Predicate set for [`Snapshot::filter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotFilter {
    pub scope: Option<Scope>,
    pub category: Option<String>,
    pub keyword: Option<String>,
}

impl SnapshotFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one scope (builder pattern).
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Restrict to one category id (builder pattern).
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict to a case-insensitive keyword in key or value (builder pattern).
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.scope.is_none() && self.category.is_none() && self.needle().is_none()
    }

    /// Effective keyword, lowercased; an empty keyword matches everything.
    fn needle(&self) -> Option<String> {
        self.keyword
            .as_deref()
            .filter(|kw| !kw.is_empty())
            .map(str::to_lowercase)
    }

    fn matches_projection(&self, entry: &ConfigEntry) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|category| entry.category_id == category);
        let keyword_ok = self.needle().is_none_or(|kw| {
            contains_ignore_case(&entry.key, &kw) || contains_ignore_case(&entry.value, &kw)
        });
        category_ok && keyword_ok
    }
}

fn contains_ignore_case(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

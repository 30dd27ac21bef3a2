//! Precedence resolution
//!
//! Groups entries by key, orders each group by scope precedence and marks
//! the highest-precedence entry active. Every other entry records all the
//! higher scopes present for its key, not only the winner: a key defined at
//! system and global (but not local) shows the system entry overridden by
//! global alone.

use std::collections::{BTreeMap, HashMap};

use crate::entry::{ConfigEntry, EffectiveConfig};

/// Resolved views keyed by configuration key.
pub type EffectiveMap = BTreeMap<String, EffectiveConfig>;

/// Resolve precedence for freshly normalized entries.
///
/// Fills in `is_active` and `overridden_by` on `entries` and returns one
/// [`EffectiveConfig`] per distinct key. Runs in time linear in the number
/// of entries (groups hold at most one entry per scope).
pub fn resolve(entries: &mut [ConfigEntry]) -> EffectiveMap {
    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, entry) in entries.iter().enumerate() {
        groups.entry(entry.key.as_str()).or_default().push(index);
    }
    let groups: Vec<Vec<usize>> = groups.into_values().collect();

    let mut effective = EffectiveMap::new();
    for mut group in groups {
        group.sort_by_key(|&index| entries[index].scope);

        let scopes: Vec<_> = group.iter().map(|&index| entries[index].scope).collect();
        let last = group.len() - 1;
        for (position, &index) in group.iter().enumerate() {
            let entry = &mut entries[index];
            let own = entry.scope;
            entry.is_active = position == last;
            entry.overridden_by = scopes[position + 1..]
                .iter()
                .copied()
                .filter(|scope| *scope > own)
                .collect();
            entry.overridden_by.dedup();
        }

        let all_entries: Vec<ConfigEntry> = group.iter().map(|&index| entries[index].clone()).collect();
        let active_entry = all_entries[last].clone();
        effective.insert(
            active_entry.key.clone(),
            EffectiveConfig {
                key: active_entry.key.clone(),
                active_entry,
                all_entries,
            },
        );
    }

    tracing::debug!(
        entries = entries.len(),
        keys = effective.len(),
        "Resolved scope precedence"
    );
    effective
}

use std::collections::BTreeMap;

use gitcfg_core::{
    CategoryRegistry, Engine, MemoryStore, RawEntry, Scope, ScopeMap, ScopeMetadata, Snapshot,
    SnapshotFilter, assemble, normalize, resolve,
};
use proptest::prelude::*;

const KEYS: &[&str] = &[
    "user.email",
    "core.editor",
    "remote.origin.url",
    "alias.st",
    "pull.rebase",
    "branch.feature/x.merge",
];

fn scope_strategy() -> impl Strategy<Value = Scope> {
    prop::sample::select(Scope::ALL.to_vec())
}

fn raw_strategy() -> impl Strategy<Value = Vec<RawEntry>> {
    prop::collection::vec(
        (prop::sample::select(KEYS.to_vec()), "[a-z@.]{0,6}", scope_strategy()),
        0..24,
    )
    .prop_map(|items| {
        items
            .into_iter()
            .map(|(key, value, scope)| RawEntry::new(key, value, scope, format!("/{scope}")))
            .collect()
    })
}

fn filter_strategy() -> impl Strategy<Value = SnapshotFilter> {
    (
        prop::option::of(scope_strategy()),
        prop::option::of(prop::sample::select(vec![
            "user-identity",
            "core-behavior",
            "remote-settings",
            "uncategorized",
        ])),
        prop::option::of("[a-z.@]{0,3}"),
    )
        .prop_map(|(scope, category, keyword)| SnapshotFilter {
            scope,
            category: category.map(String::from),
            keyword,
        })
}

fn build(raw: Vec<RawEntry>, registry: &CategoryRegistry) -> Snapshot {
    let mut entries = normalize(raw, &ScopeMap::new(), registry).entries;
    let effective = resolve(&mut entries);
    assemble(ScopeMap::new(), entries, effective).unwrap()
}

/// Last declared value per (key, scope).
fn declared(raw: &[RawEntry]) -> BTreeMap<(String, Scope), String> {
    raw.iter()
        .map(|r| ((r.key.clone(), r.scope), r.value.clone()))
        .collect()
}

proptest! {
    #[test]
    fn effective_value_comes_from_highest_scope(raw in raw_strategy()) {
        let registry = CategoryRegistry::with_builtins().unwrap();
        let expected = declared(&raw);
        let snapshot = build(raw, &registry);

        for (key, effective) in &snapshot.effective_map {
            let (top_scope, top_value) = expected
                .iter()
                .filter(|((k, _), _)| k == key)
                .map(|((_, scope), value)| (*scope, value))
                .max_by_key(|(scope, _)| *scope)
                .unwrap();
            prop_assert_eq!(effective.active_entry.scope, top_scope);
            prop_assert_eq!(effective.value(), top_value.as_str());
        }
    }

    #[test]
    fn overridden_by_lists_every_higher_scope(raw in raw_strategy()) {
        let registry = CategoryRegistry::with_builtins().unwrap();
        let snapshot = build(raw, &registry);

        for entry in &snapshot.entries {
            let effective = &snapshot.effective_map[&entry.key];
            let higher: Vec<Scope> = effective
                .scopes()
                .into_iter()
                .filter(|scope| *scope > entry.scope)
                .collect();
            prop_assert_eq!(&entry.overridden_by, &higher);
            prop_assert_eq!(entry.is_active, higher.is_empty());
        }
    }

    #[test]
    fn snapshot_keys_match_and_lists_are_ordered(raw in raw_strategy()) {
        let registry = CategoryRegistry::with_builtins().unwrap();
        let snapshot = build(raw.clone(), &registry);

        let entry_keys: std::collections::BTreeSet<_> =
            snapshot.entries.iter().map(|e| e.key.clone()).collect();
        let map_keys: std::collections::BTreeSet<_> =
            snapshot.effective_map.keys().cloned().collect();
        prop_assert_eq!(entry_keys, map_keys);
        prop_assert_eq!(snapshot.entries.len(), declared(&raw).len());

        for effective in snapshot.effective_map.values() {
            prop_assert!(!effective.all_entries.is_empty());
            prop_assert!(effective.all_entries.windows(2).all(|w| w[0].scope < w[1].scope));
            prop_assert_eq!(effective.all_entries.last(), Some(&effective.active_entry));
        }
    }

    #[test]
    fn filters_are_idempotent(raw in raw_strategy(), filter in filter_strategy()) {
        let registry = CategoryRegistry::with_builtins().unwrap();
        let once = build(raw, &registry).filter(&filter);
        let twice = once.filter(&filter);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn every_key_classifies_to_a_known_category(key in "[a-zA-Z0-9.*-]{0,16}") {
        let registry = CategoryRegistry::with_builtins().unwrap();
        let id = registry.classify(&key);
        prop_assert!(registry.resolve(id).is_ok());
    }

    #[test]
    fn set_then_unset_round_trips(
        raw in raw_strategy(),
        key in prop::sample::select(KEYS.to_vec()),
        value in "[a-z]{1,6}",
        scope in prop::sample::select(vec![Scope::Global, Scope::Local]),
    ) {
        let registry = CategoryRegistry::with_builtins().unwrap();
        let mut store = MemoryStore::new()
            .with_scope(ScopeMetadata::new(Scope::System, "/system", false))
            .with_scope(ScopeMetadata::new(Scope::Global, "/global", true))
            .with_scope(ScopeMetadata::new(Scope::Local, "/local", true));
        for entry in raw {
            store = store.with_entry(entry);
        }
        let engine = Engine::new(&registry, store);

        let before = engine.snapshot().unwrap();
        let after_set = engine.set(key, value.clone(), scope, &before).unwrap();
        let effective = after_set.get(key).unwrap();
        prop_assert_eq!(effective.entry_at(scope).map(|e| e.value.as_str()), Some(value.as_str()));
        if scope == Scope::Local || !before.has_entry(key, Scope::Local) {
            prop_assert_eq!(effective.value(), value.as_str());
            prop_assert_eq!(effective.active_entry.scope, scope);
        }

        let after_unset = engine.unset(key, scope, &after_set).unwrap();
        prop_assert!(!after_unset.has_entry(key, scope));
        for other in Scope::ALL.into_iter().filter(|s| *s != scope) {
            prop_assert_eq!(before.has_entry(key, other), after_unset.has_entry(key, other));
        }
    }
}

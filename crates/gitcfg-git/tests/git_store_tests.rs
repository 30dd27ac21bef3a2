//! GitStore against a real git binary in an isolated sandbox.

use gitcfg_core::{CategoryRegistry, ConfigStore, Engine, Error, Scope, StoreError};
use gitcfg_git::{GitRunner, GitStore};
use gitcfg_test_utils::GitSandbox;
use gitcfg_test_utils::sandbox::LEAKY_ENV;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn store(sandbox: &GitSandbox) -> GitStore {
    let runner = LEAKY_ENV
        .iter()
        .fold(GitRunner::new(sandbox.work_dir()), |runner, name| {
            runner.without_env(name)
        })
        .with_envs(sandbox.envs());
    GitStore::new(runner)
}

#[test]
fn reads_all_three_scopes_with_origins() {
    let sandbox = GitSandbox::with_repo();
    sandbox.write_system("[user]\n\temail = a@x.com\n");
    sandbox.write_global("[user]\n\temail = b@x.com\n[core]\n\teditor = vim\n");
    sandbox.git(&["config", "--local", "core.editor", "code --wait"]);

    let entries: Vec<_> = store(&sandbox)
        .read_entries()
        .unwrap()
        .into_iter()
        .filter(|e| e.key == "user.email" || e.key == "core.editor")
        .map(|e| (e.key, e.value, e.scope))
        .collect();

    assert_eq!(
        entries,
        vec![
            ("user.email".to_string(), "a@x.com".to_string(), Scope::System),
            ("user.email".to_string(), "b@x.com".to_string(), Scope::Global),
            ("core.editor".to_string(), "vim".to_string(), Scope::Global),
            ("core.editor".to_string(), "code --wait".to_string(), Scope::Local),
        ]
    );
}

#[test]
fn scope_metadata_points_at_sandbox_files() {
    let sandbox = GitSandbox::with_repo();
    let metadata = store(&sandbox).scope_metadata().unwrap();

    let scopes: Vec<Scope> = metadata.iter().map(|m| m.scope).collect();
    assert_eq!(scopes, vec![Scope::System, Scope::Global, Scope::Local]);
    assert!(metadata.iter().all(|m| m.writable));

    let local = metadata.iter().find(|m| m.scope == Scope::Local).unwrap();
    let expected = canonical(&sandbox.local_config().unwrap());
    assert_eq!(local.path, expected);
}

#[test]
fn local_scope_is_absent_outside_repository() {
    let sandbox = GitSandbox::new();
    let metadata = store(&sandbox).scope_metadata().unwrap();
    assert!(metadata.iter().all(|m| m.scope != Scope::Local));
}

#[test]
fn read_only_system_is_detected() {
    let sandbox = GitSandbox::with_repo().with_read_only_system();
    let metadata = store(&sandbox).scope_metadata().unwrap();
    let system = metadata.iter().find(|m| m.scope == Scope::System).unwrap();
    assert!(!system.writable);
}

#[test]
fn engine_round_trip_through_git() {
    let sandbox = GitSandbox::with_repo();
    sandbox.write_global("[core]\n\teditor = vim\n");
    let registry = CategoryRegistry::with_builtins().unwrap();
    let engine = Engine::new(&registry, store(&sandbox));

    let before = engine.snapshot().unwrap();
    assert_eq!(before.value("core.editor"), Some("vim"));

    let after = engine
        .set("core.editor", "nano", Scope::Local, &before)
        .unwrap();
    assert_eq!(after.value("core.editor"), Some("nano"));
    assert_eq!(
        sandbox.git(&["config", "--local", "core.editor"]).trim(),
        "nano"
    );

    let restored = engine.unset("core.editor", Scope::Local, &after).unwrap();
    assert_eq!(restored.value("core.editor"), Some("vim"));
    assert!(!restored.has_entry("core.editor", Scope::Local));
}

#[test]
fn unset_with_other_subsection_case_is_rejected_before_writing() {
    let sandbox = GitSandbox::with_repo();
    let content = "[branch \"Main\"]\n\tmerge = refs/heads/Main\n";
    sandbox.write_global(content);
    let registry = CategoryRegistry::with_builtins().unwrap();
    let engine = Engine::new(&registry, store(&sandbox));

    let snapshot = engine.snapshot().unwrap();
    assert_eq!(snapshot.value("branch.Main.merge"), Some("refs/heads/Main"));
    assert!(snapshot.lookup("branch.main.merge").is_none());

    let err = engine
        .unset("branch.main.merge", Scope::Global, &snapshot)
        .unwrap_err();
    assert!(
        matches!(err, Error::KeyNotFoundAtScope { scope: Scope::Global, .. }),
        "{err}"
    );
    assert_eq!(
        std::fs::read_to_string(sandbox.global_config()).unwrap(),
        content
    );
}

#[test]
fn set_replaces_every_value_at_scope() {
    let sandbox = GitSandbox::with_repo();
    sandbox.write_global("[remote \"origin\"]\n\tfetch = a\n\tfetch = b\n");
    let registry = CategoryRegistry::with_builtins().unwrap();
    let engine = Engine::new(&registry, store(&sandbox));

    let before = engine.snapshot().unwrap();
    let global = before.get("remote.origin.fetch").unwrap().entry_at(Scope::Global).unwrap();
    assert_eq!(global.value, "b");
    assert_eq!(global.annotations.len(), 1);

    let after = engine
        .set("remote.origin.fetch", "c", Scope::Global, &before)
        .unwrap();
    let global = after.get("remote.origin.fetch").unwrap().entry_at(Scope::Global).unwrap();
    assert_eq!(global.value, "c");
    assert!(global.annotations.is_empty());
}

#[test]
fn includes_are_expanded_by_git() {
    let sandbox = GitSandbox::with_repo();
    let included = sandbox.root().join("extra.gitconfig");
    std::fs::write(&included, "[alias]\n\tst = status\n").unwrap();
    sandbox.write_global(&format!("[include]\n\tpath = {}\n", included.display()));

    let entries = store(&sandbox).read_entries().unwrap();
    let alias = entries.iter().find(|e| e.key == "alias.st").unwrap();
    assert_eq!(alias.scope, Scope::Global);
    assert_eq!(alias.origin, included);
}

#[rstest]
#[case("[pull]\n\trebase\n", "pull.rebase", "")]
#[case("[branch \"chore/bootstrap\"]\n\tmerge = refs/heads/main\n", "branch.chore/bootstrap.merge", "refs/heads/main")]
#[case("[alias]\n\tlg = log --graph \"--format=%h %s\"\n", "alias.lg", "log --graph --format=%h %s")]
fn git_value_shapes(#[case] content: &str, #[case] key: &str, #[case] value: &str) {
    let sandbox = GitSandbox::with_repo();
    sandbox.write_global(content);
    let registry = CategoryRegistry::with_builtins().unwrap();
    let snapshot = Engine::new(&registry, store(&sandbox)).snapshot().unwrap();

    assert_eq!(snapshot.value(key), Some(value));
    assert!(snapshot.diagnostics.is_empty());
}

#[test]
fn git_failure_passes_stderr_through() {
    let sandbox = GitSandbox::with_repo();
    sandbox.write_global("[broken\n");

    let err = store(&sandbox).read_entries().unwrap_err();
    match err {
        StoreError::CommandFailed { stderr, .. } => assert!(stderr.contains("bad config")),
        other => panic!("unexpected error: {other}"),
    }

    let registry = CategoryRegistry::with_builtins().unwrap();
    let err = Engine::new(&registry, store(&sandbox)).snapshot().unwrap_err();
    assert!(matches!(err, Error::StoreUnavailable(_)));
}

/// Canonical form used by scope metadata.
fn canonical(path: &std::path::Path) -> std::path::PathBuf {
    gitcfg_core::scope::canonicalize_path(path)
}

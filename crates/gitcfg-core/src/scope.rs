//! Configuration scopes and where their data lives

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One configuration level.
///
/// Variants are declared in precedence order, so the derived `Ord` is the
/// precedence order: `System < Global < Local`. The order is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Machine-wide configuration (`/etc/gitconfig`)
    System,
    /// Per-user configuration (`~/.gitconfig` or the XDG file)
    Global,
    /// Per-repository configuration (`.git/config`)
    Local,
}

impl Scope {
    /// All scopes, lowest precedence first.
    pub const ALL: [Scope; 3] = [Scope::System, Scope::Global, Scope::Local];

    /// Numeric precedence; higher wins.
    pub fn precedence(self) -> u8 {
        match self {
            Self::System => 0,
            Self::Global => 1,
            Self::Local => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Global => "global",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Self::System),
            // git reports the XDG file as global; "user" is the same level
            "global" | "user" | "xdg" => Ok(Self::Global),
            "local" => Ok(Self::Local),
            _ => Err(Error::InvalidScope {
                value: s.to_string(),
            }),
        }
    }
}

/// Where a scope's data lives and whether it can be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeMetadata {
    pub scope: Scope,
    /// Absolute, canonicalized path of the store file
    pub path: PathBuf,
    pub writable: bool,
}

impl ScopeMetadata {
    /// Create metadata, canonicalizing `path` so later comparisons are exact.
    pub fn new(scope: Scope, path: impl AsRef<Path>, writable: bool) -> Self {
        Self {
            scope,
            path: canonicalize_path(path.as_ref()),
            writable,
        }
    }
}

/// Scope metadata keyed by scope.
pub type ScopeMap = BTreeMap<Scope, ScopeMetadata>;

/// Build a [`ScopeMap`] from a list of metadata records.
///
/// A later record for the same scope replaces an earlier one.
pub fn scope_map(metadata: impl IntoIterator<Item = ScopeMetadata>) -> ScopeMap {
    metadata.into_iter().map(|m| (m.scope, m)).collect()
}

/// Resolve symlinks and relative components.
///
/// Paths that do not exist yet are made absolute against the current
/// directory without touching the filesystem.
pub fn canonicalize_path(path: &Path) -> PathBuf {
    match dunce::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(_) => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn precedence_matches_ordering() {
        assert!(Scope::System < Scope::Global);
        assert!(Scope::Global < Scope::Local);
        let mut scopes = vec![Scope::Local, Scope::System, Scope::Global];
        scopes.sort();
        assert_eq!(scopes, Scope::ALL.to_vec());
        for pair in Scope::ALL.windows(2) {
            assert!(pair[0].precedence() < pair[1].precedence());
        }
    }

    #[rstest]
    #[case("system", Scope::System)]
    #[case("global", Scope::Global)]
    #[case("GLOBAL", Scope::Global)]
    #[case("user", Scope::Global)]
    #[case(" local ", Scope::Local)]
    fn parse_scope(#[case] input: &str, #[case] expected: Scope) {
        assert_eq!(input.parse::<Scope>().unwrap(), expected);
    }

    #[test]
    fn parse_unknown_scope_fails() {
        let err = "worktree".parse::<Scope>().unwrap_err();
        assert!(matches!(err, Error::InvalidScope { ref value } if value == "worktree"));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Scope::Global).unwrap(), "\"global\"");
    }

    #[cfg(unix)]
    #[test]
    fn metadata_resolves_symlinks() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real.gitconfig");
        std::fs::write(&real, "").unwrap();
        let link = temp.path().join("link.gitconfig");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let via_link = ScopeMetadata::new(Scope::Global, &link, true);
        let direct = ScopeMetadata::new(Scope::Global, &real, true);
        assert_eq!(via_link.path, direct.path);
    }

    #[test]
    fn missing_path_is_made_absolute() {
        let meta = ScopeMetadata::new(Scope::Local, "does/not/exist/config", true);
        assert!(meta.path.is_absolute());
    }
}

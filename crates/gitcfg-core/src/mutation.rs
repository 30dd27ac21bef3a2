//! Mutation requests and validation
//!
//! Validation is pure: it looks at scope metadata and the current entries and
//! never touches the store. A rejected request therefore leaves no trace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entry::ConfigEntry;
use crate::error::{Error, Result};
use crate::key::{same_key, validate_key};
use crate::scope::{Scope, ScopeMap};

/// Write `value` to `key` at `scope`, replacing every existing value there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: String,
    pub scope: Scope,
}

/// Remove every value of `key` at `scope`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsetRequest {
    pub key: String,
    pub scope: Scope,
}

/// A pending write against the raw store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum MutationRequest {
    Set(SetRequest),
    Unset(UnsetRequest),
}

impl MutationRequest {
    pub fn set(key: impl Into<String>, value: impl Into<String>, scope: Scope) -> Self {
        Self::Set(SetRequest {
            key: key.into(),
            value: value.into(),
            scope,
        })
    }

    pub fn unset(key: impl Into<String>, scope: Scope) -> Self {
        Self::Unset(UnsetRequest {
            key: key.into(),
            scope,
        })
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Set(req) => &req.key,
            Self::Unset(req) => &req.key,
        }
    }

    pub fn scope(&self) -> Scope {
        match self {
            Self::Set(req) => req.scope,
            Self::Unset(req) => req.scope,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Self::Set(_) => "set",
            Self::Unset(_) => "unset",
        }
    }
}

/// Lifecycle of one mutation.
///
/// `Requested -> Validated -> Applied -> SnapshotRefreshed`, or
/// `Requested -> Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationState {
    Requested,
    Validated,
    Applied,
    SnapshotRefreshed,
    Rejected,
}

impl MutationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::SnapshotRefreshed | Self::Rejected)
    }
}

impl fmt::Display for MutationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Requested => "requested",
            Self::Validated => "validated",
            Self::Applied => "applied",
            Self::SnapshotRefreshed => "snapshot-refreshed",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Check a set request against scope availability and writability.
pub fn validate_set(request: &SetRequest, scopes: &ScopeMap) -> Result<()> {
    validate_key(&request.key)?;
    require_writable(request.scope, scopes)
}

/// Check that an unset request targets an existing `(key, scope)` entry.
pub fn validate_unset(request: &UnsetRequest, current: &[ConfigEntry]) -> Result<()> {
    validate_key(&request.key)?;
    let exists = current
        .iter()
        .any(|entry| entry.scope == request.scope && same_key(&entry.key, &request.key));
    if !exists {
        return Err(Error::KeyNotFoundAtScope {
            key: request.key.clone(),
            scope: request.scope,
        });
    }
    Ok(())
}

/// Fail unless the scope has a known, writable store location.
pub fn require_writable(scope: Scope, scopes: &ScopeMap) -> Result<()> {
    match scopes.get(&scope) {
        None => Err(Error::ScopeUnavailable { scope }),
        Some(meta) if !meta.writable => Err(Error::ScopeNotWritable { scope }),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::{ScopeMetadata, scope_map};
    use rstest::rstest;

    fn scopes() -> ScopeMap {
        scope_map([
            ScopeMetadata::new(Scope::System, "/etc/gitconfig", false),
            ScopeMetadata::new(Scope::Global, "/home/u/.gitconfig", true),
        ])
    }

    fn entry(key: &str, scope: Scope) -> ConfigEntry {
        ConfigEntry {
            key: key.into(),
            value: "v".into(),
            scope,
            origin: "/x".into(),
            category_id: "uncategorized".into(),
            is_active: true,
            overridden_by: vec![],
            annotations: vec![],
        }
    }

    #[test]
    fn set_on_read_only_system_is_rejected() {
        let req = SetRequest {
            key: "user.name".into(),
            value: "Ann".into(),
            scope: Scope::System,
        };
        let err = validate_set(&req, &scopes()).unwrap_err();
        assert!(matches!(err, Error::ScopeNotWritable { scope: Scope::System }));
    }

    #[test]
    fn set_on_missing_scope_is_unavailable() {
        let req = SetRequest {
            key: "user.name".into(),
            value: "Ann".into(),
            scope: Scope::Local,
        };
        let err = validate_set(&req, &scopes()).unwrap_err();
        assert!(matches!(err, Error::ScopeUnavailable { scope: Scope::Local }));
    }

    #[rstest]
    #[case("nodot")]
    #[case("bad key.x")]
    #[case("")]
    fn malformed_keys_are_rejected_first(#[case] key: &str) {
        let set = SetRequest {
            key: key.into(),
            value: "x".into(),
            scope: Scope::System,
        };
        assert!(matches!(validate_set(&set, &scopes()), Err(Error::MalformedKey { .. })));

        let unset = UnsetRequest {
            key: key.into(),
            scope: Scope::Global,
        };
        assert!(matches!(validate_unset(&unset, &[]), Err(Error::MalformedKey { .. })));
    }

    #[test]
    fn set_on_writable_scope_passes() {
        let req = SetRequest {
            key: "user.name".into(),
            value: "Ann".into(),
            scope: Scope::Global,
        };
        assert!(validate_set(&req, &scopes()).is_ok());
    }

    #[test]
    fn unset_requires_entry_at_exact_scope() {
        let current = vec![entry("core.editor", Scope::Global)];
        let req = UnsetRequest {
            key: "core.editor".into(),
            scope: Scope::Local,
        };
        let err = validate_unset(&req, &current).unwrap_err();
        assert!(matches!(
            err,
            Error::KeyNotFoundAtScope { ref key, scope: Scope::Local } if key == "core.editor"
        ));

        let req = UnsetRequest {
            key: "core.editor".into(),
            scope: Scope::Global,
        };
        assert!(validate_unset(&req, &current).is_ok());
    }

    #[test]
    fn unset_matches_key_case_insensitively() {
        let current = vec![entry("credential.usehttppath", Scope::Global)];
        let req = UnsetRequest {
            key: "credential.useHttpPath".into(),
            scope: Scope::Global,
        };
        assert!(validate_unset(&req, &current).is_ok());
    }

    #[test]
    fn unset_keeps_subsection_case() {
        let current = vec![entry("branch.Main.merge", Scope::Global)];
        let req = UnsetRequest {
            key: "branch.main.merge".into(),
            scope: Scope::Global,
        };
        let err = validate_unset(&req, &current).unwrap_err();
        assert!(matches!(err, Error::KeyNotFoundAtScope { scope: Scope::Global, .. }));

        let req = UnsetRequest {
            key: "BRANCH.Main.Merge".into(),
            scope: Scope::Global,
        };
        assert!(validate_unset(&req, &current).is_ok());
    }

    #[test]
    fn request_accessors() {
        let req = MutationRequest::unset("core.editor", Scope::Local);
        assert_eq!(req.key(), "core.editor");
        assert_eq!(req.scope(), Scope::Local);
        assert_eq!(req.action(), "unset");
        assert_eq!(MutationState::SnapshotRefreshed.to_string(), "snapshot-refreshed");
        assert!(MutationState::Rejected.is_terminal());
        assert!(!MutationState::Applied.is_terminal());
    }
}

//! Read and mutation pipelines over a [`ConfigStore`]

use crate::category::CategoryRegistry;
use crate::error::Result;
use crate::mutation::{MutationRequest, MutationState, require_writable, validate_set, validate_unset};
use crate::normalize::normalize;
use crate::resolve::resolve;
use crate::scope::{Scope, scope_map};
use crate::snapshot::{Snapshot, assemble};
use crate::store::ConfigStore;

/// Drives `read -> normalize -> resolve -> assemble` and
/// `validate -> write -> refresh` against a store.
///
/// Holds no state between calls; every snapshot is built from a fresh read.
#[derive(Debug)]
pub struct Engine<'r, S> {
    registry: &'r CategoryRegistry,
    store: S,
}

impl<'r, S: ConfigStore> Engine<'r, S> {
    pub fn new(registry: &'r CategoryRegistry, store: S) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &CategoryRegistry {
        self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the store and assemble a snapshot.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let scopes = scope_map(self.store.scope_metadata()?);
        let raw = self.store.read_entries()?;
        tracing::debug!(raw = raw.len(), scopes = scopes.len(), "Read configuration store");

        let normalized = normalize(raw, &scopes, self.registry);
        let mut entries = normalized.entries;
        let effective = resolve(&mut entries);
        Ok(assemble(scopes, entries, effective)?.with_diagnostics(normalized.diagnostics))
    }

    /// Validate and apply a mutation, then return a freshly read snapshot.
    ///
    /// `current` must be the unfiltered snapshot the request was made
    /// against. On rejection the store is never touched; on store failure no
    /// refresh happens and the caller keeps `current`.
    pub fn apply(&self, request: &MutationRequest, current: &Snapshot) -> Result<Snapshot> {
        let key = request.key();
        let scope = request.scope();
        let action = request.action();
        transition(MutationState::Requested, action, key, scope);

        let validation = match request {
            MutationRequest::Set(set) => validate_set(set, &current.scopes),
            MutationRequest::Unset(unset) => validate_unset(unset, &current.entries)
                .and_then(|()| require_writable(unset.scope, &current.scopes)),
        };
        if let Err(err) = validation {
            transition(MutationState::Rejected, action, key, scope);
            tracing::debug!(error = %err, "Mutation rejected");
            return Err(err);
        }
        transition(MutationState::Validated, action, key, scope);

        if let Err(err) = self.store.write(request) {
            tracing::warn!(action, key, scope = %scope, error = %err, "Store write failed");
            return Err(err.into());
        }
        transition(MutationState::Applied, action, key, scope);

        let refreshed = self.snapshot()?;
        transition(MutationState::SnapshotRefreshed, action, key, scope);
        Ok(refreshed)
    }

    /// Set `key` to `value` at `scope`.
    pub fn set(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        scope: Scope,
        current: &Snapshot,
    ) -> Result<Snapshot> {
        self.apply(&MutationRequest::set(key, value, scope), current)
    }

    /// Remove `key` at `scope`.
    pub fn unset(&self, key: impl Into<String>, scope: Scope, current: &Snapshot) -> Result<Snapshot> {
        self.apply(&MutationRequest::unset(key, scope), current)
    }
}

fn transition(state: MutationState, action: &str, key: &str, scope: Scope) {
    tracing::debug!(state = %state, action, key, scope = %scope, "Mutation state");
}

//! In-memory store

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{ConfigStore, StoreResult};
use crate::entry::RawEntry;
use crate::error::StoreError;
use crate::key::same_key;
use crate::mutation::MutationRequest;
use crate::scope::{Scope, ScopeMetadata};

/// A [`ConfigStore`] held entirely in memory.
///
/// Behaves like the git-backed store for the engine's purposes: set replaces
/// every value of the key at the scope, unset removes them all. Failures can
/// be injected to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    entries: Vec<RawEntry>,
    metadata: Vec<ScopeMetadata>,
    reads: usize,
    writes: usize,
    read_failure: Option<String>,
    write_failure: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scope location (builder pattern).
    pub fn with_scope(self, metadata: ScopeMetadata) -> Self {
        self.lock().metadata.push(metadata);
        self
    }

    /// Add a declaration (builder pattern).
    pub fn with_entry(self, entry: RawEntry) -> Self {
        self.lock().entries.push(entry);
        self
    }

    pub fn push(&self, entry: RawEntry) {
        self.lock().entries.push(entry);
    }

    /// Make every subsequent read fail with the given diagnostic text.
    pub fn fail_reads(&self, stderr: impl Into<String>) {
        self.lock().read_failure = Some(stderr.into());
    }

    /// Make every subsequent write fail with the given diagnostic text.
    pub fn fail_writes(&self, stderr: impl Into<String>) {
        self.lock().write_failure = Some(stderr.into());
    }

    /// Clear injected failures.
    pub fn recover(&self) {
        let mut state = self.lock();
        state.read_failure = None;
        state.write_failure = None;
    }

    /// Number of successful reads of the entry list.
    pub fn read_count(&self) -> usize {
        self.lock().reads
    }

    /// Number of write attempts that reached the store.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    pub fn entries(&self) -> Vec<RawEntry> {
        self.lock().entries.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ConfigStore for MemoryStore {
    fn read_entries(&self) -> StoreResult<Vec<RawEntry>> {
        let mut state = self.lock();
        if let Some(stderr) = &state.read_failure {
            return Err(command_failed(stderr));
        }
        state.reads += 1;
        Ok(state.entries.clone())
    }

    fn scope_metadata(&self) -> StoreResult<Vec<ScopeMetadata>> {
        let state = self.lock();
        if let Some(stderr) = &state.read_failure {
            return Err(command_failed(stderr));
        }
        Ok(state.metadata.clone())
    }

    fn write(&self, request: &MutationRequest) -> StoreResult<()> {
        let mut state = self.lock();
        state.writes += 1;
        if let Some(stderr) = &state.write_failure {
            return Err(command_failed(stderr));
        }

        let scope = request.scope();
        let Some(origin) = state
            .metadata
            .iter()
            .find(|meta| meta.scope == scope && meta.writable)
            .map(|meta| meta.path.clone())
        else {
            return Err(command_failed(&format!(
                "error: could not lock config file for {scope} scope"
            )));
        };

        let key = request.key();
        let before = state.entries.len();
        state
            .entries
            .retain(|entry| !(entry.scope == scope && same_key(&entry.key, key)));

        match request {
            MutationRequest::Set(set) => {
                let at = insertion_point(&state.entries, scope);
                state.entries.insert(
                    at,
                    RawEntry::new(set.key.clone(), set.value.clone(), scope, origin),
                );
            }
            MutationRequest::Unset(_) if state.entries.len() == before => {
                // git exits 5 when there is nothing to unset
                return Err(StoreError::CommandFailed {
                    code: Some(5),
                    stderr: String::new(),
                });
            }
            MutationRequest::Unset(_) => {}
        }
        Ok(())
    }
}

/// Index after the last entry at or below `scope`, keeping store order.
fn insertion_point(entries: &[RawEntry], scope: Scope) -> usize {
    entries
        .iter()
        .rposition(|entry| entry.scope <= scope)
        .map_or(0, |index| index + 1)
}

fn command_failed(stderr: &str) -> StoreError {
    StoreError::CommandFailed {
        code: Some(1),
        stderr: stderr.to_string(),
    }
}

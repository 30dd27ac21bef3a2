//! Raw-store abstraction
//!
//! The engine reads and writes configuration only through [`ConfigStore`].
//! Implementations return plain tuples; they never resolve precedence.

mod memory;

pub use memory::MemoryStore;

use crate::entry::RawEntry;
use crate::error::StoreError;
use crate::mutation::MutationRequest;
use crate::scope::ScopeMetadata;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Trait for configuration stores backing the engine.
pub trait ConfigStore: Send + Sync {
    /// Every visible declaration, in store order (lowest scope first).
    ///
    /// Include directives are already expanded by the store.
    fn read_entries(&self) -> StoreResult<Vec<RawEntry>>;

    /// Location and writability of each scope known in this context.
    ///
    /// Scopes with no location (e.g. local outside a repository) are omitted.
    fn scope_metadata(&self) -> StoreResult<Vec<ScopeMetadata>>;

    /// Apply a validated mutation.
    ///
    /// Failures carry the store's own diagnostic text verbatim.
    fn write(&self, request: &MutationRequest) -> StoreResult<()>;
}

impl<T: ConfigStore + ?Sized> ConfigStore for &T {
    fn read_entries(&self) -> StoreResult<Vec<RawEntry>> {
        (**self).read_entries()
    }

    fn scope_metadata(&self) -> StoreResult<Vec<ScopeMetadata>> {
        (**self).scope_metadata()
    }

    fn write(&self, request: &MutationRequest) -> StoreResult<()> {
        (**self).write(request)
    }
}

//! Configuration aggregation and precedence resolution engine for gitcfg
//!
//! This crate turns raw per-scope configuration declarations into a single
//! precedence-aware view, implementing:
//!
//! - **Key matching**: classification of keys into semantic categories
//! - **Normalization**: key validation, origin canonicalization, duplicate collapsing
//! - **Resolution**: effective values and override relationships per key
//! - **Snapshots**: immutable, filterable, serializable aggregate state
//! - **Mutations**: validated writes followed by a full re-read
//!
//! # Architecture
//!
//! Data flows one way through pure transforms; only the store does I/O:
//!
//! ```text
//!   ConfigStore --raw tuples--> normalize --> resolve --> assemble --> Snapshot
//!        ^                                                              |
//!        +------------- write <-- validate <-- MutationRequest ---------+
//! ```
//!
//! # Example
//!
//! ```
//! use gitcfg_core::{CategoryRegistry, Engine, MemoryStore, RawEntry, Scope, ScopeMetadata};
//!
//! # fn main() -> gitcfg_core::Result<()> {
//! let registry = CategoryRegistry::with_builtins()?;
//! let store = MemoryStore::new()
//!     .with_scope(ScopeMetadata::new(Scope::Global, "/home/me/.gitconfig", true))
//!     .with_entry(RawEntry::new("user.email", "me@example.com", Scope::Global, ""));
//!
//! let snapshot = Engine::new(&registry, store).snapshot()?;
//! assert_eq!(snapshot.value("user.email"), Some("me@example.com"));
//! # Ok(())
//! # }
//! ```

pub mod category;
pub mod engine;
pub mod entry;
pub mod error;
pub mod key;
pub mod mutation;
pub mod normalize;
pub mod resolve;
pub mod scope;
pub mod settings;
pub mod snapshot;
pub mod store;
pub mod summary;

pub use category::{BundleDefinition, CategoryDefinition, CategoryRegistry, KeyMatcher, UNCATEGORIZED};
pub use engine::Engine;
pub use entry::{ConfigEntry, Diagnostic, EffectiveConfig, RawEntry};
pub use error::{CategoryLoadError, Error, Result, StoreError};
pub use key::{same_key, validate_key};
pub use mutation::{MutationRequest, MutationState, SetRequest, UnsetRequest, validate_set, validate_unset};
pub use normalize::{Normalized, normalize};
pub use resolve::{EffectiveMap, resolve};
pub use scope::{Scope, ScopeMap, ScopeMetadata, scope_map};
pub use settings::{OutputFormat, Settings, SettingsLoader};
pub use snapshot::{Snapshot, SnapshotFilter, assemble};
pub use store::{ConfigStore, MemoryStore, StoreResult};
pub use summary::{BundleSummary, CategorySummary, bundle_summaries, category_summaries};

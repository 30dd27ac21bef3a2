//! Category registry and key matching
//!
//! Categories group related configuration keys by exact key or by
//! `<section>.*` pattern. Bundles order categories for guided workflows.

mod builtins;
mod matcher;
mod registry;
mod types;

pub use builtins::{BUILTIN_CATEGORY_COUNT, builtin_bundles, builtin_categories};
pub use matcher::KeyMatcher;
pub use registry::CategoryRegistry;
pub use types::{BundleDefinition, CategoryDefinition, KeyPattern, UNCATEGORIZED};

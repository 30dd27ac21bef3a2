//! Category registry storage

use std::collections::HashSet;

use super::builtins::{builtin_bundles, builtin_categories};
use super::matcher::KeyMatcher;
use super::types::{BundleDefinition, CategoryDefinition, UNCATEGORIZED};
use crate::error::{CategoryLoadError, Error, Result};

/// Immutable registry of category and bundle definitions.
///
/// Built once per process and passed by reference; all validation happens
/// in the constructor so a registry that exists is always consistent.
#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<CategoryDefinition>,
    bundles: Vec<BundleDefinition>,
    matcher: KeyMatcher,
    uncategorized: CategoryDefinition,
}

impl CategoryRegistry {
    /// Build a registry from definitions, validating them.
    pub fn new(
        categories: Vec<CategoryDefinition>,
        bundles: Vec<BundleDefinition>,
    ) -> Result<Self> {
        validate(&categories, &bundles)?;
        let matcher = KeyMatcher::build(&categories)?;

        tracing::debug!(
            categories = categories.len(),
            bundles = bundles.len(),
            "Category registry loaded"
        );

        Ok(Self {
            categories,
            bundles,
            matcher,
            uncategorized: CategoryDefinition::uncategorized(),
        })
    }

    /// Build a registry holding only the built-in definitions.
    pub fn with_builtins() -> Result<Self> {
        Self::new(builtin_categories(), builtin_bundles())
    }

    /// Build a registry of the built-ins followed by extra definitions.
    pub fn with_extensions(
        categories: impl IntoIterator<Item = CategoryDefinition>,
        bundles: impl IntoIterator<Item = BundleDefinition>,
    ) -> Result<Self> {
        let mut all_categories = builtin_categories();
        all_categories.extend(categories);
        let mut all_bundles = builtin_bundles();
        all_bundles.extend(bundles);
        Self::new(all_categories, all_bundles)
    }

    /// Categories in registry order (without `uncategorized`).
    pub fn categories(&self) -> &[CategoryDefinition] {
        &self.categories
    }

    /// Bundles in presentation order.
    pub fn bundles(&self) -> &[BundleDefinition] {
        &self.bundles
    }

    /// Look up a category by id; `uncategorized` always resolves.
    pub fn resolve(&self, id: &str) -> Result<&CategoryDefinition> {
        self.get(id)
            .ok_or_else(|| Error::CategoryNotFound { id: id.to_string() })
    }

    pub fn get(&self, id: &str) -> Option<&CategoryDefinition> {
        if id == UNCATEGORIZED {
            return Some(&self.uncategorized);
        }
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn bundle(&self, id: &str) -> Option<&BundleDefinition> {
        self.bundles.iter().find(|b| b.id == id)
    }

    /// Category id for a configuration key.
    pub fn classify(&self, key: &str) -> &str {
        self.matcher.classify(key)
    }

    /// The definition covering a configuration key.
    pub fn category_for_key(&self, key: &str) -> &CategoryDefinition {
        self.get(self.classify(key)).unwrap_or(&self.uncategorized)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

fn validate(
    categories: &[CategoryDefinition],
    bundles: &[BundleDefinition],
) -> std::result::Result<(), CategoryLoadError> {
    let mut ids = HashSet::new();
    for category in categories {
        if category.id.is_empty() {
            return Err(CategoryLoadError::EmptyCategoryId);
        }
        if category.id == UNCATEGORIZED {
            return Err(CategoryLoadError::ReservedCategory {
                id: category.id.clone(),
            });
        }
        if !ids.insert(category.id.as_str()) {
            return Err(CategoryLoadError::DuplicateCategory {
                id: category.id.clone(),
            });
        }
    }

    for category in categories {
        for related in &category.related {
            if !ids.contains(related.as_str()) {
                tracing::warn!(
                    category = %category.id,
                    related = %related,
                    "Related category is not registered"
                );
            }
        }
    }

    let mut bundle_ids = HashSet::new();
    for bundle in bundles {
        if !bundle_ids.insert(bundle.id.as_str()) {
            return Err(CategoryLoadError::DuplicateBundle {
                id: bundle.id.clone(),
            });
        }
        if let Some(missing) = bundle
            .categories
            .iter()
            .find(|id| !ids.contains(id.as_str()))
        {
            return Err(CategoryLoadError::UnknownBundleCategory {
                bundle: bundle.id.clone(),
                category: missing.clone(),
            });
        }
    }

    Ok(())
}

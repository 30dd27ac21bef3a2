//! Category and bundle coverage summaries

use std::collections::HashMap;

use serde::Serialize;

use crate::category::{BundleDefinition, CategoryDefinition, CategoryRegistry, UNCATEGORIZED};
use crate::entry::ConfigEntry;
use crate::snapshot::Snapshot;

/// Entries of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: CategoryDefinition,
    /// Ordered by key, then scope
    pub entries: Vec<ConfigEntry>,
    pub active_count: usize,
}

impl CategorySummary {
    fn new(category: CategoryDefinition, mut entries: Vec<ConfigEntry>) -> Self {
        entries.sort_by(|a, b| (a.key.as_str(), a.scope).cmp(&(b.key.as_str(), b.scope)));
        let active_count = entries.iter().filter(|e| e.is_active).count();
        Self {
            category,
            entries,
            active_count,
        }
    }

    pub fn total_entries(&self) -> usize {
        self.entries.len()
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// Coverage of one bundle's categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleSummary {
    pub bundle: BundleDefinition,
    pub categories: Vec<CategorySummary>,
    /// Categories with at least one entry
    pub covered: usize,
    /// Categories with at least one active entry
    pub active: usize,
}

impl BundleSummary {
    pub fn total_categories(&self) -> usize {
        self.categories.len()
    }

    /// Fraction of categories with entries; 0.0 for an empty bundle.
    pub fn coverage_ratio(&self) -> f64 {
        if self.categories.is_empty() {
            return 0.0;
        }
        self.covered as f64 / self.categories.len() as f64
    }
}

/// One summary per registry category, followed by `uncategorized`.
///
/// Entries whose category id is unknown to the registry are reclassified by
/// key, so a snapshot built with a different registry still summarizes.
pub fn category_summaries(snapshot: &Snapshot, registry: &CategoryRegistry) -> Vec<CategorySummary> {
    let mut grouped: HashMap<&str, Vec<ConfigEntry>> = HashMap::new();
    for entry in &snapshot.entries {
        let id = if registry.contains(&entry.category_id) {
            entry.category_id.as_str()
        } else {
            registry.classify(&entry.key)
        };
        grouped.entry(id).or_default().push(entry.clone());
    }

    let mut summaries: Vec<CategorySummary> = registry
        .categories()
        .iter()
        .map(|category| {
            let entries = grouped.remove(category.id.as_str()).unwrap_or_default();
            CategorySummary::new(category.clone(), entries)
        })
        .collect();
    summaries.push(CategorySummary::new(
        CategoryDefinition::uncategorized(),
        grouped.remove(UNCATEGORIZED).unwrap_or_default(),
    ));
    summaries
}

/// One summary per registry bundle, built from category summaries.
pub fn bundle_summaries(
    categories: &[CategorySummary],
    registry: &CategoryRegistry,
) -> Vec<BundleSummary> {
    let by_id: HashMap<&str, &CategorySummary> = categories
        .iter()
        .map(|summary| (summary.category.id.as_str(), summary))
        .collect();

    registry
        .bundles()
        .iter()
        .map(|bundle| {
            let members: Vec<CategorySummary> = bundle
                .categories
                .iter()
                .filter_map(|id| {
                    by_id.get(id.as_str()).map(|s| (*s).clone()).or_else(|| {
                        registry
                            .get(id)
                            .map(|category| CategorySummary::new(category.clone(), Vec::new()))
                    })
                })
                .collect();
            let covered = members.iter().filter(|s| s.has_entries()).count();
            let active = members.iter().filter(|s| s.active_count > 0).count();
            BundleSummary {
                bundle: bundle.clone(),
                categories: members,
                covered,
                active,
            }
        })
        .collect()
}

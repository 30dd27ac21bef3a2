//! Key-to-category matching
//!
//! Exact keys win over section patterns; among section patterns the first
//! category in registry order wins; anything else is `uncategorized`.
//! Comparison ignores ASCII case because git lowercases section and variable
//! names in its listings while definitions use camelCase.

use std::collections::HashMap;

use super::types::{CategoryDefinition, KeyPattern, UNCATEGORIZED};
use crate::error::CategoryLoadError;
use crate::key;

/// Index over category definitions answering `classify(key)`.
#[derive(Debug, Clone, Default)]
pub struct KeyMatcher {
    /// Lowercased exact key -> category id
    exact: HashMap<String, String>,
    /// (lowercased section, category id) in registry order
    sections: Vec<(String, String)>,
}

impl KeyMatcher {
    /// Build the index, rejecting keys claimed by two categories.
    pub fn build(categories: &[CategoryDefinition]) -> Result<Self, CategoryLoadError> {
        let mut matcher = Self::default();

        for category in categories {
            for pattern in category.patterns()? {
                match pattern {
                    KeyPattern::Exact(key) => {
                        let folded = key.to_ascii_lowercase();
                        if let Some(first) = matcher.exact.get(&folded) {
                            return Err(CategoryLoadError::AmbiguousKey {
                                key,
                                first: first.clone(),
                                second: category.id.clone(),
                            });
                        }
                        matcher.exact.insert(folded, category.id.clone());
                    }
                    KeyPattern::Section(section) => {
                        matcher
                            .sections
                            .push((section.to_ascii_lowercase(), category.id.clone()));
                    }
                }
            }
        }

        Ok(matcher)
    }

    /// Classify a key. Never fails.
    pub fn classify(&self, config_key: &str) -> &str {
        if let Some(id) = self.exact.get(&config_key.to_ascii_lowercase()) {
            return id;
        }

        let section = key::section(config_key);
        self.sections
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(section))
            .map(|(_, id)| id.as_str())
            .unwrap_or(UNCATEGORIZED)
    }
}

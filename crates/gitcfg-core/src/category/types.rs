//! Category and bundle definition types

use serde::{Deserialize, Serialize};

use crate::error::CategoryLoadError;
use crate::key;

/// Reserved id for keys no category claims.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Semantic grouping of configuration keys.
///
/// `keys` mixes exact keys (`user.email`) and prefix patterns (`remote.*`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub related: Vec<String>,
}

impl CategoryDefinition {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            keys: Vec::new(),
            related: Vec::new(),
        }
    }

    /// Add exact keys or patterns (builder pattern).
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Add related category ids (builder pattern).
    pub fn with_related<I, S>(mut self, related: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related.extend(related.into_iter().map(Into::into));
        self
    }

    /// Parse every declared key into a [`KeyPattern`].
    pub fn patterns(&self) -> Result<Vec<KeyPattern>, CategoryLoadError> {
        self.keys
            .iter()
            .map(|raw| KeyPattern::parse(raw, &self.id))
            .collect()
    }

    /// The definition used for keys no category claims.
    pub fn uncategorized() -> Self {
        Self::new(
            UNCATEGORIZED,
            "Uncategorized",
            "Configuration keys without curated metadata.",
        )
    }
}

/// Ordered set of categories presented together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub categories: Vec<String>,
}

impl BundleDefinition {
    pub fn new<I, S>(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        categories: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }
}

/// A parsed entry of [`CategoryDefinition::keys`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPattern {
    /// Matches one key exactly
    Exact(String),
    /// Matches every key whose leading segment equals this one
    Section(String),
}

impl KeyPattern {
    /// Parse a declared key. Wildcards are only allowed as `<section>.*`.
    pub fn parse(raw: &str, category: &str) -> Result<Self, CategoryLoadError> {
        let invalid = || CategoryLoadError::InvalidPattern {
            category: category.to_string(),
            pattern: raw.to_string(),
        };

        if raw.contains(['*', '?', '[']) {
            let section = raw.strip_suffix(".*").ok_or_else(invalid)?;
            if section.is_empty()
                || section.contains(['.', '*', '?', '['])
                || key::validate_key(&format!("{section}.x")).is_err()
            {
                return Err(invalid());
            }
            return Ok(Self::Section(section.to_string()));
        }

        key::validate_key(raw).map_err(|_| invalid())?;
        Ok(Self::Exact(raw.to_string()))
    }
}

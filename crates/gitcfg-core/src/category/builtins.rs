//! Built-in category and bundle definitions
//!
//! These are the curated groupings shipped with gitcfg. User-defined
//! categories from settings are appended after them, so built-ins win
//! prefix ties.

use super::{BundleDefinition, CategoryDefinition};

/// Number of built-in categories.
pub const BUILTIN_CATEGORY_COUNT: usize = 6;

/// Returns the built-in categories in registry order.
pub fn builtin_categories() -> Vec<CategoryDefinition> {
    vec![
        CategoryDefinition::new(
            "user-identity",
            "User Identity",
            "Identity details applied to commits and tags.",
        )
        .with_keys(["user.name", "user.email"])
        .with_related(["credential-management", "commit-signing"]),
        CategoryDefinition::new(
            "credential-management",
            "Credential Management",
            "Authentication helpers and credential caching controls.",
        )
        .with_keys(["credential.helper", "credential.useHttpPath"])
        .with_related(["user-identity"]),
        CategoryDefinition::new(
            "commit-signing",
            "Commit Signing",
            "Enable and configure signing of commits.",
        )
        .with_keys([
            "user.signingkey",
            "commit.gpgsign",
            "tag.gpgsign",
            "gpg.format",
            "gpg.program",
        ])
        .with_related(["user-identity"]),
        CategoryDefinition::new(
            "core-behavior",
            "Core Behavior",
            "Global Git behaviors that influence repository interactions.",
        )
        .with_keys(["core.*", "init.defaultBranch"]),
        CategoryDefinition::new(
            "remote-settings",
            "Remote Settings",
            "Remote and branch settings controlling fetch/push flows.",
        )
        .with_keys(["remote.*", "branch.*"]),
        CategoryDefinition::new(
            "custom-capabilities",
            "Custom Capabilities",
            "Command aliases available to the user.",
        )
        .with_keys(["alias.*"]),
    ]
}

/// Returns the built-in bundles in presentation order.
pub fn builtin_bundles() -> Vec<BundleDefinition> {
    vec![
        BundleDefinition::new(
            "starter-identity",
            "Starter Identity Setup",
            "Recommended sequence for configuring author identity information.",
            ["user-identity", "credential-management"],
        ),
        BundleDefinition::new(
            "secure-collaboration",
            "Secure Collaboration",
            "Settings that help avoid merge pitfalls and enforce secure defaults.",
            ["commit-signing"],
        ),
    ]
}

//! Syntactic validation of configuration keys
//!
//! Keys follow git's dotted grammar: `section[.subsection].name`. The section
//! and the variable name are restricted to `[A-Za-z0-9-]`; a subsection (for
//! example a branch or remote name) may contain anything except NUL and
//! newline, so `branch.feature/x.merge` is accepted. A key without a dot
//! is rejected because git refuses to read or write one.
//!
//! Section and variable names are case-insensitive; subsections are not, so
//! `branch.Main.merge` and `branch.main.merge` are different keys.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\-]+$").expect("segment pattern is valid"));

/// Validate a configuration key.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::malformed_key(key, "key cannot be empty"));
    }

    let (section, rest) = key
        .split_once('.')
        .ok_or_else(|| Error::malformed_key(key, "key must have the form section.name"))?;
    let (subsection, name) = match rest.rsplit_once('.') {
        Some((sub, name)) => (Some(sub), name),
        None => (None, rest),
    };

    if !SEGMENT.is_match(section) {
        return Err(Error::malformed_key(
            key,
            "section may contain letters, numbers and hyphens",
        ));
    }
    if !SEGMENT.is_match(name) {
        return Err(Error::malformed_key(
            key,
            "variable name may contain letters, numbers and hyphens",
        ));
    }
    if let Some(sub) = subsection {
        if sub.is_empty() {
            return Err(Error::malformed_key(key, "subsection cannot be empty"));
        }
        if sub.contains(['\n', '\0']) {
            return Err(Error::malformed_key(
                key,
                "subsection cannot contain newline or NUL",
            ));
        }
    }

    Ok(())
}

/// True when `key` passes [`validate_key`].
pub fn is_valid_key(key: &str) -> bool {
    validate_key(key).is_ok()
}

/// True when `a` and `b` name the same key under git's case rules.
pub fn same_key(a: &str, b: &str) -> bool {
    let (a_section, a_sub, a_name) = split(a);
    let (b_section, b_sub, b_name) = split(b);
    a_section.eq_ignore_ascii_case(b_section)
        && a_name.eq_ignore_ascii_case(b_name)
        && a_sub == b_sub
}

fn split(key: &str) -> (&str, Option<&str>, &str) {
    let Some((section, rest)) = key.split_once('.') else {
        return (key, None, "");
    };
    match rest.rsplit_once('.') {
        Some((sub, name)) => (section, Some(sub), name),
        None => (section, None, rest),
    }
}

/// The leading dotted segment of a key (`remote` for `remote.origin.url`).
pub fn section(key: &str) -> &str {
    key.split('.').next().unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("user.email")]
    #[case("core.editor")]
    #[case("remote.origin.url")]
    #[case("credential.useHttpPath")]
    #[case("branch.chore/bootstrap-repo-and-speckit.merge")]
    #[case("remote.my fork.url")]
    #[case("url.https://example.com/.insteadof")]
    #[case("init.defaultbranch")]
    fn accepts_git_keys(#[case] key: &str) {
        assert!(validate_key(key).is_ok(), "{key} should be valid");
    }

    #[rstest]
    #[case("")]
    #[case("user")]
    #[case("invalid key")]
    #[case("user.na me")]
    #[case("user.email!")]
    #[case("us_er.name")]
    #[case(".name")]
    #[case("user.")]
    #[case("user..name")]
    #[case("remote.a\nb.url")]
    fn rejects_malformed_keys(#[case] key: &str) {
        let err = validate_key(key).unwrap_err();
        assert!(matches!(err, Error::MalformedKey { .. }), "{key:?}");
    }

    #[rstest]
    #[case("user.email", "USER.Email", true)]
    #[case("branch.main.merge", "Branch.main.MERGE", true)]
    #[case("branch.Main.merge", "branch.main.merge", false)]
    #[case("remote.origin.url", "remote.url", false)]
    #[case("branch.feature/x.merge", "branch.feature/x.merge", true)]
    fn same_key_folds_case_outside_subsection(#[case] a: &str, #[case] b: &str, #[case] expected: bool) {
        assert_eq!(same_key(a, b), expected);
        assert_eq!(same_key(b, a), expected);
    }

    #[test]
    fn section_is_leading_segment() {
        assert_eq!(section("remote.origin.url"), "remote");
        assert_eq!(section("core"), "core");
    }
}

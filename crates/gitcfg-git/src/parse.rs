//! Parser for `git config --list --show-scope --show-origin -z`
//!
//! Each record is `scope NUL origin NUL key LF value NUL`. A key with no LF
//! is an implicit boolean (`[core] bare`) and gets an empty value.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use gitcfg_core::{RawEntry, Scope};

use crate::error::{Error, Result};

/// Parse null-delimited listing output into raw entries, in output order.
///
/// Records from scopes the engine does not model (`worktree`, `command`)
/// are skipped. Relative `file:` origins are resolved against `cwd`;
/// non-file origins (`blob:`, `command line:`) yield an empty origin.
/// Values are kept verbatim when they are valid UTF-8; invalid bytes are
/// replaced with U+FFFD and the record is logged as a warning.
pub fn parse_config_list(output: &[u8], cwd: &Path) -> Result<Vec<RawEntry>> {
    let mut fields = output.split(|byte| *byte == 0).map(decode);
    let mut entries = Vec::new();

    loop {
        let scope = match fields.next() {
            None => break,
            Some(scope) if scope.is_empty() => break,
            Some(scope) => scope,
        };
        let origin = fields
            .next()
            .ok_or_else(|| Error::parse(format!("record for scope '{scope}' has no origin")))?;
        let pair = fields
            .next()
            .ok_or_else(|| Error::parse(format!("record from '{origin}' has no key")))?;

        let (key, value) = pair.split_once('\n').unwrap_or((&*pair, ""));
        if key.is_empty() {
            return Err(Error::parse(format!("record from '{origin}' has an empty key")));
        }

        let Some(scope) = parse_scope(&scope) else {
            tracing::debug!(scope = %scope, key, "Skipping record from unmodelled scope");
            continue;
        };

        entries.push(RawEntry::new(key, value, scope, parse_origin(&origin, cwd)));
    }

    tracing::debug!(entries = entries.len(), "Parsed git config listing");
    Ok(entries)
}

fn decode(field: &[u8]) -> Cow<'_, str> {
    let text = String::from_utf8_lossy(field);
    if let Cow::Owned(ref lossy) = text {
        tracing::warn!(field = %lossy, "git config output is not valid UTF-8; invalid bytes replaced");
    }
    text
}

fn parse_scope(raw: &str) -> Option<Scope> {
    match raw {
        "system" => Some(Scope::System),
        "global" => Some(Scope::Global),
        "local" => Some(Scope::Local),
        _ => None,
    }
}

fn parse_origin(raw: &str, cwd: &Path) -> PathBuf {
    let Some(path) = raw.strip_prefix("file:") else {
        return PathBuf::new();
    };
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CWD: &str = "/work/app";

    fn parse(raw: &str) -> Vec<RawEntry> {
        parse_config_list(raw.as_bytes(), Path::new(CWD)).unwrap()
    }

    #[test]
    fn parses_records_in_order() {
        let raw = "system\0file:/etc/gitconfig\0user.email\na@x.com\0\
                   global\0file:/home/u/.gitconfig\0user.email\nb@x.com\0\
                   local\0file:.git/config\0core.bare\nfalse\0";
        let entries = parse(raw);

        assert_eq!(
            entries,
            vec![
                RawEntry::new("user.email", "a@x.com", Scope::System, "/etc/gitconfig"),
                RawEntry::new("user.email", "b@x.com", Scope::Global, "/home/u/.gitconfig"),
                RawEntry::new("core.bare", "false", Scope::Local, "/work/app/.git/config"),
            ]
        );
    }

    #[test]
    fn implicit_boolean_has_empty_value() {
        let entries = parse("global\0file:/g\0core.autocrlf\0");
        assert_eq!(entries[0].key, "core.autocrlf");
        assert_eq!(entries[0].value, "");
    }

    #[test]
    fn values_keep_newlines_and_whitespace() {
        let entries = parse("global\0file:/g\0alias.multi\n  line one\nline two \0");
        assert_eq!(entries[0].value, "  line one\nline two ");
    }

    #[test]
    fn unmodelled_scopes_are_skipped() {
        let raw = "command\0command line:\0core.pager\ncat\0\
                   worktree\0file:.git/config.worktree\0core.sparse\ntrue\0\
                   global\0file:/g\0user.name\nAnn\0";
        let entries = parse(raw);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "user.name");
    }

    #[test]
    fn non_file_origin_is_empty() {
        let entries = parse("global\0blob:abc123\0user.name\nAnn\0");
        assert_eq!(entries[0].origin, PathBuf::new());
    }

    #[test]
    fn empty_output_is_empty_listing() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn invalid_utf8_is_replaced_not_dropped() {
        let raw = b"global\0file:/g\0user.name\nAnn\xff\0global\0file:/g\0user.email\na@x.com\0";
        let entries = parse_config_list(raw, Path::new(CWD)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value, "Ann\u{FFFD}");
        assert_eq!(entries[1].value, "a@x.com");
    }

    #[test]
    fn truncated_record_is_error() {
        let err = parse_config_list(b"global\0file:/g", Path::new(CWD)).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}

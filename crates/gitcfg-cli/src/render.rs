//! Terminal rendering of snapshots and summaries
//!
//! Functions return strings so commands stay thin and output is testable.

use std::fmt::Write;

use colored::{ColoredString, Colorize};
use gitcfg_core::{
    BundleSummary, CategoryRegistry, CategorySummary, ConfigEntry, EffectiveConfig, Scope,
    Snapshot, category_summaries,
};

const NONE: &str = "-";
const EMPTY_VALUE: &str = "∅";

/// Theme color for a scope.
pub fn scope_label(scope: Scope) -> ColoredString {
    paint_scope(scope.as_str(), scope)
}

fn paint_scope(text: &str, scope: Scope) -> ColoredString {
    match scope {
        Scope::System => text.cyan().bold(),
        Scope::Global => text.green().bold(),
        Scope::Local => text.magenta().bold(),
    }
}

/// Availability, writability and path of every scope.
pub fn scope_overview(snapshot: &Snapshot, highlight: Option<Scope>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Scope Overview".bold());
    for scope in Scope::ALL {
        let label = format!("{:<8}", scope.as_str());
        let mut label = paint_scope(&label, scope);
        if highlight == Some(scope) {
            label = label.reversed();
        }
        let (status, path) = match snapshot.scopes.get(&scope) {
            Some(meta) if meta.writable => (
                format!("{:<12}", "Writable").green(),
                meta.path.display().to_string().dimmed(),
            ),
            Some(meta) => (
                format!("{:<12}", "Read-only").white(),
                meta.path.display().to_string().dimmed(),
            ),
            None => (format!("{:<12}", "Unavailable").yellow(), NONE.dimmed()),
        };
        let _ = writeln!(out, "  {label} {status} {path}");
    }
    out
}

/// Entries grouped by category, one row per `(key, scope)`.
///
/// Returns `None` when there is nothing to show.
pub fn entries_table(snapshot: &Snapshot, registry: &CategoryRegistry) -> Option<String> {
    let summaries: Vec<CategorySummary> = category_summaries(snapshot, registry)
        .into_iter()
        .filter(CategorySummary::has_entries)
        .collect();
    if summaries.is_empty() {
        return None;
    }

    let rows = summaries.iter().flat_map(|s| s.entries.iter());
    let key_width = rows.clone().map(|e| e.key.chars().count()).max().unwrap_or(0);
    let value_width = rows
        .map(|e| display_value(&e.value).chars().count())
        .max()
        .unwrap_or(0)
        .min(48);

    let mut out = String::new();
    for (index, summary) in summaries.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "{} {}",
            summary.category.name.bold(),
            format!("({})", summary.category.id).dimmed()
        );

        let mut last_key: Option<&str> = None;
        for entry in &summary.entries {
            let key_cell = if last_key == Some(entry.key.as_str()) {
                " ".repeat(key_width)
            } else {
                format!("{:<key_width$}", entry.key)
            };
            last_key = Some(&entry.key);

            let _ = writeln!(
                out,
                "  {} {} {} {} {}",
                key_cell.bold(),
                value_cell(entry, value_width),
                paint_scope(&format!("{:<6}", entry.scope.as_str()), entry.scope),
                entry.origin.display().to_string().dimmed(),
                notes(entry),
            );
        }
    }
    Some(out)
}

/// Effective value of one key followed by its per-scope chain.
pub fn effective_chain(effective: &EffectiveConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} = {}",
        effective.key.bold(),
        paint_scope(&display_value(effective.value()), effective.active_entry.scope)
    );
    let value_width = effective
        .all_entries
        .iter()
        .map(|e| display_value(&e.value).chars().count())
        .max()
        .unwrap_or(0)
        .min(48);
    for entry in &effective.all_entries {
        let status = if entry.is_active {
            "active".green().bold()
        } else {
            format!("overridden by {}", join_scopes(&entry.overridden_by)).yellow()
        };
        let _ = writeln!(
            out,
            "  {} {} {} {}",
            paint_scope(&format!("{:<6}", entry.scope.as_str()), entry.scope),
            value_cell(entry, value_width),
            status,
            entry.origin.display().to_string().dimmed(),
        );
    }
    out
}

/// One line per category, then one line per bundle.
pub fn summaries(categories: &[CategorySummary], bundles: &[BundleSummary]) -> String {
    let mut out = String::new();
    let id_width = categories
        .iter()
        .map(|s| s.category.id.len())
        .max()
        .unwrap_or(0);

    let _ = writeln!(out, "{}", "Categories".bold());
    for summary in categories {
        let counts = format!(
            "{} entries, {} active",
            summary.total_entries(),
            summary.active_count
        );
        let counts = if summary.has_entries() {
            counts.normal()
        } else {
            counts.dimmed()
        };
        let _ = writeln!(
            out,
            "  {} {:<28} {}",
            format!("{:<id_width$}", summary.category.id).cyan(),
            summary.category.name,
            counts
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Bundles".bold());
    for bundle in bundles {
        let ratio = format!(
            "{}/{} categories covered ({:.0}%)",
            bundle.covered,
            bundle.total_categories(),
            bundle.coverage_ratio() * 100.0
        );
        let ratio = if bundle.covered == bundle.total_categories() && bundle.covered > 0 {
            ratio.green()
        } else {
            ratio.yellow()
        };
        let members: Vec<&str> = bundle
            .categories
            .iter()
            .map(|s| s.category.id.as_str())
            .collect();
        let _ = writeln!(
            out,
            "  {} {} {}",
            bundle.bundle.id.cyan(),
            ratio,
            format!("[{}]", members.join(", ")).dimmed()
        );
    }
    out
}

/// Message shown when filters leave nothing.
pub fn empty_message(scope: Option<Scope>, category: Option<&str>, keyword: Option<&str>) -> String {
    let mut message = "No configuration entries available for the selected options.".to_string();
    if let Some(scope) = scope {
        let _ = write!(message, " (scope: {scope})");
    }
    if let Some(category) = category {
        let _ = write!(message, " (category: {category})");
    }
    if let Some(keyword) = keyword.filter(|k| !k.is_empty()) {
        let _ = write!(message, " (search: {keyword})");
    }
    message
}

/// Printable form of a value: newlines escaped, empty shown as `∅`.
pub fn display_value(value: &str) -> String {
    if value.is_empty() {
        EMPTY_VALUE.to_string()
    } else {
        value.replace('\n', "\\n")
    }
}

fn value_cell(entry: &ConfigEntry, width: usize) -> ColoredString {
    let text = format!("{:<width$}", display_value(&entry.value));
    if entry.value.is_empty() {
        return text.dimmed().italic();
    }
    if entry.is_active {
        paint_scope(&text, entry.scope)
    } else {
        text.dimmed().strikethrough()
    }
}

fn notes(entry: &ConfigEntry) -> ColoredString {
    let mut parts: Vec<String> = Vec::new();
    if entry.is_overridden() {
        parts.push(format!("overridden by {}", join_scopes(&entry.overridden_by)));
    }
    parts.extend(entry.annotations.iter().cloned());
    if parts.is_empty() {
        NONE.dimmed()
    } else {
        parts.join("; ").yellow()
    }
}

fn join_scopes(scopes: &[Scope]) -> String {
    scopes
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

//! Command implementations for gitcfg-cli

pub mod categories;
pub mod get;
pub mod mutate;
pub mod view;

pub use categories::run_categories;
pub use get::run_get;
pub use mutate::{run_set, run_unset};
pub use view::run_view;

use colored::Colorize;
use gitcfg_core::Diagnostic;

/// Print skipped-entry diagnostics as warnings on stderr.
pub(crate) fn warn_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!(
            "{} {} ({}, {}): {}",
            "warning:".yellow().bold(),
            diagnostic.key,
            diagnostic.scope,
            diagnostic.origin.display(),
            diagnostic.message
        );
    }
}

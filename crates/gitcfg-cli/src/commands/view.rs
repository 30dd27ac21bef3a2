//! The view command

use gitcfg_core::{Error as CoreError, OutputFormat, Scope, SnapshotFilter};

use super::warn_diagnostics;
use crate::context::AppContext;
use crate::error::Result;
use crate::render;

/// Run the view command
pub fn run_view(
    ctx: &AppContext,
    scope: Option<Scope>,
    category: Option<&str>,
    search: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    if let Some(id) = category {
        ctx.registry.resolve(id)?;
    }

    let snapshot = ctx.engine().snapshot()?;
    if let Some(scope) = scope {
        if !snapshot.scopes.contains_key(&scope) {
            return Err(CoreError::ScopeUnavailable { scope }.into());
        }
    }

    let mut filter = SnapshotFilter::new();
    if let Some(scope) = scope {
        filter = filter.scope(scope);
    }
    if let Some(id) = category {
        filter = filter.category(id);
    }
    if let Some(keyword) = search {
        filter = filter.keyword(keyword);
    }
    let view = snapshot.filter(&filter);
    tracing::debug!(entries = view.entries.len(), keys = view.effective_map.len(), "Filtered snapshot");

    warn_diagnostics(&view.diagnostics);

    match format {
        OutputFormat::Json => println!("{}", view.to_json()?),
        OutputFormat::Pretty => {
            print!("{}", render::scope_overview(&view, scope));
            println!();
            match render::entries_table(&view, &ctx.registry) {
                Some(table) => print!("{table}"),
                None => println!("{}", render::empty_message(scope, category, search)),
            }
        }
    }
    Ok(())
}

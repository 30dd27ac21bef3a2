//! The set and unset commands

use colored::Colorize;
use gitcfg_core::{MutationRequest, Scope, Snapshot};

use crate::context::AppContext;
use crate::error::Result;
use crate::render;

/// Run the set command
pub fn run_set(ctx: &AppContext, key: &str, value: &str, scope: Scope) -> Result<()> {
    apply(ctx, MutationRequest::set(key, value, scope))
}

/// Run the unset command
pub fn run_unset(ctx: &AppContext, key: &str, scope: Scope) -> Result<()> {
    apply(ctx, MutationRequest::unset(key, scope))
}

fn apply(ctx: &AppContext, request: MutationRequest) -> Result<()> {
    let engine = ctx.engine();
    let current = engine.snapshot()?;
    let refreshed = engine.apply(&request, &current)?;

    let verb = match request {
        MutationRequest::Set(_) => "Set",
        MutationRequest::Unset(_) => "Unset",
    };
    println!(
        "{} {} {} at {} scope",
        "OK".green().bold(),
        verb,
        request.key().bold(),
        render::scope_label(request.scope())
    );
    print_effective(&refreshed, request.key());
    Ok(())
}

fn print_effective(snapshot: &Snapshot, key: &str) {
    match snapshot.lookup(key) {
        Some(effective) => println!(
            "   Effective value: {} (from {})",
            render::display_value(effective.value()),
            render::scope_label(effective.active_entry.scope)
        ),
        None => println!("   {} is no longer set at any scope", key.bold()),
    }
}

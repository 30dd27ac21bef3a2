//! gitcfg CLI
//!
//! Scope-aware inspection and editing of git configuration.

mod cli;
mod commands;
mod context;
mod error;
mod logging;
mod render;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::AppContext;
use error::Result;

fn main() {
    let cli = Cli::parse();
    if cli.global.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", e.title().red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    logging::init(cli.global.verbose)?;
    tracing::debug!(command = ?cli.command, "Starting gitcfg");

    let ctx = AppContext::load(&cli.global)?;
    execute_command(&ctx, cli.command)
}

fn execute_command(ctx: &AppContext, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::View {
            scope,
            category,
            search,
            format,
        } => commands::run_view(
            ctx,
            scope,
            category.as_deref(),
            search.as_deref(),
            ctx.format(format),
        ),
        Commands::Get { key, format } => commands::run_get(ctx, &key, ctx.format(format)),
        Commands::Set { key, value, scope } => commands::run_set(ctx, &key, &value, scope),
        Commands::Unset { key, scope } => commands::run_unset(ctx, &key, scope),
        Commands::Categories { format } => commands::run_categories(ctx, ctx.format(format)),
    }
}

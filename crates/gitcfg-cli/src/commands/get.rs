//! The get command

use gitcfg_core::{OutputFormat, validate_key};

use crate::context::AppContext;
use crate::error::{CliError, Result};
use crate::render;

/// Run the get command
///
/// A key that is not set at any scope is an error, as with `git config`.
pub fn run_get(ctx: &AppContext, key: &str, format: OutputFormat) -> Result<()> {
    validate_key(key)?;

    let snapshot = ctx.engine().snapshot()?;
    let Some(effective) = snapshot.lookup(key) else {
        return Err(CliError::user(format!("Key '{key}' is not set at any scope")));
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(effective)?),
        OutputFormat::Pretty => print!("{}", render::effective_chain(effective)),
    }
    Ok(())
}

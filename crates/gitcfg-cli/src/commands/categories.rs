//! The categories command

use gitcfg_core::{OutputFormat, bundle_summaries, category_summaries};
use serde_json::json;

use crate::context::AppContext;
use crate::error::Result;
use crate::render;

/// Run the categories command
pub fn run_categories(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let snapshot = ctx.engine().snapshot()?;
    let categories = category_summaries(&snapshot, &ctx.registry);
    let bundles = bundle_summaries(&categories, &ctx.registry);

    match format {
        OutputFormat::Pretty => print!("{}", render::summaries(&categories, &bundles)),
        OutputFormat::Json => {
            let document = json!({
                "categories": categories.iter().map(|s| json!({
                    "id": s.category.id,
                    "name": s.category.name,
                    "description": s.category.description,
                    "entries": s.total_entries(),
                    "active": s.active_count,
                })).collect::<Vec<_>>(),
                "bundles": bundles.iter().map(|b| json!({
                    "id": b.bundle.id,
                    "name": b.bundle.name,
                    "categories": b.bundle.categories,
                    "covered": b.covered,
                    "active": b.active,
                    "coverage": b.coverage_ratio(),
                })).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }
    Ok(())
}

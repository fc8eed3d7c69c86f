//! # Report Commands
//!
//! Dashboard and restock plan over a date range of the sales ledger.

use tracing::debug;

use pantry_core::report::build_dashboard;
use pantry_core::restock::suggest_restock;

use crate::cli::ReportArgs;
use crate::error::CliResult;
use crate::render;
use crate::state::AppContext;

pub async fn dashboard(ctx: &AppContext, args: &ReportArgs) -> CliResult<String> {
    let (from, to) = args.range.resolve(ctx.today())?;
    let sales = ctx.store.sales().load_range(from, to).await?;
    debug!(%from, %to, lines = sales.len(), "Building dashboard");

    let dashboard = build_dashboard(&sales, from, to);
    if args.json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&dashboard)?));
    }
    Ok(render::dashboard(&dashboard, args.top))
}

pub async fn restock_plan(ctx: &AppContext, args: &ReportArgs) -> CliResult<String> {
    let (from, to) = args.range.resolve(ctx.today())?;
    let sales = ctx.store.sales().load_range(from, to).await?;
    let catalog = ctx.store.load_catalog().await?;
    debug!(%from, %to, lines = sales.len(), "Building restock plan");

    let plan = suggest_restock(&sales, &catalog)?;
    if args.json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&plan)?));
    }
    Ok(render::restock_plan(&plan, args.top))
}

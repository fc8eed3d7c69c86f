//! # Commands Module
//!
//! One handler per subcommand. Handlers load what they need from the store,
//! apply the change through `pantry-core`, write back the touched tables and
//! return the text to print.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (dispatch, roles, name lookup)
//! ├── ingredient.rs  ◄─── Base ingredients
//! ├── recipe.rs      ◄─── Recipes and cost breakdowns
//! ├── modifier.rs    ◄─── Sale extras
//! ├── price.rs       ◄─── Sale prices and margins
//! ├── inventory.rs   ◄─── Stock levels
//! ├── sale.rs        ◄─── sell, checkout, history
//! ├── report.rs      ◄─── dashboard, restock plan
//! └── shell.rs       ◄─── Interactive loop with a cart
//! ```
//!
//! ## Read-Modify-Write
//! ```text
//!   recipe add Cake Sugar 100
//!        │
//!        ├── GET Recetas, IngredientesBase, Modificadores ──► Catalog
//!        ├── catalog.set_recipe_component(...)  (cycle check)
//!        └── PUT Recetas (whole table)
//! ```

pub mod ingredient;
pub mod inventory;
pub mod modifier;
pub mod price;
pub mod recipe;
pub mod report;
pub mod sale;
pub mod shell;

use tracing::debug;

use pantry_core::Catalog;

use crate::cli::Command;
use crate::error::{CliError, CliResult, ErrorCode};
use crate::state::{Action, AppContext, Session};

/// What the session must be allowed to do before `command` runs.
pub fn required_action(command: &Command) -> Action {
    match command {
        Command::Ingredient(_)
        | Command::Recipe(_)
        | Command::Modifier(_)
        | Command::Price(_)
        | Command::Inventory(_) => Action::ManageCatalog,
        Command::Sell(_) | Command::Shell => Action::Sell,
        Command::History(_) => Action::ViewHistory,
        Command::Dashboard(_) | Command::RestockPlan(_) => Action::ViewReports,
    }
}

/// Runs one non-interactive command and returns its output.
pub async fn run(ctx: &AppContext, session: &Session, command: Command) -> CliResult<String> {
    session.authorize(required_action(&command))?;
    debug!(user = %session.user(), ?command, "Running command");

    match command {
        Command::Ingredient(cmd) => ingredient::run(ctx, cmd).await,
        Command::Recipe(cmd) => recipe::run(ctx, cmd).await,
        Command::Modifier(cmd) => modifier::run(ctx, cmd).await,
        Command::Price(cmd) => price::run(ctx, cmd).await,
        Command::Inventory(cmd) => inventory::run(ctx, cmd).await,
        Command::Sell(args) => sale::sell(ctx, args).await,
        Command::History(range) => sale::history(ctx, session, &range).await,
        Command::Dashboard(args) => report::dashboard(ctx, &args).await,
        Command::RestockPlan(args) => report::restock_plan(ctx, &args).await,
        Command::Shell => Err(CliError::validation("Already in the shell")),
    }
}

// =============================================================================
// Name lookup
// =============================================================================
//
// Operators may type names in any case or without accents. Stored names are
// what gets written back.

pub(crate) fn ingredient_name(catalog: &Catalog, query: &str) -> CliResult<String> {
    catalog
        .find_ingredient(query)
        .map(|i| i.name.clone())
        .ok_or_else(|| CliError::not_found("Ingredient", query.trim()))
}

pub(crate) fn recipe_name(catalog: &Catalog, query: &str) -> CliResult<String> {
    catalog
        .find_recipe(query)
        .map(|r| r.name.clone())
        .ok_or_else(|| CliError::not_found("Recipe", query.trim()))
}

pub(crate) fn modifier_name(catalog: &Catalog, query: &str) -> CliResult<String> {
    catalog
        .find_modifier(query)
        .map(|m| m.name.clone())
        .ok_or_else(|| CliError::not_found("Modifier", query.trim()))
}

/// An ingredient or recipe name; ingredients win.
pub(crate) fn component_name(catalog: &Catalog, query: &str) -> CliResult<String> {
    catalog
        .find_ingredient(query)
        .map(|i| i.name.clone())
        .or_else(|| catalog.find_recipe(query).map(|r| r.name.clone()))
        .ok_or_else(|| CliError::not_found("Ingredient or recipe", query.trim()))
}

/// Fails when recipes or modifiers still use `name`.
pub(crate) fn ensure_unused(catalog: &Catalog, name: &str) -> CliResult<()> {
    let users = catalog.dependents(name);
    if users.is_empty() {
        return Ok(());
    }
    Err(CliError::new(
        ErrorCode::BusinessLogic,
        format!("{name} is still used by: {}", users.join(", ")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{RangeArgs, ReportArgs};
    use pantry_core::{Ingredient, Modifier, Money, Recipe};
    use rust_decimal_macros::dec;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.upsert_ingredient(Ingredient::new("Azúcar", Money::from_cents(1000), dec!(1000), "kg", "g"));
        catalog
            .upsert_recipe(Recipe::new("Merengue").with_component("Azúcar", dec!(50)))
            .unwrap();
        catalog
            .upsert_modifier(Modifier::new("Extra Merengue", Money::from_cents(500)).with_component("Merengue", dec!(1)))
            .unwrap();
        catalog
    }

    #[test]
    fn test_name_lookup_is_lenient() {
        let catalog = catalog();
        assert_eq!(ingredient_name(&catalog, " azucar ").unwrap(), "Azúcar");
        assert_eq!(recipe_name(&catalog, "MERENGUE").unwrap(), "Merengue");
        assert_eq!(modifier_name(&catalog, "extra merengue").unwrap(), "Extra Merengue");
        assert_eq!(component_name(&catalog, "merengue").unwrap(), "Merengue");
        assert_eq!(
            recipe_name(&catalog, "Flan").unwrap_err().code,
            ErrorCode::NotFound
        );
    }

    #[test]
    fn test_ensure_unused() {
        let catalog = catalog();
        let err = ensure_unused(&catalog, "Merengue").unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert!(err.message.contains("Extra Merengue"));
        assert!(ensure_unused(&catalog, "Extra Merengue").is_ok());
    }

    #[test]
    fn test_required_actions() {
        let report = ReportArgs {
            range: RangeArgs::default(),
            json: false,
            top: 5,
        };
        assert_eq!(required_action(&Command::Dashboard(report)), Action::ViewReports);
        assert_eq!(required_action(&Command::History(RangeArgs::default())), Action::ViewHistory);
        assert_eq!(required_action(&Command::Shell), Action::Sell);
    }
}

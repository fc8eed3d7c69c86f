//! # Recipe Commands
//!
//! ```text
//!   recipe create Cake
//!   recipe add Cake Dough 1        ◄── cycle check before saving
//!   recipe add Cake Sugar 100
//!   recipe show Cake               ◄── per-component cost breakdown
//!   recipe delete Cake             ◄── refused while a recipe or modifier uses it
//! ```

use tracing::info;

use pantry_core::validation::validate_component_quantity;
use pantry_core::{Catalog, Money};
use rust_decimal::Decimal;

use super::{component_name, ensure_unused, recipe_name};
use crate::cli::RecipeCommand;
use crate::error::{CliError, CliResult, ErrorCode};
use crate::render::{self, qty, Table};
use crate::state::AppContext;

pub async fn run(ctx: &AppContext, cmd: RecipeCommand) -> CliResult<String> {
    match cmd {
        RecipeCommand::List => {
            let catalog = ctx.store.load_catalog().await?;
            list(&catalog)
        }
        RecipeCommand::Show { name } => {
            let catalog = ctx.store.load_catalog().await?;
            let name = recipe_name(&catalog, &name)?;
            Ok(render::cost_breakdown(&catalog.cost_breakdown(&name)?))
        }
        RecipeCommand::Create { name } => {
            let mut catalog = ctx.store.load_catalog().await?;
            let name = create(&mut catalog, &name)?;
            ctx.store.recipes().save(catalog.recipes()).await?;
            info!(recipe = %name, "Created recipe");
            Ok(format!("Created recipe {name}\n"))
        }
        RecipeCommand::Add {
            recipe,
            component,
            quantity,
        } => {
            let mut catalog = ctx.store.load_catalog().await?;
            let (recipe, component) = add_component(&mut catalog, &recipe, &component, quantity)?;
            ctx.store.recipes().save(catalog.recipes()).await?;
            let cost = Money::from_decimal(catalog.recipe_cost(&recipe)?);
            info!(%recipe, %component, %quantity, "Set recipe component");
            Ok(format!(
                "{recipe} uses {} of {component}; cost is now {cost}\n",
                qty(quantity)
            ))
        }
        RecipeCommand::RemoveComponent { recipe, component } => {
            let mut catalog = ctx.store.load_catalog().await?;
            let recipe = recipe_name(&catalog, &recipe)?;
            let component = component_name(&catalog, &component).unwrap_or_else(|_| component.trim().to_string());
            let removed = catalog.remove_recipe_component(&recipe, &component)?;
            ctx.store.recipes().save(catalog.recipes()).await?;
            info!(%recipe, %component, "Removed recipe component");
            Ok(format!("Removed {} {component} from {recipe}\n", qty(removed)))
        }
        RecipeCommand::Delete { name } => {
            let mut catalog = ctx.store.load_catalog().await?;
            let name = recipe_name(&catalog, &name)?;
            ensure_unused(&catalog, &name)?;
            catalog.remove_recipe(&name)?;
            ctx.store.recipes().save(catalog.recipes()).await?;

            let mut prices = ctx.store.prices().load().await?;
            if prices.remove(&name).is_some() {
                ctx.store.prices().save(&prices).await?;
            }
            info!(recipe = %name, "Deleted recipe");
            Ok(format!("Deleted recipe {name}\n"))
        }
    }
}

fn list(catalog: &Catalog) -> CliResult<String> {
    let mut table = Table::new(["Recipe", "Components", "Cost"]).right(&[1, 2]);
    for recipe in catalog.recipes() {
        table.row([
            recipe.name.clone(),
            recipe.components.len().to_string(),
            Money::from_decimal(catalog.recipe_cost(&recipe.name)?).to_string(),
        ]);
    }
    if table.is_empty() {
        return Ok("No recipes yet.\n".to_string());
    }
    Ok(table.render())
}

/// Creates an empty recipe. A name already taken by an ingredient is refused
/// since ingredient names win on lookup.
pub(crate) fn create(catalog: &mut Catalog, name: &str) -> CliResult<String> {
    let name = name.trim();
    if catalog.find_ingredient(name).is_some() {
        return Err(CliError::new(
            ErrorCode::Duplicate,
            format!("{name} is already an ingredient"),
        ));
    }
    catalog.create_recipe(name)?;
    Ok(name.to_string())
}

/// Sets a component quantity, returning the stored recipe and component names.
pub(crate) fn add_component(
    catalog: &mut Catalog,
    recipe: &str,
    component: &str,
    quantity: Decimal,
) -> CliResult<(String, String)> {
    validate_component_quantity(quantity)?;
    let recipe = recipe_name(catalog, recipe)?;
    let component = component_name(catalog, component)?;
    catalog.set_recipe_component(&recipe, &component, quantity)?;
    Ok((recipe, component))
}

//! # Ingredient Commands

use std::fmt::Write as _;

use tracing::info;

use pantry_core::validation::{validate_name, validate_purchase, validate_stock_quantity};
use pantry_core::{Catalog, Ingredient};

use super::{ensure_unused, ingredient_name};
use crate::cli::{IngredientCommand, IngredientSetArgs};
use crate::error::{CliError, CliResult};
use crate::render::{qty, Table};
use crate::state::AppContext;

pub async fn run(ctx: &AppContext, cmd: IngredientCommand) -> CliResult<String> {
    match cmd {
        IngredientCommand::List => list(ctx).await,
        IngredientCommand::Set(args) => set(ctx, args).await,
        IngredientCommand::Remove { name } => remove(ctx, &name).await,
    }
}

async fn list(ctx: &AppContext) -> CliResult<String> {
    let ingredients = ctx.store.ingredients().load().await?;
    if ingredients.is_empty() {
        return Ok("No ingredients yet.\n".to_string());
    }

    let mut table = Table::new(["Ingredient", "Supplier", "Purchase", "Unit cost"]).right(&[3]);
    for i in &ingredients {
        table.row([
            i.name.clone(),
            i.supplier.clone(),
            format!("{} per {} {}", i.purchase_cost, qty(i.purchase_quantity), i.purchase_unit),
            format!("${} / {}", qty(i.recipe_unit_cost.round_dp(4)), i.recipe_unit),
        ]);
    }
    Ok(table.render())
}

/// Merges the arguments over the existing ingredient, if any.
pub(crate) fn build(existing: Option<&Ingredient>, args: IngredientSetArgs) -> CliResult<Ingredient> {
    let name = existing.map(|e| e.name.clone()).unwrap_or_else(|| args.name.trim().to_string());
    validate_name("ingredient", &name)?;

    let missing = |field: &str| CliError::validation(format!("New ingredient {name} needs --{field}"));
    let cost = match (args.cost, existing) {
        (Some(c), _) => c,
        (None, Some(e)) => e.purchase_cost,
        (None, None) => return Err(missing("cost")),
    };
    let quantity = match (args.quantity, existing) {
        (Some(q), _) => q,
        (None, Some(e)) => e.purchase_quantity,
        (None, None) => return Err(missing("quantity")),
    };
    let purchase_unit = match (args.purchase_unit, existing) {
        (Some(u), _) => u,
        (None, Some(e)) => e.purchase_unit.clone(),
        (None, None) => return Err(missing("purchase-unit")),
    };
    let recipe_unit = match (args.recipe_unit, existing) {
        (Some(u), _) => u,
        (None, Some(e)) => e.recipe_unit.clone(),
        (None, None) => return Err(missing("recipe-unit")),
    };
    validate_purchase(cost, quantity, purchase_unit.trim(), recipe_unit.trim())?;

    let supplier = args
        .supplier
        .or_else(|| existing.map(|e| e.supplier.clone()))
        .unwrap_or_default();

    let mut ingredient = Ingredient::new(name, cost, quantity, purchase_unit, recipe_unit).with_supplier(supplier);
    if let Some(unit_cost) = args.unit_cost {
        validate_stock_quantity("unit cost", unit_cost)?;
        ingredient = ingredient.with_recipe_unit_cost(unit_cost);
    }
    Ok(ingredient)
}

async fn set(ctx: &AppContext, args: IngredientSetArgs) -> CliResult<String> {
    let ingredients = ctx.store.ingredients().load().await?;
    let mut catalog = Catalog::from_parts(ingredients, Vec::new(), Vec::new());

    let existing = catalog.find_ingredient(&args.name).cloned();
    let ingredient = build(existing.as_ref(), args)?;
    let name = ingredient.name.clone();
    let summary = format!(
        "{}: ${} per {}",
        name,
        qty(ingredient.recipe_unit_cost.round_dp(4)),
        ingredient.recipe_unit
    );

    catalog.upsert_ingredient(ingredient);
    ctx.store.ingredients().save(catalog.ingredients()).await?;

    let mut inventory = ctx.store.inventory().load().await?;
    if inventory.ensure_entries([name.as_str()]) > 0 {
        ctx.store.inventory().save(&inventory).await?;
    }

    let verb = if existing.is_some() { "Updated" } else { "Added" };
    info!(ingredient = %name, "{verb} ingredient");
    Ok(format!("{verb} {summary}\n"))
}

async fn remove(ctx: &AppContext, query: &str) -> CliResult<String> {
    let mut catalog = ctx.store.load_catalog().await?;
    let name = ingredient_name(&catalog, query)?;
    ensure_unused(&catalog, &name)?;

    catalog.remove_ingredient(&name)?;
    ctx.store.ingredients().save(catalog.ingredients()).await?;

    let mut out = format!("Removed ingredient {name}\n");
    let mut inventory = ctx.store.inventory().load().await?;
    if let Ok(entry) = inventory.remove(&name) {
        ctx.store.inventory().save(&inventory).await?;
        let _ = writeln!(out, "Dropped its stock record ({} left)", qty(entry.stock));
    }

    info!(ingredient = %name, "Removed ingredient");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pantry_core::Money;
    use rust_decimal_macros::dec;

    fn args(name: &str) -> IngredientSetArgs {
        IngredientSetArgs {
            name: name.to_string(),
            cost: None,
            quantity: None,
            purchase_unit: None,
            recipe_unit: None,
            supplier: None,
            unit_cost: None,
        }
    }

    #[test]
    fn test_new_ingredient_needs_purchase_data() {
        let err = build(None, args("Flour")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("--cost"));

        let full = IngredientSetArgs {
            cost: Some(Money::from_cents(2000)),
            quantity: Some(dec!(1000)),
            purchase_unit: Some("bag".into()),
            recipe_unit: Some("g".into()),
            supplier: Some("Mill Co".into()),
            ..args(" Flour ")
        };
        let flour = build(None, full).unwrap();
        assert_eq!(flour.name, "Flour");
        assert_eq!(flour.recipe_unit_cost, dec!(0.02));
        assert_eq!(flour.supplier, "Mill Co");
    }

    #[test]
    fn test_update_keeps_omitted_fields() {
        let old = Ingredient::new("Flour", Money::from_cents(2000), dec!(1000), "bag", "g").with_supplier("Mill Co");
        let update = IngredientSetArgs {
            cost: Some(Money::from_cents(3000)),
            ..args("flour")
        };

        let flour = build(Some(&old), update).unwrap();
        assert_eq!(flour.name, "Flour");
        assert_eq!(flour.purchase_quantity, dec!(1000));
        assert_eq!(flour.recipe_unit_cost, dec!(0.03));
        assert_eq!(flour.supplier, "Mill Co");
    }

    #[test]
    fn test_rejects_bad_purchase_data() {
        let zero = IngredientSetArgs {
            cost: Some(Money::zero()),
            quantity: Some(dec!(1)),
            purchase_unit: Some("kg".into()),
            recipe_unit: Some("g".into()),
            ..args("Salt")
        };
        assert!(build(None, zero).is_err());

        let old = Ingredient::new("Salt", Money::from_cents(100), dec!(1000), "kg", "g");
        let negative = IngredientSetArgs {
            unit_cost: Some(dec!(-1)),
            ..args("Salt")
        };
        assert!(build(Some(&old), negative).is_err());
    }
}

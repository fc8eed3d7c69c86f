//! # Inventory Commands
//!
//! Stock is tracked per base ingredient, in recipe units.

use tracing::info;

use pantry_core::{Catalog, Inventory, InventoryEntry};
use rust_decimal::Decimal;

use super::ingredient_name;
use crate::cli::InventoryCommand;
use crate::error::CliResult;
use crate::render::{self, qty};
use crate::state::AppContext;

pub async fn run(ctx: &AppContext, cmd: InventoryCommand) -> CliResult<String> {
    let (ingredient, edit) = match cmd {
        InventoryCommand::List { alerts } => {
            let inventory = ctx.store.inventory().load().await?;
            return Ok(render::inventory(&inventory, alerts));
        }
        InventoryCommand::Restock { ingredient, quantity } => (ingredient, StockEdit::Restock(quantity)),
        InventoryCommand::Thresholds { ingredient, min, max } => (ingredient, StockEdit::Thresholds { min, max }),
        InventoryCommand::Count { ingredient, quantity } => (ingredient, StockEdit::Count(quantity)),
    };

    let ingredients = ctx.store.ingredients().load().await?;
    let catalog = Catalog::from_parts(ingredients, Vec::new(), Vec::new());
    let mut inventory = ctx.store.inventory().load().await?;

    let entry = apply(&catalog, &mut inventory, &ingredient, edit)?;
    ctx.store.inventory().save(&inventory).await?;

    info!(ingredient = %entry.ingredient, stock = %entry.stock, "Inventory updated");
    Ok(format!(
        "{}: stock {} (min {}, max {}) {}\n",
        entry.ingredient,
        qty(entry.stock),
        qty(entry.min),
        qty(entry.max),
        entry.status()
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StockEdit {
    Restock(Decimal),
    Thresholds { min: Decimal, max: Decimal },
    Count(Decimal),
}

/// Applies one stock edit to a known ingredient and returns its entry.
pub(crate) fn apply(
    catalog: &Catalog,
    inventory: &mut Inventory,
    query: &str,
    edit: StockEdit,
) -> CliResult<InventoryEntry> {
    let name = ingredient_name(catalog, query)?;
    match edit {
        StockEdit::Restock(quantity) => {
            inventory.restock(&name, quantity)?;
        }
        StockEdit::Thresholds { min, max } => inventory.set_thresholds(&name, min, max)?,
        StockEdit::Count(quantity) => inventory.set_stock(&name, quantity)?,
    }

    Ok(inventory
        .get(&name)
        .cloned()
        .unwrap_or_else(|| InventoryEntry::new(name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pantry_core::{Ingredient, Money, StockStatus};
    use rust_decimal_macros::dec;

    fn catalog() -> Catalog {
        Catalog::from_parts(
            [Ingredient::new("Flour", Money::from_cents(2000), dec!(1000), "bag", "g")],
            Vec::new(),
            Vec::new(),
        )
    }

    #[test]
    fn test_restock_count_and_thresholds() {
        let catalog = catalog();
        let mut inventory = Inventory::new();

        let entry = apply(
            &catalog,
            &mut inventory,
            "flour",
            StockEdit::Restock(dec!(500)),
        )
        .unwrap();
        assert_eq!(entry.ingredient, "Flour");
        assert_eq!(entry.stock, dec!(500));

        apply(
            &catalog,
            &mut inventory,
            "Flour",
            StockEdit::Restock(dec!(250)),
        )
        .unwrap();
        let entry = apply(
            &catalog,
            &mut inventory,
            "Flour",
            StockEdit::Thresholds {
                min: dec!(1000),
                max: dec!(5000),
            },
        )
        .unwrap();
        assert_eq!(entry.stock, dec!(750));
        assert_eq!(entry.status(), StockStatus::Urgent);

        let entry = apply(
            &catalog,
            &mut inventory,
            "Flour",
            StockEdit::Count(dec!(4000)),
        )
        .unwrap();
        assert_eq!(entry.status(), StockStatus::Ok);
    }

    #[test]
    fn test_rejects_unknown_and_negative() {
        let catalog = catalog();
        let mut inventory = Inventory::new();

        let err = apply(
            &catalog,
            &mut inventory,
            "Butter",
            StockEdit::Restock(dec!(1)),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = apply(
            &catalog,
            &mut inventory,
            "Flour",
            StockEdit::Thresholds {
                min: dec!(10),
                max: dec!(5),
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(inventory.is_empty());
    }
}

//! # Price Commands

use tracing::info;

use pantry_core::pricing::{margin_table, reprice, top_by_margin_percent};
use pantry_core::{Catalog, Money, PriceEntry};

use crate::cli::PriceCommand;
use crate::error::{CliError, CliResult};
use crate::render::{self, pct};
use crate::state::AppContext;

pub async fn run(ctx: &AppContext, cmd: PriceCommand) -> CliResult<String> {
    let catalog = ctx.store.load_catalog().await?;
    let mut prices = ctx.store.prices().load().await?;

    match cmd {
        PriceCommand::List { top } => {
            let rows = margin_table(&catalog, &prices)?;
            if rows.is_empty() {
                return Ok("No recipes to price yet.\n".to_string());
            }
            let shown = match top {
                Some(n) => top_by_margin_percent(&rows, n),
                None => rows.iter().collect(),
            };
            Ok(render::margins(&shown))
        }
        PriceCommand::Set { product, price } => {
            let entry = price_entry(&catalog, &product, price)?;
            let out = format!(
                "{} sells at {}; margin {} ({})\n",
                entry.product,
                entry.sale_price,
                entry.gross_margin,
                pct(entry.gross_margin_pct)
            );
            info!(product = %entry.product, price = %entry.sale_price, "Set sale price");
            prices.insert(entry.product.clone(), entry);
            ctx.store.prices().save(&prices).await?;
            Ok(out)
        }
    }
}

/// Prices a sellable product against its current production cost.
pub(crate) fn price_entry(catalog: &Catalog, query: &str, price: Money) -> CliResult<PriceEntry> {
    let product = catalog
        .find_recipe(query)
        .map(|r| r.name.clone())
        .or_else(|| catalog.find_ingredient(query).map(|i| i.name.clone()))
        .ok_or_else(|| CliError::not_found("Product", query.trim()))?;
    let cost = catalog.product_cost(&product)?;
    Ok(reprice(&product, price, cost)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pantry_core::{Ingredient, Recipe};
    use rust_decimal_macros::dec;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.upsert_ingredient(Ingredient::new("Flour", Money::from_cents(2000), dec!(1000), "bag", "g"));
        catalog
            .upsert_recipe(Recipe::new("Bread").with_component("Flour", dec!(500)))
            .unwrap();
        catalog
    }

    #[test]
    fn test_price_entry_margin() {
        let entry = price_entry(&catalog(), "bread", Money::from_cents(4000)).unwrap();
        assert_eq!(entry.product, "Bread");
        assert_eq!(entry.gross_margin, Money::from_cents(3000));
        assert_eq!(entry.gross_margin_pct, dec!(75));
    }

    #[test]
    fn test_price_entry_errors() {
        let catalog = catalog();
        assert_eq!(
            price_entry(&catalog, "Cake", Money::from_cents(100)).unwrap_err().code,
            ErrorCode::NotFound
        );
        assert_eq!(
            price_entry(&catalog, "Bread", Money::from_cents(-100)).unwrap_err().code,
            ErrorCode::ValidationError
        );
    }
}

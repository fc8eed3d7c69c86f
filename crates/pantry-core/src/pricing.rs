//! # Pricing Analysis
//!
//! Production cost against sale price for every recipe.
//!
//! ```text
//! Product   Cost     Price    Margin   Margin %
//! Cake      $11.00   $45.00   $34.00   75.56
//! Dough     $10.00   $0.00    -$10.00  0.00
//! ```

use rust_decimal::Decimal;
use serde::Serialize;

use crate::costing::Catalog;
use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{PriceEntry, PriceList};
use crate::validation::validate_price;

/// One row of the margin table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginRow {
    pub product: String,
    pub cost: Money,
    pub price: Money,
    pub margin: Money,
    pub margin_pct: Decimal,
}

/// Cost, price and margin of every recipe, in name order.
///
/// Recipes without a price entry show a $0 price.
pub fn margin_table(catalog: &Catalog, prices: &PriceList) -> CoreResult<Vec<MarginRow>> {
    catalog
        .recipes()
        .map(|recipe| {
            let cost = Money::from_decimal(catalog.recipe_cost(&recipe.name)?);
            let price = prices
                .get(&recipe.name)
                .map(|p| p.sale_price)
                .unwrap_or_default();
            let margin = price - cost;
            Ok(MarginRow {
                product: recipe.name.clone(),
                cost,
                price,
                margin,
                margin_pct: margin.percent_of(price),
            })
        })
        .collect()
}

/// Builds the price entry for a new sale price, recomputing the margin
/// against the current production cost.
pub fn reprice(product: &str, new_price: Money, cost: Decimal) -> CoreResult<PriceEntry> {
    validate_price("sale price", new_price)?;
    let margin = new_price - Money::from_decimal(cost);
    Ok(PriceEntry {
        product: product.trim().to_string(),
        sale_price: new_price,
        gross_margin: margin,
        gross_margin_pct: margin.percent_of(new_price),
    })
}

/// The `n` rows with the highest margin percentage. Ties keep table order.
pub fn top_by_margin_percent(rows: &[MarginRow], n: usize) -> Vec<&MarginRow> {
    let mut sorted: Vec<&MarginRow> = rows.iter().collect();
    sorted.sort_by(|a, b| b.margin_pct.cmp(&a.margin_pct));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Ingredient, Recipe};
    use rust_decimal_macros::dec;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.upsert_ingredient(Ingredient::new("Flour", Money::from_cents(2000), dec!(1000), "bag", "g"));
        catalog.upsert_ingredient(Ingredient::new("Sugar", Money::from_cents(1000), dec!(1000), "bag", "g"));
        catalog
            .upsert_recipe(Recipe::new("Dough").with_component("Flour", dec!(500)))
            .unwrap();
        catalog
            .upsert_recipe(Recipe::new("Cake").with_component("Dough", dec!(1)).with_component("Sugar", dec!(100)))
            .unwrap();
        catalog
            .upsert_recipe(Recipe::new("Cookie").with_component("Flour", dec!(50)))
            .unwrap();
        catalog
    }

    fn prices() -> PriceList {
        let mut prices = PriceList::new();
        for (name, cents) in [("Cake", 4500), ("Cookie", 400)] {
            prices.insert(
                name.to_string(),
                reprice(name, Money::from_cents(cents), Decimal::ZERO).unwrap(),
            );
        }
        prices
    }

    #[test]
    fn test_margin_table() {
        let rows = margin_table(&catalog(), &prices()).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(names, vec!["Cake", "Cookie", "Dough"]);

        let cake = &rows[0];
        assert_eq!(cake.cost.cents(), 1100);
        assert_eq!(cake.margin.cents(), 3400);
        assert_eq!(cake.margin_pct, dec!(75.56));

        let dough = &rows[2];
        assert_eq!(dough.price, Money::zero());
        assert_eq!(dough.margin.cents(), -1000);
        assert_eq!(dough.margin_pct, Decimal::ZERO);
    }

    #[test]
    fn test_reprice() {
        let entry = reprice("Cake", Money::from_cents(5000), dec!(11)).unwrap();
        assert_eq!(entry.gross_margin.cents(), 3900);
        assert_eq!(entry.gross_margin_pct, dec!(78));

        let free = reprice("Cake", Money::zero(), dec!(11)).unwrap();
        assert_eq!(free.gross_margin_pct, Decimal::ZERO);

        assert!(reprice("Cake", Money::from_cents(-1), dec!(11)).is_err());
    }

    #[test]
    fn test_top_by_margin_percent() {
        let rows = margin_table(&catalog(), &prices()).unwrap();
        let top = top_by_margin_percent(&rows, 2);
        // Cookie: $4.00 - $1.00 = 75.00%, Cake 75.56%
        assert_eq!(top[0].product, "Cake");
        assert_eq!(top[1].product, "Cookie");
    }
}

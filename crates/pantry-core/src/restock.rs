//! # Restock Suggestions
//!
//! What to buy to replace what was sold in a period.
//!
//! ```text
//! Cake × 2                ──►  Flour 1000 g, Sugar 200 g
//! Cake × 1 + Extra Sugar  ──►  Flour  500 g, Sugar 150 g
//!                                   │
//!                                   ▼
//!                         Flour 1500 g  $30.00  150% of a bag
//!                         Sugar  350 g   $3.50   35% of a bag
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::costing::{Catalog, Expansion};
use crate::error::CoreResult;
use crate::money::Money;
use crate::types::SaleLine;

/// One ingredient to buy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestockRow {
    pub ingredient: String,
    /// Recipe units consumed in the period.
    pub needed: Decimal,
    pub unit: String,
    /// Price of one purchase unit.
    pub purchase_cost: Money,
    pub supplier: String,
    /// `needed` as a percentage of one purchase unit (0 when unknown).
    pub purchase_unit_pct: Decimal,
    /// `needed × recipe_unit_cost`.
    pub restock_cost: Money,
}

/// The full suggestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RestockPlan {
    pub rows: Vec<RestockRow>,
    /// Products or components in the ledger the catalog no longer knows.
    pub unresolved: Vec<String>,
}

impl RestockPlan {
    /// Estimated total spend.
    pub fn total_cost(&self) -> Money {
        self.rows.iter().map(|r| r.restock_cost).sum()
    }

    /// The `n` most expensive rows.
    pub fn top_by_cost(&self, n: usize) -> Vec<&RestockRow> {
        let mut rows: Vec<&RestockRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| b.restock_cost.cmp(&a.restock_cost));
        rows.truncate(n);
        rows
    }
}

/// Sums base-ingredient consumption over `sales` and prices the refill.
///
/// Consumption follows sub-recipes and the modifiers recorded on each line.
/// Modifiers that no longer exist are ignored; products and components that
/// resolve to nothing are listed as unresolved. Rows come sorted by
/// ingredient name and skip non-positive needs.
pub fn suggest_restock(sales: &[SaleLine], catalog: &Catalog) -> CoreResult<RestockPlan> {
    let mut consumed = Expansion::default();

    for line in sales {
        consumed.merge(catalog.expand_to_ingredients(&line.product, line.quantity)?);
        for modifier in &line.modifiers {
            if catalog.modifier(modifier).is_some() {
                consumed.merge(catalog.expand_modifier(modifier, line.quantity)?);
            }
        }
    }

    let rows = consumed
        .ingredients
        .iter()
        .filter(|(_, needed)| **needed > Decimal::ZERO)
        .filter_map(|(name, &needed)| {
            let ingredient = catalog.ingredient(name)?;
            let purchase_unit_pct = if ingredient.purchase_quantity > Decimal::ZERO {
                needed
                    .checked_div(ingredient.purchase_quantity)
                    .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
                    .unwrap_or(Decimal::MAX)
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            } else {
                Decimal::ZERO
            };
            Some(RestockRow {
                ingredient: name.clone(),
                needed,
                unit: ingredient.recipe_unit.clone(),
                purchase_cost: ingredient.purchase_cost,
                supplier: ingredient.supplier.clone(),
                purchase_unit_pct,
                restock_cost: Money::from_decimal(ingredient.cost_of(needed)),
            })
        })
        .collect();

    Ok(RestockPlan {
        rows,
        unresolved: consumed.unresolved.into_iter().collect(),
    })
}

//! # Ingredient Repository
//!
//! The ingredient master table.
//!
//! ```text
//! ┌────────────┬───────────┬─────────────────┬───────────────────────────────┐
//! │ Ingrediente│ Proveedor │ Costo de Compra │ Cantidad por Unidad de Compra │ ...
//! ├────────────┼───────────┼─────────────────┼───────────────────────────────┤
//! │ Flour      │ Mill Co   │ 20.00           │ 1000.0000                     │
//! └────────────┴───────────┴─────────────────┴───────────────────────────────┘
//!   ... │ Unidad de Compra │ Unidad Receta │ Costo por Unidad Receta │
//!       │ bag              │ g             │ 0.020000                │
//! ```

use serde_json::Value;
use tracing::debug;

use pantry_core::Ingredient;

use crate::client::StoreClient;
use crate::error::StoreResult;
use crate::row::{self, fmt_decimal, fmt_money, fmt_quantity, row_of, Row};

pub const COL_NAME: &str = "Ingrediente";
pub const COL_SUPPLIER: &str = "Proveedor";
pub const COL_PURCHASE_COST: &str = "Costo de Compra";
pub const COL_PURCHASE_QTY: &str = "Cantidad por Unidad de Compra";
pub const COL_PURCHASE_UNIT: &str = "Unidad de Compra";
pub const COL_RECIPE_UNIT: &str = "Unidad Receta";
pub const COL_UNIT_COST: &str = "Costo por Unidad Receta";

/// Decimal places kept for the recipe-unit cost.
pub const UNIT_COST_DP: u32 = 6;

/// Repository for the ingredient master.
#[derive(Debug, Clone)]
pub struct IngredientRepository {
    client: StoreClient,
    resource: String,
}

impl IngredientRepository {
    pub fn new(client: StoreClient, resource: impl Into<String>) -> Self {
        IngredientRepository {
            client,
            resource: resource.into(),
        }
    }

    /// Loads every ingredient. Rows without a name are skipped.
    pub async fn load(&self) -> StoreResult<Vec<Ingredient>> {
        let rows = self.client.read_table(&self.resource).await?;
        let ingredients = decode(&rows);
        debug!(count = ingredients.len(), "Loaded ingredients");
        Ok(ingredients)
    }

    /// Replaces the table.
    pub async fn save<'a>(&self, ingredients: impl IntoIterator<Item = &'a Ingredient>) -> StoreResult<()> {
        let rows = encode(ingredients);
        debug!(count = rows.len(), "Saving ingredients");
        self.client.write_table(&self.resource, &rows).await
    }
}

/// Rows → ingredients.
///
/// A stored non-zero `Costo por Unidad Receta` overrides the cost derived
/// from the purchase data.
pub fn decode(rows: &[Row]) -> Vec<Ingredient> {
    rows.iter()
        .filter_map(|r| {
            let name = row::text(r, COL_NAME);
            if name.is_empty() {
                return None;
            }
            Some(
                Ingredient::new(
                    name,
                    row::money(r, COL_PURCHASE_COST),
                    row::decimal(r, COL_PURCHASE_QTY),
                    row::text(r, COL_PURCHASE_UNIT),
                    row::text(r, COL_RECIPE_UNIT),
                )
                .with_supplier(row::text(r, COL_SUPPLIER))
                .with_recipe_unit_cost(row::decimal(r, COL_UNIT_COST)),
            )
        })
        .collect()
}

/// Ingredients → rows.
pub fn encode<'a>(ingredients: impl IntoIterator<Item = &'a Ingredient>) -> Vec<Row> {
    ingredients
        .into_iter()
        .map(|i| {
            row_of([
                (COL_NAME, Value::String(i.name.clone())),
                (COL_SUPPLIER, Value::String(i.supplier.clone())),
                (COL_PURCHASE_COST, fmt_money(i.purchase_cost)),
                (COL_PURCHASE_QTY, fmt_quantity(i.purchase_quantity)),
                (COL_PURCHASE_UNIT, Value::String(i.purchase_unit.clone())),
                (COL_RECIPE_UNIT, Value::String(i.recipe_unit.clone())),
                (COL_UNIT_COST, fmt_decimal(i.recipe_unit_cost, UNIT_COST_DP)),
            ])
        })
        .collect()
}

//! # Inventory Repository
//!
//! Stock levels and thresholds per ingredient (`Inventario`). Levels are
//! written with four decimals.

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, warn};

use pantry_core::{Inventory, InventoryEntry};

use crate::client::StoreClient;
use crate::error::StoreResult;
use crate::row::{self, fmt_quantity, row_of, Row};

pub const COL_INGREDIENT: &str = "Ingrediente";
pub const COL_STOCK: &str = "Stock Actual";
pub const COL_MIN: &str = "Stock Mínimo";
pub const COL_MAX: &str = "Stock Máximo";

#[derive(Debug, Clone)]
pub struct InventoryRepository {
    client: StoreClient,
    resource: String,
}

impl InventoryRepository {
    pub fn new(client: StoreClient, resource: impl Into<String>) -> Self {
        InventoryRepository {
            client,
            resource: resource.into(),
        }
    }

    pub async fn load(&self) -> StoreResult<Inventory> {
        let rows = self.client.read_table(&self.resource).await?;
        let inventory = decode(&rows);
        debug!(count = inventory.len(), "Loaded inventory");
        Ok(inventory)
    }

    pub async fn save(&self, inventory: &Inventory) -> StoreResult<()> {
        let rows = encode(inventory);
        debug!(count = rows.len(), "Saving inventory");
        self.client.write_table(&self.resource, &rows).await
    }
}

/// Rows → inventory. Negative stock read from the table is floored at zero.
pub fn decode(rows: &[Row]) -> Inventory {
    Inventory::from_entries(rows.iter().filter_map(|r| {
        let ingredient = row::text(r, COL_INGREDIENT);
        if ingredient.is_empty() {
            return None;
        }

        let mut stock = row::decimal(r, COL_STOCK);
        if stock < Decimal::ZERO {
            warn!(%ingredient, %stock, "Negative stock in table, reading as zero");
            stock = Decimal::ZERO;
        }

        Some(InventoryEntry {
            ingredient,
            stock,
            min: row::decimal(r, COL_MIN),
            max: row::decimal(r, COL_MAX),
        })
    }))
}

pub fn encode(inventory: &Inventory) -> Vec<Row> {
    inventory
        .entries()
        .map(|e| {
            row_of([
                (COL_INGREDIENT, Value::String(e.ingredient.clone())),
                (COL_STOCK, fmt_quantity(e.stock)),
                (COL_MIN, fmt_quantity(e.min)),
                (COL_MAX, fmt_quantity(e.max)),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_core::StockStatus;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_decode_inventory() {
        let rows: Vec<Row> = serde_json::from_value(json!([
            {"Ingrediente": "Flour", "Stock Actual": "1500.0000", "Stock Mínimo": 500, "Stock Máximo": "3000"},
            {"Ingrediente": "Sugar", "Stock Actual": "-20"},
            {"Ingrediente": "", "Stock Actual": "9"}
        ]))
        .unwrap();

        let inventory = decode(&rows);

        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.stock("Flour"), dec!(1500));
        assert_eq!(inventory.stock("Sugar"), Decimal::ZERO);
        let flour = inventory.get("Flour").unwrap();
        assert_eq!(flour.status(), StockStatus::Low);
    }

    #[test]
    fn test_encode_uses_four_decimals() {
        let mut inventory = Inventory::new();
        inventory.ensure_entries(["Flour"]);
        inventory.restock("Flour", dec!(12.5)).unwrap();

        let encoded = encode(&inventory);

        assert_eq!(encoded[0]["Stock Actual"], json!("12.5000"));
        assert_eq!(encoded[0]["Stock Máximo"], json!("0.0000"));
        assert_eq!(decode(&encoded), inventory);
    }
}

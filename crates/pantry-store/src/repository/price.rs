//! # Price Repository
//!
//! Sale price and recorded margin per product (`CostoPorProducto`).

use serde_json::Value;
use tracing::debug;

use pantry_core::{PriceEntry, PriceList};

use crate::client::StoreClient;
use crate::error::StoreResult;
use crate::row::{self, fmt_decimal, fmt_money, row_of, Row};

pub const COL_PRODUCT: &str = "Producto";
pub const COL_SALE_PRICE: &str = "Precio Venta";
pub const COL_MARGIN: &str = "Margen Bruto";
pub const COL_MARGIN_PCT: &str = "Margen Bruto (%)";

#[derive(Debug, Clone)]
pub struct PriceRepository {
    client: StoreClient,
    resource: String,
}

impl PriceRepository {
    pub fn new(client: StoreClient, resource: impl Into<String>) -> Self {
        PriceRepository {
            client,
            resource: resource.into(),
        }
    }

    pub async fn load(&self) -> StoreResult<PriceList> {
        let rows = self.client.read_table(&self.resource).await?;
        let prices = decode(&rows);
        debug!(count = prices.len(), "Loaded prices");
        Ok(prices)
    }

    pub async fn save(&self, prices: &PriceList) -> StoreResult<()> {
        let rows = encode(prices);
        debug!(count = rows.len(), "Saving prices");
        self.client.write_table(&self.resource, &rows).await
    }
}

/// Rows → price list. Later rows for the same product win.
pub fn decode(rows: &[Row]) -> PriceList {
    rows.iter()
        .filter_map(|r| {
            let product = row::text(r, COL_PRODUCT);
            if product.is_empty() {
                return None;
            }
            let entry = PriceEntry {
                product: product.clone(),
                sale_price: row::money(r, COL_SALE_PRICE),
                gross_margin: row::money(r, COL_MARGIN),
                gross_margin_pct: row::decimal(r, COL_MARGIN_PCT),
            };
            Some((product, entry))
        })
        .collect()
}

pub fn encode(prices: &PriceList) -> Vec<Row> {
    prices
        .values()
        .map(|p| {
            row_of([
                (COL_PRODUCT, Value::String(p.product.clone())),
                (COL_SALE_PRICE, fmt_money(p.sale_price)),
                (COL_MARGIN, fmt_money(p.gross_margin)),
                (COL_MARGIN_PCT, fmt_decimal(p.gross_margin_pct, 2)),
            ])
        })
        .collect()
}

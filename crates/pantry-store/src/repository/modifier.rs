//! # Modifier Repository
//!
//! Modifiers are stored as a long table, one row per consumed component.
//!
//! ```text
//! ┌───────────────┬──────────────┬─────────────┬──────────┐
//! │ Modificador   │ Precio Extra │ Ingrediente │ Cantidad │
//! ├───────────────┼──────────────┼─────────────┼──────────┤
//! │ Extra Sugar   │ 5.00         │ Sugar       │ 50       │
//! │ Extra Sugar   │ 5.00         │ Glaze       │ 1        │
//! │ Gift Wrap     │ 2.50         │             │          │  no consumption
//! └───────────────┴──────────────┴─────────────┴──────────┘
//! ```

use serde_json::Value;
use tracing::debug;

use pantry_core::{Modifier, Money};
use rust_decimal::Decimal;

use crate::client::StoreClient;
use crate::error::StoreResult;
use crate::row::{self, fmt_money, fmt_plain, row_of, Row};

pub const COL_NAME: &str = "Modificador";
pub const COL_EXTRA_CHARGE: &str = "Precio Extra";
pub const COL_COMPONENT: &str = "Ingrediente";
pub const COL_QUANTITY: &str = "Cantidad";

/// Repository for modifiers.
#[derive(Debug, Clone)]
pub struct ModifierRepository {
    client: StoreClient,
    resource: String,
}

impl ModifierRepository {
    pub fn new(client: StoreClient, resource: impl Into<String>) -> Self {
        ModifierRepository {
            client,
            resource: resource.into(),
        }
    }

    pub async fn load(&self) -> StoreResult<Vec<Modifier>> {
        let rows = self.client.read_table(&self.resource).await?;
        let modifiers = decode(&rows);
        debug!(count = modifiers.len(), "Loaded modifiers");
        Ok(modifiers)
    }

    pub async fn save<'a>(&self, modifiers: impl IntoIterator<Item = &'a Modifier>) -> StoreResult<()> {
        let rows = encode(modifiers);
        debug!(rows = rows.len(), "Saving modifiers");
        self.client.write_table(&self.resource, &rows).await
    }
}

/// Long rows → modifiers in order of first appearance.
///
/// The last non-blank `Precio Extra` of a modifier wins.
pub fn decode(rows: &[Row]) -> Vec<Modifier> {
    let mut modifiers: Vec<Modifier> = Vec::new();

    for r in rows {
        let name = row::text(r, COL_NAME);
        if name.is_empty() {
            continue;
        }

        let index = match modifiers.iter().position(|m| m.name == name) {
            Some(index) => index,
            None => {
                modifiers.push(Modifier::new(name, Money::zero()));
                modifiers.len() - 1
            }
        };
        let modifier = &mut modifiers[index];

        if let Some(charge) = row::optional_decimal(r, COL_EXTRA_CHARGE) {
            modifier.extra_charge = Money::from_decimal(charge);
        }

        let component = row::text(r, COL_COMPONENT);
        let quantity = row::decimal(r, COL_QUANTITY);
        if !component.is_empty() && quantity > Decimal::ZERO {
            modifier.components.set(component, quantity);
        }
    }

    modifiers
}

/// Modifiers → long rows.
pub fn encode<'a>(modifiers: impl IntoIterator<Item = &'a Modifier>) -> Vec<Row> {
    let mut rows = Vec::new();
    for m in modifiers {
        let line = |component: Value, quantity: Value| {
            row_of([
                (COL_NAME, Value::String(m.name.clone())),
                (COL_EXTRA_CHARGE, fmt_money(m.extra_charge)),
                (COL_COMPONENT, component),
                (COL_QUANTITY, quantity),
            ])
        };

        if m.components.is_empty() {
            rows.push(line(Value::String(String::new()), Value::String(String::new())));
        }
        for c in &m.components {
            rows.push(line(Value::String(c.name.clone()), fmt_plain(c.quantity)));
        }
    }
    rows
}

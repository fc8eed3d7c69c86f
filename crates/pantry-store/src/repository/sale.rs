//! # Sales Ledger Repository
//!
//! The append-only sales ledger (`VentasDiarias`).
//!
//! ## Append
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  append(lines)                                                          │
//! │     1. GET  VentasDiarias          ← existing rows, kept as they are    │
//! │     2. existing + encode(lines)                                         │
//! │     3. PUT  VentasDiarias          ← whole ledger replaced              │
//! │                                                                         │
//! │  There is no locking: two terminals appending at the same moment can   │
//! │  lose one of the checkouts.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dates
//! `Fecha` is written with the configured format (`dd/mm/YYYY` by default).
//! Reads also accept ISO dates. Rows whose date parses with neither are
//! dropped with a warning.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info, warn};

use pantry_core::text::split_list;
use pantry_core::{PaymentMethod, Rate, SaleLine, LEDGER_DATE_FORMAT};

use crate::client::StoreClient;
use crate::error::StoreResult;
use crate::row::{self, fmt_decimal, fmt_money, fmt_plain, row_of, Row};

pub const COL_DATE: &str = "Fecha";
pub const COL_TICKET: &str = "Ticket";
pub const COL_PRODUCT: &str = "Producto";
pub const COL_MODIFIERS: &str = "Modificadores";
pub const COL_QUANTITY: &str = "Cantidad";
pub const COL_UNIT_PRICE: &str = "Precio Unitario";
pub const COL_GROSS: &str = "Total Venta Bruto";
pub const COL_DISCOUNT_PCT: &str = "Descuento (%)";
pub const COL_DISCOUNT: &str = "Descuento ($)";
pub const COL_COST: &str = "Costo Total";
pub const COL_GROSS_PROFIT: &str = "Ganancia Bruta";
pub const COL_COMMISSION: &str = "Comision ($)";
pub const COL_NET_PROFIT: &str = "Ganancia Neta";
pub const COL_PAYMENT: &str = "Forma Pago";

const ISO_DATE: &str = "%Y-%m-%d";

/// Repository for the sales ledger.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    client: StoreClient,
    resource: String,
    date_format: String,
}

impl SaleRepository {
    pub fn new(client: StoreClient, resource: impl Into<String>) -> Self {
        SaleRepository {
            client,
            resource: resource.into(),
            date_format: LEDGER_DATE_FORMAT.to_string(),
        }
    }

    /// Sets the chrono format of the `Fecha` column.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Loads the whole ledger in table order.
    pub async fn load(&self) -> StoreResult<Vec<SaleLine>> {
        let rows = self.client.read_table(&self.resource).await?;
        let lines = decode(&rows, &self.date_format);
        debug!(rows = rows.len(), lines = lines.len(), "Loaded sales ledger");
        Ok(lines)
    }

    /// Loads the lines dated within `from..=to`.
    pub async fn load_range(&self, from: NaiveDate, to: NaiveDate) -> StoreResult<Vec<SaleLine>> {
        let lines: Vec<SaleLine> = self
            .load()
            .await?
            .into_iter()
            .filter(|l| l.date >= from && l.date <= to)
            .collect();
        debug!(%from, %to, lines = lines.len(), "Filtered sales ledger");
        Ok(lines)
    }

    /// Appends lines to the ledger.
    ///
    /// Existing rows are written back untouched, including rows this
    /// repository cannot decode.
    pub async fn append(&self, lines: &[SaleLine]) -> StoreResult<()> {
        if lines.is_empty() {
            return Ok(());
        }

        let mut rows = self.client.read_table(&self.resource).await?;
        let existing = rows.len();
        rows.extend(encode(lines, &self.date_format));
        self.client.write_table(&self.resource, &rows).await?;

        info!(existing, appended = lines.len(), "Sales appended to ledger");
        Ok(())
    }
}

/// Parses a ledger date with `format`, falling back to ISO.
pub fn parse_date(raw: &str, format: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, format)
        .or_else(|_| NaiveDate::parse_from_str(raw, ISO_DATE))
        .ok()
}

/// Rows → ledger lines. Rows without a product or a readable date are
/// skipped.
pub fn decode(rows: &[Row], date_format: &str) -> Vec<SaleLine> {
    rows.iter()
        .filter_map(|r| {
            let product = row::text(r, COL_PRODUCT);
            if product.is_empty() {
                return None;
            }

            let raw_date = row::text(r, COL_DATE);
            let Some(date) = parse_date(&raw_date, date_format) else {
                warn!(date = %raw_date, %product, "Skipping ledger row with unreadable date");
                return None;
            };

            Some(SaleLine {
                date,
                ticket: row::text(r, COL_TICKET),
                product,
                modifiers: split_list(&row::text(r, COL_MODIFIERS)),
                quantity: row::decimal(r, COL_QUANTITY),
                unit_price: row::money(r, COL_UNIT_PRICE),
                gross_total: row::money(r, COL_GROSS),
                discount_rate: Rate::from_percentage(row::decimal(r, COL_DISCOUNT_PCT)),
                discount_amount: row::money(r, COL_DISCOUNT),
                cost: row::money(r, COL_COST),
                gross_profit: row::money(r, COL_GROSS_PROFIT),
                commission: row::money(r, COL_COMMISSION),
                net_profit: row::money(r, COL_NET_PROFIT),
                payment: PaymentMethod::from_wire(&row::text(r, COL_PAYMENT)),
            })
        })
        .collect()
}

/// Ledger lines → rows.
pub fn encode(lines: &[SaleLine], date_format: &str) -> Vec<Row> {
    lines
        .iter()
        .map(|l| {
            row_of([
                (COL_DATE, Value::String(l.date.format(date_format).to_string())),
                (COL_TICKET, Value::String(l.ticket.clone())),
                (COL_PRODUCT, Value::String(l.product.clone())),
                (COL_MODIFIERS, Value::String(l.modifiers.join("; "))),
                (COL_QUANTITY, fmt_plain(l.quantity)),
                (COL_UNIT_PRICE, fmt_money(l.unit_price)),
                (COL_GROSS, fmt_money(l.gross_total)),
                (COL_DISCOUNT_PCT, fmt_decimal(l.discount_rate.as_percentage(), 2)),
                (COL_DISCOUNT, fmt_money(l.discount_amount)),
                (COL_COST, fmt_money(l.cost)),
                (COL_GROSS_PROFIT, fmt_money(l.gross_profit)),
                (COL_COMMISSION, fmt_money(l.commission)),
                (COL_NET_PROFIT, fmt_money(l.net_profit)),
                (COL_PAYMENT, Value::String(l.payment.wire_label().to_string())),
            ])
        })
        .collect()
}

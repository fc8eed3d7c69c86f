//! # Cart State
//!
//! The cart held by the interactive shell between checkouts.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shell line                 CartState                 Cart change       │
//! │  ──────────                 ─────────                 ───────────       │
//! │  cart add Cake -q 2 ──────► add(line, price) ───────► lines.push(line)  │
//! │  cart remove 1      ──────► remove(1) ──────────────► lines.remove(0)   │
//! │  cart clear         ──────► clear() ────────────────► lines.clear()     │
//! │  cart show          ──────► view(prices, catalog) ──► (read only)       │
//! │  checkout           ──────► lines() → finalize_sale, then clear()       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Line numbers shown to the operator start at 1. The product price is
//! frozen when a line is added.

use chrono::{DateTime, Local};
use serde::Serialize;

use pantry_core::sale::{quote_line, Cart, CartLine, LineQuote};
use pantry_core::{Catalog, Money, PriceList};

use crate::error::{CliError, CliResult, ErrorCode};

/// One priced cart line for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartRow {
    /// 1-based line number.
    pub number: usize,
    pub line: CartLine,
    pub quote: LineQuote,
}

/// Priced cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    pub rows: Vec<CartRow>,
    pub total: Money,
}

#[derive(Debug, Clone)]
pub struct CartState {
    cart: Cart,
    opened_at: DateTime<Local>,
}

impl CartState {
    pub fn new() -> Self {
        CartState {
            cart: Cart::new(),
            opened_at: Local::now(),
        }
    }

    /// Adds a line, freezing the listed price of its product.
    ///
    /// The product must be sellable and every modifier must exist.
    pub fn add(&mut self, line: CartLine, prices: &PriceList, catalog: &Catalog) -> CliResult<usize> {
        catalog.product_cost(&line.product)?;
        for modifier in &line.modifiers {
            if catalog.modifier(modifier).is_none() {
                return Err(CliError::not_found("Modifier", modifier));
            }
        }

        let price = prices
            .get(&line.product)
            .map(|p| p.sale_price)
            .unwrap_or_default();
        self.cart.add(line.with_unit_price(price))?;
        Ok(self.cart.len())
    }

    /// Removes line `number` (1-based).
    pub fn remove(&mut self, number: usize) -> CliResult<CartLine> {
        if number == 0 {
            return Err(CliError::validation("Line numbers start at 1"));
        }
        self.cart
            .remove(number - 1)
            .map_err(|_| CliError::new(ErrorCode::CartError, format!("Cart has no line {number}")))
    }

    pub fn clear(&mut self) {
        self.cart.clear();
        self.opened_at = Local::now();
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn opened_at(&self) -> DateTime<Local> {
        self.opened_at
    }

    pub fn view(&self, prices: &PriceList, catalog: &Catalog) -> CliResult<CartView> {
        let rows = self
            .cart
            .lines()
            .iter()
            .enumerate()
            .map(|(i, line)| {
                Ok(CartRow {
                    number: i + 1,
                    line: line.clone(),
                    quote: quote_line(line, prices, catalog)?,
                })
            })
            .collect::<CliResult<Vec<_>>>()?;
        let total = rows.iter().map(|r| r.quote.subtotal).sum();
        Ok(CartView { rows, total })
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

//! # Sales
//!
//! The cart and the pure sale-finalization routine.
//!
//! ## Line Math
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cake × 2, 10% off, card, + Extra Sugar                                 │
//! │                                                                         │
//! │  unit price   = price(Cake) + extra(Extra Sugar)    $45.00 + $5.00      │
//! │  gross        = unit × q                            $100.00             │
//! │  discount     = gross × 10%                         $10.00              │
//! │  subtotal     = gross - discount                    $90.00              │
//! │  commission   = subtotal × 4.06%  (card only)       $3.65               │
//! │  cost         = (cost(Cake) + cost(Extra Sugar)) × q                    │
//! │  gross profit = subtotal - cost                                         │
//! │  net profit   = subtotal - commission - cost                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `finalize_sale` does no I/O. It hands back the ledger lines, the
//! inventory after deduction, and the stock movements; the caller appends
//! the ledger first and writes the inventory second.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::costing::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::inventory::{merge_movements, Inventory};
use crate::money::{Money, Rate};
use crate::types::{PaymentMethod, PriceList, SaleLine, StockMovement};
use crate::validation::{validate_cart_size, validate_name, validate_quantity};
use crate::{DEFAULT_CARD_COMMISSION_BPS, DEFAULT_VAT_BPS};

// =============================================================================
// Settings
// =============================================================================

/// Rates applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleSettings {
    /// Effective card commission, VAT included.
    pub card_rate: Rate,
}

impl SaleSettings {
    /// Settings for a base commission with VAT charged on top.
    pub fn from_rates(commission: Rate, vat: Rate) -> Self {
        SaleSettings {
            card_rate: commission.compound(vat),
        }
    }
}

impl Default for SaleSettings {
    fn default() -> Self {
        SaleSettings::from_rates(
            Rate::from_bps(DEFAULT_CARD_COMMISSION_BPS),
            Rate::from_bps(DEFAULT_VAT_BPS),
        )
    }
}

// =============================================================================
// Cart
// =============================================================================

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: String,
    pub quantity: i64,
    pub discount: Rate,
    pub payment: PaymentMethod,
    pub modifiers: Vec<String>,
    /// Product price frozen when the line was added. `None` looks the price
    /// up at checkout.
    pub unit_price: Option<Money>,
}

impl CartLine {
    pub fn new(product: impl Into<String>, quantity: i64) -> Self {
        CartLine {
            product: product.into().trim().to_string(),
            quantity,
            discount: Rate::zero(),
            payment: PaymentMethod::Cash,
            modifiers: Vec::new(),
            unit_price: None,
        }
    }

    pub fn with_discount(mut self, discount: Rate) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_payment(mut self, payment: PaymentMethod) -> Self {
        self.payment = payment;
        self
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifiers.push(modifier.into().trim().to_string());
        self
    }

    pub fn with_unit_price(mut self, price: Money) -> Self {
        self.unit_price = Some(price);
        self
    }

    /// Checks the line in isolation (not against the catalog).
    pub fn validate(&self) -> CoreResult<()> {
        validate_name("product", &self.product)?;
        validate_quantity(self.quantity)?;
        if self.discount > Rate::FULL {
            return Err(CoreError::InvalidLine {
                product: self.product.clone(),
                reason: format!("discount {} is above 100%", self.discount),
            });
        }
        for modifier in &self.modifiers {
            validate_name("modifier", modifier)?;
        }
        Ok(())
    }
}

/// Priced view of a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineQuote {
    pub unit_price: Money,
    pub gross: Money,
    pub discount: Money,
    pub subtotal: Money,
}

/// Prices a cart line: frozen or listed product price plus modifier charges.
///
/// A product without a price entry sells at $0.
pub fn quote_line(line: &CartLine, prices: &PriceList, catalog: &Catalog) -> CoreResult<LineQuote> {
    let base = line
        .unit_price
        .or_else(|| prices.get(&line.product).map(|p| p.sale_price))
        .unwrap_or_default();

    let mut unit_price = base;
    for name in &line.modifiers {
        let modifier = catalog
            .modifier(name)
            .ok_or_else(|| CoreError::UnknownModifier(name.clone()))?;
        unit_price += modifier.extra_charge;
    }

    let gross = unit_price.multiply_quantity(line.quantity);
    let discount = gross.percentage(line.discount);
    Ok(LineQuote {
        unit_price,
        gross,
        discount,
        subtotal: gross - discount,
    })
}

/// Ordered cart lines held by the terminal between checkouts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line after validating it.
    pub fn add(&mut self, line: CartLine) -> CoreResult<()> {
        validate_cart_size(self.lines.len()).map_err(|_| CoreError::CartTooLarge {
            max: crate::MAX_CART_LINES,
        })?;
        line.validate()?;
        self.lines.push(line);
        Ok(())
    }

    /// Removes the line at `index` (0-based).
    pub fn remove(&mut self, index: usize) -> CoreResult<CartLine> {
        if index >= self.lines.len() {
            return Err(CoreError::LineNotFound { index });
        }
        Ok(self.lines.remove(index))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Subtotal of the line at `index`.
    pub fn line_subtotal(&self, index: usize, prices: &PriceList, catalog: &Catalog) -> CoreResult<Money> {
        let line = self
            .lines
            .get(index)
            .ok_or(CoreError::LineNotFound { index })?;
        Ok(quote_line(line, prices, catalog)?.subtotal)
    }

    /// Amount to charge: the sum of line subtotals.
    pub fn total(&self, prices: &PriceList, catalog: &Catalog) -> CoreResult<Money> {
        self.lines
            .iter()
            .map(|line| quote_line(line, prices, catalog).map(|q| q.subtotal))
            .sum()
    }
}

// =============================================================================
// Finalization
// =============================================================================

/// Everything a checkout produces.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleOutcome {
    pub ticket: Uuid,
    pub lines: Vec<SaleLine>,
    /// Inventory after deduction, to be written back whole.
    pub inventory: Inventory,
    /// One movement per base ingredient consumed.
    pub movements: Vec<StockMovement>,
}

impl SaleOutcome {
    /// Total charged to the customer.
    pub fn total_charged(&self) -> Money {
        self.lines.iter().map(SaleLine::subtotal).sum()
    }

    pub fn net_profit(&self) -> Money {
        self.lines.iter().map(|l| l.net_profit).sum()
    }

    /// Movements where stock could not cover the consumption.
    pub fn shortfalls(&self) -> impl Iterator<Item = &StockMovement> {
        self.movements.iter().filter(|m| m.has_shortfall())
    }
}

/// Turns cart lines into ledger lines and the resulting inventory.
///
/// ## Errors
/// - `EmptyCart` when there are no lines
/// - `UnknownProduct` / `UnknownModifier` for names missing from the catalog
/// - `RecipeCycle` if the stored recipe graph loops
pub fn finalize_sale(
    cart: &[CartLine],
    prices: &PriceList,
    catalog: &Catalog,
    inventory: &Inventory,
    settings: &SaleSettings,
    date: NaiveDate,
) -> CoreResult<SaleOutcome> {
    finalize_with_ticket(Uuid::new_v4(), cart, prices, catalog, inventory, settings, date)
}

fn finalize_with_ticket(
    ticket: Uuid,
    cart: &[CartLine],
    prices: &PriceList,
    catalog: &Catalog,
    inventory: &Inventory,
    settings: &SaleSettings,
    date: NaiveDate,
) -> CoreResult<SaleOutcome> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let mut after = inventory.clone();
    let mut movements = Vec::new();
    let mut lines = Vec::with_capacity(cart.len());

    for line in cart {
        line.validate()?;

        let product_cost = catalog.product_cost(&line.product)?;
        let quote = quote_line(line, prices, catalog)?;
        let qty = Decimal::from(line.quantity);

        let overflow = || CoreError::AmountOverflow {
            name: line.product.clone(),
        };
        let mut unit_cost = product_cost;
        for name in &line.modifiers {
            unit_cost = unit_cost
                .checked_add(catalog.modifier_cost(name)?)
                .ok_or_else(overflow)?;
        }
        let cost = Money::from_decimal(unit_cost.checked_mul(qty).ok_or_else(overflow)?);

        let commission = if line.payment.is_card() {
            quote.subtotal.percentage(settings.card_rate)
        } else {
            Money::zero()
        };

        let mut consumed = catalog.expand_to_ingredients(&line.product, qty)?;
        for name in &line.modifiers {
            consumed.merge(catalog.expand_modifier(name, qty)?);
        }
        movements.extend(after.apply(&consumed));

        lines.push(SaleLine {
            date,
            ticket: ticket.to_string(),
            product: line.product.clone(),
            modifiers: line.modifiers.clone(),
            quantity: qty,
            unit_price: quote.unit_price,
            gross_total: quote.gross,
            discount_rate: line.discount,
            discount_amount: quote.discount,
            cost,
            gross_profit: quote.subtotal - cost,
            commission,
            net_profit: quote.subtotal - commission - cost,
            payment: line.payment,
        });
    }

    Ok(SaleOutcome {
        ticket,
        lines,
        inventory: after,
        movements: merge_movements(movements),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

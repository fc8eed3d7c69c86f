//! # Domain Types
//!
//! Core domain types used throughout Pantry POS.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Ingredient    │   │     Recipe      │   │    Modifier     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name (key)     │◄──│  components     │   │  extra_charge   │       │
//! │  │  purchase cost  │   │  name → qty     │──►│  components     │       │
//! │  │  recipe_unit    │   │  (ingredient or │   │  name → qty     │       │
//! │  │  unit cost      │   │   sub-recipe)   │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   PriceEntry    │   │ InventoryEntry  │   │    SaleLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  sale_price     │   │  stock          │   │  date, ticket   │       │
//! │  │  gross_margin   │   │  min / max      │   │  gross ... net  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity is keyed by its display name. Names are unique within their
//! resource; an ingredient and a recipe may share a name, in which case the
//! ingredient wins wherever a component is resolved.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{Money, Rate};
use crate::text::normalize_name;

// =============================================================================
// Ingredient
// =============================================================================

/// A purchasable base ingredient.
///
/// ## Unit Cost Derivation
/// ```text
/// Flour: $20.00 per bag, 1000 g per bag
///      │
///      ▼
/// recipe_unit_cost = 20.00 / 1000 = $0.02 per g
/// ```
/// A non-zero stored `recipe_unit_cost` overrides the derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Display name, unique key.
    pub name: String,

    /// Who sells it.
    pub supplier: String,

    /// Price paid for one purchase unit.
    pub purchase_cost: Money,

    /// Recipe units contained in one purchase unit (1000 g per bag).
    pub purchase_quantity: Decimal,

    /// Unit it is bought in ("bag", "kg", "box").
    pub purchase_unit: String,

    /// Unit recipes measure it in ("g", "ml", "pc").
    pub recipe_unit: String,

    /// Cost of one recipe unit.
    pub recipe_unit_cost: Decimal,

    /// Lowercase, accent-free form of `name` for lookup.
    pub normalized_name: String,
}

impl Ingredient {
    /// Creates an ingredient with its recipe-unit cost derived from the
    /// purchase data.
    pub fn new(
        name: impl Into<String>,
        purchase_cost: Money,
        purchase_quantity: Decimal,
        purchase_unit: impl Into<String>,
        recipe_unit: impl Into<String>,
    ) -> Self {
        let name = name.into().trim().to_string();
        let normalized_name = normalize_name(&name);
        Ingredient {
            name,
            supplier: String::new(),
            purchase_cost,
            purchase_quantity,
            purchase_unit: purchase_unit.into().trim().to_string(),
            recipe_unit: recipe_unit.into().trim().to_string(),
            recipe_unit_cost: derive_unit_cost(purchase_cost, purchase_quantity),
            normalized_name,
        }
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = supplier.into().trim().to_string();
        self
    }

    /// Overrides the derived recipe-unit cost. Zero keeps the derivation.
    pub fn with_recipe_unit_cost(mut self, cost: Decimal) -> Self {
        if !cost.is_zero() {
            self.recipe_unit_cost = cost;
        }
        self
    }

    /// Cost of `quantity` recipe units.
    #[inline]
    pub fn cost_of(&self, quantity: Decimal) -> Decimal {
        self.recipe_unit_cost.saturating_mul(quantity)
    }
}

/// `purchase_cost / purchase_quantity`, zero when the quantity is zero.
///
/// A quotient too large for a decimal saturates; costing anything with it
/// then fails with `CoreError::AmountOverflow`.
pub fn derive_unit_cost(purchase_cost: Money, purchase_quantity: Decimal) -> Decimal {
    if purchase_quantity.is_zero() {
        return Decimal::ZERO;
    }
    let cost = purchase_cost.to_decimal();
    cost.checked_div(purchase_quantity).unwrap_or_else(|| {
        if cost.is_sign_negative() != purchase_quantity.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

// =============================================================================
// Components
// =============================================================================

/// One `name → quantity` entry of a recipe or modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Ingredient or sub-recipe name.
    pub name: String,
    /// Required amount, in the component's recipe unit (or units of the
    /// sub-recipe).
    pub quantity: Decimal,
}

/// Ordered component list with unique names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Components(Vec<Component>);

impl Components {
    pub fn new() -> Self {
        Components(Vec::new())
    }

    /// Sets the quantity of `name`, replacing an existing entry in place or
    /// appending a new one.
    pub fn set(&mut self, name: impl Into<String>, quantity: Decimal) {
        let name = name.into().trim().to_string();
        match self.0.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.quantity = quantity,
            None => self.0.push(Component { name, quantity }),
        }
    }

    /// Removes `name`, returning its quantity if present.
    pub fn remove(&mut self, name: &str) -> Option<Decimal> {
        let pos = self.0.iter().position(|c| c.name == name)?;
        Some(self.0.remove(pos).quantity)
    }

    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.0.iter().find(|c| c.name == name).map(|c| c.quantity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Components {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// Recipe
// =============================================================================

/// A recipe: a sellable product or a sub-recipe used by other recipes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub components: Components,
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Recipe {
            name: name.into().trim().to_string(),
            components: Components::new(),
        }
    }

    /// Builder form of `components.set`.
    pub fn with_component(mut self, name: impl Into<String>, quantity: Decimal) -> Self {
        self.components.set(name, quantity);
        self
    }
}

// =============================================================================
// Modifier
// =============================================================================

/// An add-on selectable per cart line ("Extra Cheese").
///
/// Adds `extra_charge` to the unit price and consumes its components once
/// per unit sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub name: String,
    pub extra_charge: Money,
    pub components: Components,
}

impl Modifier {
    pub fn new(name: impl Into<String>, extra_charge: Money) -> Self {
        Modifier {
            name: name.into().trim().to_string(),
            extra_charge,
            components: Components::new(),
        }
    }

    pub fn with_component(mut self, name: impl Into<String>, quantity: Decimal) -> Self {
        self.components.set(name, quantity);
        self
    }
}

// =============================================================================
// Price Entry
// =============================================================================

/// Sale price of a product with the margin recorded when it was set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub product: String,
    pub sale_price: Money,
    /// `sale_price - production cost` at the time the price was set.
    pub gross_margin: Money,
    /// `gross_margin / sale_price × 100`, 0 when the price is zero.
    pub gross_margin_pct: Decimal,
}

/// Product name → price entry.
pub type PriceList = BTreeMap<String, PriceEntry>;

// =============================================================================
// Inventory Entry
// =============================================================================

/// Stock level of one ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub ingredient: String,
    pub stock: Decimal,
    pub min: Decimal,
    pub max: Decimal,
}

impl InventoryEntry {
    pub fn new(ingredient: impl Into<String>) -> Self {
        InventoryEntry {
            ingredient: ingredient.into(),
            stock: Decimal::ZERO,
            min: Decimal::ZERO,
            max: Decimal::ZERO,
        }
    }

    /// Classifies the stock level against the thresholds.
    ///
    /// ```text
    ///   0 ─────── min ─────── (min+max)/2 ─────── max
    ///   │ Urgent   │    Low        │        Ok
    /// ```
    /// Entries without a maximum are always `Ok`.
    pub fn status(&self) -> StockStatus {
        if self.max <= Decimal::ZERO {
            return StockStatus::Ok;
        }
        if self.stock < self.min {
            StockStatus::Urgent
        } else if self.stock < self.min.saturating_add(self.max) / Decimal::TWO {
            StockStatus::Low
        } else {
            StockStatus::Ok
        }
    }
}

/// Stock level classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Ok,
    Low,
    Urgent,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StockStatus::Ok => "OK",
            StockStatus::Low => "LOW",
            StockStatus::Urgent => "URGENT",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment; carries the card commission.
    Card,
}

impl PaymentMethod {
    /// Label stored in the sales ledger's `Forma Pago` column.
    pub const fn wire_label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Efectivo",
            PaymentMethod::Card => "Tarjeta",
        }
    }

    /// Parses a ledger label. Anything but `Tarjeta`/`card` is cash.
    pub fn from_wire(label: &str) -> Self {
        match normalize_name(label).as_str() {
            "tarjeta" | "card" => PaymentMethod::Card,
            _ => PaymentMethod::Cash,
        }
    }

    #[inline]
    pub const fn is_card(&self) -> bool {
        matches!(self, PaymentMethod::Card)
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => f.write_str("Cash"),
            PaymentMethod::Card => f.write_str("Card"),
        }
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// One row of the append-only sales ledger.
///
/// Uses the snapshot pattern: prices, cost and commission are frozen at the
/// time of sale and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub date: NaiveDate,
    /// Groups the lines of one checkout. Empty for legacy rows.
    pub ticket: String,
    pub product: String,
    pub modifiers: Vec<String>,
    pub quantity: Decimal,
    /// Product price plus modifier extra charges.
    pub unit_price: Money,
    /// `unit_price × quantity`.
    pub gross_total: Money,
    pub discount_rate: Rate,
    pub discount_amount: Money,
    /// Production cost of the whole line.
    pub cost: Money,
    /// Subtotal minus cost.
    pub gross_profit: Money,
    pub commission: Money,
    /// Subtotal minus commission minus cost.
    pub net_profit: Money,
    pub payment: PaymentMethod,
}

impl SaleLine {
    /// Gross total after discount.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.gross_total - self.discount_amount
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// The effect of a deduction on one ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub ingredient: String,
    /// Quantity the sale consumed.
    pub requested: Decimal,
    /// Quantity actually taken from stock.
    pub applied: Decimal,
    /// `requested - applied`: consumption that stock could not cover.
    pub shortfall: Decimal,
    /// False when the ingredient has no inventory entry.
    pub tracked: bool,
}

impl StockMovement {
    #[inline]
    pub fn has_shortfall(&self) -> bool {
        self.shortfall > Decimal::ZERO
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

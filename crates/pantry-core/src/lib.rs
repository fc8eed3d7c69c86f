//! # pantry-core: Pure Business Logic for Pantry POS
//!
//! This crate is the **heart** of Pantry POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pantry POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    `pantry` CLI / shell                         │   │
//! │  │   ingredient, recipe, price, inventory, sell, dashboard, ...    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pantry-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  costing  │  │ inventory │  │   sale    │  │  report   │  │   │
//! │  │   │  Catalog  │  │ Inventory │  │   Cart    │  │ Dashboard │  │   │
//! │  │   │  DAG cost │  │ deduction │  │ finalize  │  │  KPIs     │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              pantry-store (Remote Table Store)                  │   │
//! │  │        HTTP GET/PUT of whole tables, row codecs                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money (integer cents) and Rate (basis points)
//! - [`types`] - Domain types (Ingredient, Recipe, Modifier, SaleLine, ...)
//! - [`text`] - Name normalization and lenient number parsing
//! - [`validation`] - Business rule validation
//! - [`costing`] - Recipe cost resolution over the ingredient/recipe graph
//! - [`inventory`] - Stock ledger with recursive deduction
//! - [`sale`] - Cart and sale finalization
//! - [`pricing`] - Price/margin analysis
//! - [`restock`] - Suggested purchases from historical sales
//! - [`report`] - Dashboard aggregation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output
//! 2. **No I/O**: the store and the terminal live in other crates
//! 3. **Integer Money**: monetary totals are cents (i64)
//! 4. **Exact Quantities**: grams, millilitres and per-unit costs are `Decimal`
//! 5. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use pantry_core::costing::Catalog;
//! use pantry_core::types::{Ingredient, Recipe};
//! use pantry_core::Money;
//! use rust_decimal::Decimal;
//!
//! let mut catalog = Catalog::default();
//! catalog.upsert_ingredient(Ingredient::new("Flour", Money::from_cents(2000), Decimal::from(1000), "bag", "g"));
//! catalog.upsert_recipe(Recipe::new("Dough").with_component("Flour", Decimal::from(500))).unwrap();
//!
//! // $20.00 per 1000 g → $0.02/g → 500 g = $10.00
//! assert_eq!(catalog.recipe_cost("Dough").unwrap(), Decimal::from(10));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod costing;
pub mod error;
pub mod inventory;
pub mod money;
pub mod pricing;
pub mod report;
pub mod restock;
pub mod sale;
pub mod text;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use costing::Catalog;
pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::Inventory;
pub use money::{Money, Rate};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Base card processor commission (3.5%), before VAT.
pub const DEFAULT_CARD_COMMISSION_BPS: u32 = 350;

/// VAT charged on top of the card commission (16%).
pub const DEFAULT_VAT_BPS: u32 = 1600;

/// Date format used by the sales ledger (`16/10/2026`).
pub const LEDGER_DATE_FORMAT: &str = "%d/%m/%Y";

/// Maximum lines allowed in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum units of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Key column of the recipe pivot table. No recipe may take this name.
pub const RECIPE_COMPONENT_COLUMN: &str = "Ingrediente";

/// Largest quantity of one component in a recipe or modifier.
pub const MAX_COMPONENT_QUANTITY: i64 = 1_000_000;

/// Maximum depth of sub-recipe nesting followed before giving up.
///
/// Cycles are detected explicitly; this only bounds pathological chains.
pub const MAX_RECIPE_DEPTH: usize = 32;

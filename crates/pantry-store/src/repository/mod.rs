//! # Repository Module
//!
//! One repository per remote table, each converting rows to domain types
//! and back.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CLI command                                                            │
//! │       │  store.recipes().load()                                         │
//! │       ▼                                                                 │
//! │  RecipeRepository                                                       │
//! │  ├── load()  → read_table  → decode(rows)  → Vec<Recipe>                │
//! │  └── save()  → encode(..)  → write_table                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreClient (GET / PUT {endpoint}/Recetas)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `decode`/`encode` functions of each module are pure and carry the
//! column layout of their table.
//!
//! ## Available Repositories
//!
//! - [`IngredientRepository`] - ingredient master
//! - [`RecipeRepository`] - recipe pivot table
//! - [`ModifierRepository`] - modifier long table
//! - [`PriceRepository`] - sale prices and margins
//! - [`InventoryRepository`] - stock levels and thresholds
//! - [`SaleRepository`] - append-only sales ledger

pub mod ingredient;
pub mod inventory;
pub mod modifier;
pub mod price;
pub mod recipe;
pub mod sale;

pub use ingredient::IngredientRepository;
pub use inventory::InventoryRepository;
pub use modifier::ModifierRepository;
pub use price::PriceRepository;
pub use recipe::RecipeRepository;
pub use sale::SaleRepository;

//! # pantry-store: Remote Table Store for Pantry POS
//!
//! This crate reads and writes the business tables kept on a remote JSON
//! table store (a worker exposing one flat table per resource).
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pantry POS Data Flow                             │
//! │                                                                         │
//! │  CLI command (pantry sell ...)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  pantry-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │    Store      │    │  Repositories │    │   Row cells  │   │   │
//! │  │   │  (lib.rs)     │    │ (recipe.rs)   │    │   (row.rs)   │   │   │
//! │  │   │               │    │               │    │              │   │   │
//! │  │   │ StoreClient   │◄───│ RecipeRepo    │───►│ text/decimal │   │   │
//! │  │   │ Resources     │    │ SaleRepo ...  │    │ fmt_money    │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼   GET / PUT {endpoint}/{resource}                               │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Remote table store: IngredientesBase, Recetas, Modificadores,  │   │
//! │  │  CostoPorProducto, Inventario, VentasDiarias                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`client`] - HTTP client and configuration
//! - [`error`] - Store error types
//! - [`row`] - Lenient cell reading and string formatting
//! - [`repository`] - One repository per table
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pantry_store::{Resources, Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::new("https://tables.example.com"), Resources::default())?;
//! let catalog = store.load_catalog().await?;
//! let inventory = store.inventory().load().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod client;
pub mod error;
pub mod repository;
pub mod row;

// =============================================================================
// Re-exports
// =============================================================================

pub use client::{StoreClient, StoreConfig, WriteMethod};
pub use error::{StoreError, StoreResult};
pub use row::Row;

pub use repository::{
    IngredientRepository, InventoryRepository, ModifierRepository, PriceRepository, RecipeRepository,
    SaleRepository,
};

use pantry_core::{Catalog, LEDGER_DATE_FORMAT};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// =============================================================================
// Resources
// =============================================================================

/// Remote table names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub ingredients: String,
    pub recipes: String,
    pub modifiers: String,
    pub prices: String,
    pub inventory: String,
    pub sales: String,
}

impl Default for Resources {
    fn default() -> Self {
        Resources {
            ingredients: "IngredientesBase".into(),
            recipes: "Recetas".into(),
            modifiers: "Modificadores".into(),
            prices: "CostoPorProducto".into(),
            inventory: "Inventario".into(),
            sales: "VentasDiarias".into(),
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Main store handle providing repository access.
///
/// Cheap to clone; every repository shares the same HTTP client.
#[derive(Debug, Clone)]
pub struct Store {
    client: StoreClient,
    resources: Resources,
    date_format: String,
}

impl Store {
    /// Creates the store handle. Fails only on a bad endpoint.
    pub fn new(config: StoreConfig, resources: Resources) -> StoreResult<Self> {
        let client = StoreClient::new(config)?;
        info!(endpoint = %client.endpoint(), "Remote store configured");
        Ok(Store {
            client,
            resources,
            date_format: LEDGER_DATE_FORMAT.to_string(),
        })
    }

    /// Sets the chrono format of ledger dates.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn client(&self) -> &StoreClient {
        &self.client
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn ingredients(&self) -> IngredientRepository {
        IngredientRepository::new(self.client.clone(), &self.resources.ingredients)
    }

    pub fn recipes(&self) -> RecipeRepository {
        RecipeRepository::new(self.client.clone(), &self.resources.recipes)
    }

    pub fn modifiers(&self) -> ModifierRepository {
        ModifierRepository::new(self.client.clone(), &self.resources.modifiers)
    }

    pub fn prices(&self) -> PriceRepository {
        PriceRepository::new(self.client.clone(), &self.resources.prices)
    }

    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.client.clone(), &self.resources.inventory)
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.client.clone(), &self.resources.sales).with_date_format(&self.date_format)
    }

    /// Loads ingredients, recipes and modifiers into one catalog.
    ///
    /// The graph is not validated here; a stored cycle surfaces as an error
    /// when the affected recipe is costed.
    pub async fn load_catalog(&self) -> StoreResult<Catalog> {
        let ingredients = self.ingredients().load().await?;
        let recipes = self.recipes().load().await?;
        let modifiers = self.modifiers().load().await?;
        debug!(
            ingredients = ingredients.len(),
            recipes = recipes.len(),
            modifiers = modifiers.len(),
            "Catalog loaded"
        );
        Ok(Catalog::from_parts(ingredients, recipes, modifiers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resources() {
        let resources = Resources::default();
        assert_eq!(resources.ingredients, "IngredientesBase");
        assert_eq!(resources.sales, "VentasDiarias");
    }

    #[test]
    fn test_store_rejects_bad_endpoint() {
        let result = Store::new(StoreConfig::new("ftp://nowhere"), Resources::default());
        assert!(matches!(result, Err(StoreError::BadEndpoint { .. })));
    }
}

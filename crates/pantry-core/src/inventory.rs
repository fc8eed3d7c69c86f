//! # Inventory Ledger
//!
//! Stock levels per ingredient and the recursive deduction applied when
//! products are sold.
//!
//! ## Deduction Flow
//! ```text
//! sell Cake × 2
//!      │
//!      ▼
//! Catalog::expand_to_ingredients  ──►  Flour 1000 g, Sugar 200 g
//!      │
//!      ▼
//! Inventory::apply
//!      ├── Flour: stock 1500 → 500      applied 1000, shortfall 0
//!      ├── Sugar: stock  150 →   0      applied  150, shortfall 50
//!      └── Salt (no entry)              untracked, applied 0
//! ```
//! Stock never goes negative. Whatever the shelf could not cover is kept on
//! the movement as `shortfall` so the caller can warn about it.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::costing::{Catalog, Expansion};
use crate::error::{CoreError, CoreResult};
use crate::types::{InventoryEntry, StockMovement, StockStatus};
use crate::validation::{validate_stock_quantity, validate_thresholds};

/// Deducts `quantity` units of `component` from `inventory`.
///
/// Walks sub-recipes down to base ingredients. Names that resolve to
/// nothing consume nothing.
pub fn deduct_inventory(
    component: &str,
    quantity: Decimal,
    inventory: &mut Inventory,
    catalog: &Catalog,
) -> CoreResult<Vec<StockMovement>> {
    let expansion = catalog.expand_to_ingredients(component, quantity)?;
    Ok(inventory.apply(&expansion))
}

/// Ingredient name → stock entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    entries: BTreeMap<String, InventoryEntry>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an inventory from loaded entries. Later duplicates win.
    pub fn from_entries(entries: impl IntoIterator<Item = InventoryEntry>) -> Self {
        Inventory {
            entries: entries
                .into_iter()
                .map(|e| (e.ingredient.clone(), e))
                .collect(),
        }
    }

    pub fn get(&self, ingredient: &str) -> Option<&InventoryEntry> {
        self.entries.get(ingredient)
    }

    pub fn entries(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current stock, zero for untracked ingredients.
    pub fn stock(&self, ingredient: &str) -> Decimal {
        self.entries
            .get(ingredient)
            .map(|e| e.stock)
            .unwrap_or(Decimal::ZERO)
    }

    /// Adds received stock, creating the entry if needed. Returns the new level.
    pub fn restock(&mut self, ingredient: &str, quantity: Decimal) -> CoreResult<Decimal> {
        validate_stock_quantity("restock quantity", quantity)?;
        let entry = self.entry_mut(ingredient);
        entry.stock = entry.stock.saturating_add(quantity);
        Ok(entry.stock)
    }

    /// Sets the stock level directly (physical count).
    pub fn set_stock(&mut self, ingredient: &str, quantity: Decimal) -> CoreResult<()> {
        validate_stock_quantity("stock", quantity)?;
        self.entry_mut(ingredient).stock = quantity;
        Ok(())
    }

    /// Sets the minimum and maximum thresholds, creating the entry if needed.
    pub fn set_thresholds(&mut self, ingredient: &str, min: Decimal, max: Decimal) -> CoreResult<()> {
        validate_thresholds(min, max)?;
        let entry = self.entry_mut(ingredient);
        entry.min = min;
        entry.max = max;
        Ok(())
    }

    /// Creates zeroed entries for every name that has none.
    ///
    /// Returns how many entries were added.
    pub fn ensure_entries<'a>(&mut self, ingredients: impl IntoIterator<Item = &'a str>) -> usize {
        let before = self.entries.len();
        for name in ingredients {
            self.entry_mut(name);
        }
        self.entries.len() - before
    }

    /// Drops the entry of a removed ingredient.
    pub fn remove(&mut self, ingredient: &str) -> CoreResult<InventoryEntry> {
        self.entries
            .remove(ingredient)
            .ok_or_else(|| CoreError::IngredientNotFound(ingredient.to_string()))
    }

    /// Status of every entry, in name order.
    pub fn status(&self) -> Vec<(&InventoryEntry, StockStatus)> {
        self.entries.values().map(|e| (e, e.status())).collect()
    }

    /// Entries needing attention (Low or Urgent), most urgent first.
    pub fn alerts(&self) -> Vec<(&InventoryEntry, StockStatus)> {
        let mut alerts: Vec<_> = self
            .status()
            .into_iter()
            .filter(|(_, s)| *s != StockStatus::Ok)
            .collect();
        alerts.sort_by(|a, b| b.1.cmp(&a.1));
        alerts
    }

    /// Applies an expansion, flooring each tracked ingredient at zero.
    pub fn apply(&mut self, expansion: &Expansion) -> Vec<StockMovement> {
        expansion
            .ingredients
            .iter()
            .map(|(name, &requested)| self.take(name, requested))
            .collect()
    }

    fn take(&mut self, ingredient: &str, requested: Decimal) -> StockMovement {
        match self.entries.get_mut(ingredient) {
            Some(entry) => {
                let applied = requested.min(entry.stock).max(Decimal::ZERO);
                entry.stock -= applied;
                StockMovement {
                    ingredient: ingredient.to_string(),
                    requested,
                    applied,
                    shortfall: requested - applied,
                    tracked: true,
                }
            }
            None => StockMovement {
                ingredient: ingredient.to_string(),
                requested,
                applied: Decimal::ZERO,
                shortfall: Decimal::ZERO,
                tracked: false,
            },
        }
    }

    fn entry_mut(&mut self, ingredient: &str) -> &mut InventoryEntry {
        let name = ingredient.trim();
        self.entries
            .entry(name.to_string())
            .or_insert_with(|| InventoryEntry::new(name))
    }
}

/// Folds movements for the same ingredient together.
pub fn merge_movements(movements: Vec<StockMovement>) -> Vec<StockMovement> {
    let mut merged: BTreeMap<String, StockMovement> = BTreeMap::new();
    for movement in movements {
        match merged.get_mut(&movement.ingredient) {
            Some(existing) => {
                existing.requested = existing.requested.saturating_add(movement.requested);
                existing.applied = existing.applied.saturating_add(movement.applied);
                existing.shortfall = existing.shortfall.saturating_add(movement.shortfall);
            }
            None => {
                merged.insert(movement.ingredient.clone(), movement);
            }
        }
    }
    merged.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{Ingredient, Recipe};
    use rust_decimal_macros::dec;

    fn bakery() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.upsert_ingredient(Ingredient::new("Flour", Money::from_cents(2000), dec!(1000), "bag", "g"));
        catalog.upsert_ingredient(Ingredient::new("Sugar", Money::from_cents(1000), dec!(1000), "bag", "g"));
        catalog.upsert_ingredient(Ingredient::new("Salt", Money::from_cents(300), dec!(500), "bag", "g"));
        catalog
            .upsert_recipe(Recipe::new("Dough").with_component("Flour", dec!(500)).with_component("Salt", dec!(2)))
            .unwrap();
        catalog
            .upsert_recipe(Recipe::new("Cake").with_component("Dough", dec!(1)).with_component("Sugar", dec!(100)))
            .unwrap();
        catalog
    }

    fn stocked(flour: Decimal, sugar: Decimal) -> Inventory {
        let mut inventory = Inventory::new();
        inventory.restock("Flour", flour).unwrap();
        inventory.restock("Sugar", sugar).unwrap();
        inventory
    }

    #[test]
    fn test_selling_two_cakes_deducts_base_ingredients() {
        let catalog = bakery();
        let mut inventory = stocked(dec!(1500), dec!(1000));

        let movements = deduct_inventory("Cake", dec!(2), &mut inventory, &catalog).unwrap();

        assert_eq!(inventory.stock("Flour"), dec!(500));
        assert_eq!(inventory.stock("Sugar"), dec!(800));
        let flour = movements.iter().find(|m| m.ingredient == "Flour").unwrap();
        assert_eq!(flour.applied, dec!(1000));
        assert!(!flour.has_shortfall());
    }

    #[test]
    fn test_deduction_floors_at_zero_and_reports_shortfall() {
        let catalog = bakery();
        let mut inventory = stocked(dec!(1500), dec!(150));

        let movements = deduct_inventory("Cake", dec!(2), &mut inventory, &catalog).unwrap();

        assert_eq!(inventory.stock("Sugar"), Decimal::ZERO);
        let sugar = movements.iter().find(|m| m.ingredient == "Sugar").unwrap();
        assert_eq!(sugar.requested, dec!(200));
        assert_eq!(sugar.applied, dec!(150));
        assert_eq!(sugar.shortfall, dec!(50));
    }

    #[test]
    fn test_untracked_ingredient_is_reported() {
        let catalog = bakery();
        let mut inventory = stocked(dec!(1500), dec!(1000));

        let movements = deduct_inventory("Dough", dec!(1), &mut inventory, &catalog).unwrap();

        let salt = movements.iter().find(|m| m.ingredient == "Salt").unwrap();
        assert!(!salt.tracked);
        assert_eq!(salt.requested, dec!(2));
        assert_eq!(salt.applied, Decimal::ZERO);
        assert!(inventory.get("Salt").is_none());
    }

    #[test]
    fn test_ensure_entries_and_thresholds() {
        let mut inventory = stocked(dec!(50), dec!(0));
        let added = inventory.ensure_entries(["Flour", "Salt", "Butter"]);
        assert_eq!(added, 2);
        assert_eq!(inventory.stock("Butter"), Decimal::ZERO);

        inventory.set_thresholds("Flour", dec!(100), dec!(500)).unwrap();
        inventory.set_thresholds("Sugar", dec!(10), dec!(30)).unwrap();
        inventory.restock("Sugar", dec!(15)).unwrap();

        let alerts = inventory.alerts();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].0.ingredient, "Flour");
        assert_eq!(alerts[0].1, StockStatus::Urgent);
        assert_eq!(alerts[1].1, StockStatus::Low);

        assert!(inventory.set_thresholds("Flour", dec!(600), dec!(500)).is_err());
    }

    #[test]
    fn test_restock_rejects_negative() {
        let mut inventory = Inventory::new();
        assert!(inventory.restock("Flour", dec!(-5)).is_err());
        assert_eq!(inventory.restock("Flour", dec!(5)).unwrap(), dec!(5));
        assert_eq!(inventory.restock("Flour", dec!(2.5)).unwrap(), dec!(7.5));
    }

    #[test]
    fn test_merge_movements() {
        let catalog = bakery();
        let mut inventory = stocked(dec!(700), dec!(1000));
        let mut movements = deduct_inventory("Dough", dec!(1), &mut inventory, &catalog).unwrap();
        movements.extend(deduct_inventory("Dough", dec!(1), &mut inventory, &catalog).unwrap());

        let merged = merge_movements(movements);
        let flour = merged.iter().find(|m| m.ingredient == "Flour").unwrap();
        assert_eq!(flour.requested, dec!(1000));
        assert_eq!(flour.applied, dec!(700));
        assert_eq!(flour.shortfall, dec!(300));
    }
}

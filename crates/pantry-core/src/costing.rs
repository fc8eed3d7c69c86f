//! # Recipe Costing
//!
//! The catalog of ingredients, recipes and modifiers, and cost resolution
//! over the recipe graph.
//!
//! ## The Name Graph
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Cake ──1──► Dough ──500──► Flour ($0.02/g)                            │
//! │     │                                                                   │
//! │     └──100──► Sugar ($0.01/g)                                           │
//! │                                                                         │
//! │   cost(Dough) = 500 × 0.02             = $10.00                         │
//! │   cost(Cake)  = 1 × cost(Dough) + 100 × 0.01 = $11.00                   │
//! │                                                                         │
//! │   Lookup order for a component name:                                    │
//! │     1. ingredient  → recipe_unit_cost                                   │
//! │     2. recipe      → cost(recipe), recursively                          │
//! │     3. unknown     → 0, reported as unresolved                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The graph must be acyclic. `Catalog::validate_recipe` rejects a recipe
//! that would close a loop before it is saved; resolution carries the
//! current path and fails with `CoreError::RecipeCycle` instead of
//! recursing forever if a loop made it into the store anyway.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::text::normalize_name;
use crate::types::{Ingredient, Modifier, Recipe};
use crate::validation::{validate_component_quantity, validate_name, validate_recipe_name};
use crate::MAX_RECIPE_DEPTH;

// =============================================================================
// Free Resolution Function
// =============================================================================

/// Resolves the cost of one unit of `component`.
///
/// `visited` is the chain of recipes currently being resolved. Callers
/// start with an empty vector; it is left as it was on success.
pub fn resolve_cost(
    component: &str,
    ingredients: &BTreeMap<String, Ingredient>,
    recipes: &BTreeMap<String, Recipe>,
    visited: &mut Vec<String>,
) -> CoreResult<Decimal> {
    if let Some(ingredient) = ingredients.get(component) {
        return Ok(ingredient.recipe_unit_cost);
    }

    match recipes.get(component) {
        Some(recipe) => recipe_total(recipe, ingredients, recipes, visited),
        None => Ok(Decimal::ZERO),
    }
}

fn recipe_total(
    recipe: &Recipe,
    ingredients: &BTreeMap<String, Ingredient>,
    recipes: &BTreeMap<String, Recipe>,
    visited: &mut Vec<String>,
) -> CoreResult<Decimal> {
    enter(visited, &recipe.name)?;

    let mut total = Decimal::ZERO;
    for component in &recipe.components {
        let unit = resolve_cost(&component.name, ingredients, recipes, visited)?;
        total = component
            .quantity
            .checked_mul(unit)
            .and_then(|partial| total.checked_add(partial))
            .ok_or_else(|| overflow(&recipe.name))?;
    }

    visited.pop();
    Ok(total)
}

fn overflow(name: &str) -> CoreError {
    CoreError::AmountOverflow {
        name: name.to_string(),
    }
}

/// Pushes `name` onto the resolution path, failing on a repeat.
fn enter(visited: &mut Vec<String>, name: &str) -> CoreResult<()> {
    if let Some(start) = visited.iter().position(|v| v == name) {
        return Err(CoreError::cycle(&visited[start..], name));
    }

    if visited.len() >= MAX_RECIPE_DEPTH {
        return Err(CoreError::RecipeTooDeep {
            name: name.to_string(),
            max: MAX_RECIPE_DEPTH,
        });
    }

    visited.push(name.to_string());
    Ok(())
}

// =============================================================================
// Result Types
// =============================================================================

/// What a component name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Ingredient,
    Recipe,
    Unknown,
}

/// One row of a recipe's cost breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostLine {
    pub component: String,
    pub kind: ComponentKind,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub partial_cost: Decimal,
}

/// Per-component costs of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub recipe: String,
    pub lines: Vec<CostLine>,
    pub total: Decimal,
    /// Names anywhere below this recipe that resolve to nothing.
    pub unresolved: Vec<String>,
}

impl CostBreakdown {
    /// Total rounded to cents.
    pub fn total_money(&self) -> Money {
        Money::from_decimal(self.total)
    }
}

/// Base-ingredient quantities a product (or modifier) consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expansion {
    pub ingredients: BTreeMap<String, Decimal>,
    pub unresolved: BTreeSet<String>,
}

impl Expansion {
    fn add(&mut self, ingredient: &str, quantity: Decimal) {
        let total = self
            .ingredients
            .entry(ingredient.to_string())
            .or_insert(Decimal::ZERO);
        *total = total.saturating_add(quantity);
    }

    /// Folds another expansion into this one.
    pub fn merge(&mut self, other: Expansion) {
        for (name, qty) in other.ingredients {
            self.add(&name, qty);
        }
        self.unresolved.extend(other.unresolved);
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Ingredients, recipes and modifiers indexed by name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    ingredients: BTreeMap<String, Ingredient>,
    recipes: BTreeMap<String, Recipe>,
    modifiers: BTreeMap<String, Modifier>,
}

impl Catalog {
    /// Builds a catalog from loaded data without graph validation.
    ///
    /// Later duplicates replace earlier ones.
    pub fn from_parts(
        ingredients: impl IntoIterator<Item = Ingredient>,
        recipes: impl IntoIterator<Item = Recipe>,
        modifiers: impl IntoIterator<Item = Modifier>,
    ) -> Self {
        Catalog {
            ingredients: ingredients.into_iter().map(|i| (i.name.clone(), i)).collect(),
            recipes: recipes.into_iter().map(|r| (r.name.clone(), r)).collect(),
            modifiers: modifiers.into_iter().map(|m| (m.name.clone(), m)).collect(),
        }
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    pub fn ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.values()
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    pub fn modifiers(&self) -> impl Iterator<Item = &Modifier> {
        self.modifiers.values()
    }

    pub fn ingredient(&self, name: &str) -> Option<&Ingredient> {
        self.ingredients.get(name)
    }

    pub fn recipe(&self, name: &str) -> Option<&Recipe> {
        self.recipes.get(name)
    }

    pub fn modifier(&self, name: &str) -> Option<&Modifier> {
        self.modifiers.get(name)
    }

    /// Finds an ingredient by exact name, then by normalized name
    /// ("azucar" finds "Azúcar").
    pub fn find_ingredient(&self, query: &str) -> Option<&Ingredient> {
        find_by_name(&self.ingredients, query)
    }

    pub fn find_recipe(&self, query: &str) -> Option<&Recipe> {
        find_by_name(&self.recipes, query)
    }

    pub fn find_modifier(&self, query: &str) -> Option<&Modifier> {
        find_by_name(&self.modifiers, query)
    }

    /// What `name` resolves to as a component. Ingredients win.
    pub fn kind_of(&self, name: &str) -> ComponentKind {
        if self.ingredients.contains_key(name) {
            ComponentKind::Ingredient
        } else if self.recipes.contains_key(name) {
            ComponentKind::Recipe
        } else {
            ComponentKind::Unknown
        }
    }

    /// Recipes and modifiers that list `name` as a direct component.
    pub fn dependents(&self, name: &str) -> Vec<String> {
        let recipes = self
            .recipes
            .values()
            .filter(|r| r.components.get(name).is_some())
            .map(|r| r.name.clone());
        let modifiers = self
            .modifiers
            .values()
            .filter(|m| m.components.get(name).is_some())
            .map(|m| m.name.clone());
        recipes.chain(modifiers).collect()
    }

    // -------------------------------------------------------------------------
    // Ingredient edits
    // -------------------------------------------------------------------------

    /// Inserts or replaces an ingredient, returning the previous version.
    pub fn upsert_ingredient(&mut self, ingredient: Ingredient) -> Option<Ingredient> {
        self.ingredients.insert(ingredient.name.clone(), ingredient)
    }

    /// Removes an ingredient. Components naming it become unresolved.
    pub fn remove_ingredient(&mut self, name: &str) -> CoreResult<Ingredient> {
        self.ingredients
            .remove(name)
            .ok_or_else(|| CoreError::IngredientNotFound(name.to_string()))
    }

    // -------------------------------------------------------------------------
    // Recipe edits
    // -------------------------------------------------------------------------

    /// Creates an empty recipe.
    pub fn create_recipe(&mut self, name: &str) -> CoreResult<()> {
        let name = name.trim();
        validate_recipe_name(name)?;
        if self.recipes.contains_key(name) {
            return Err(CoreError::Duplicate {
                kind: "Recipe".to_string(),
                name: name.to_string(),
            });
        }
        self.recipes.insert(name.to_string(), Recipe::new(name));
        Ok(())
    }

    /// Validates and inserts or replaces a recipe.
    pub fn upsert_recipe(&mut self, recipe: Recipe) -> CoreResult<Option<Recipe>> {
        self.validate_recipe(&recipe)?;
        Ok(self.recipes.insert(recipe.name.clone(), recipe))
    }

    /// Sets one component quantity of an existing recipe.
    ///
    /// The component must be a known ingredient or recipe, and the edit must
    /// not close a cycle.
    pub fn set_recipe_component(
        &mut self,
        recipe: &str,
        component: &str,
        quantity: Decimal,
    ) -> CoreResult<()> {
        let mut updated = self
            .recipes
            .get(recipe)
            .cloned()
            .ok_or_else(|| CoreError::RecipeNotFound(recipe.to_string()))?;

        let component = component.trim();
        if self.kind_of(component) == ComponentKind::Unknown {
            return Err(CoreError::UnknownComponent(component.to_string()));
        }

        updated.components.set(component, quantity);
        self.upsert_recipe(updated)?;
        Ok(())
    }

    pub fn remove_recipe_component(&mut self, recipe: &str, component: &str) -> CoreResult<Decimal> {
        let entry = self
            .recipes
            .get_mut(recipe)
            .ok_or_else(|| CoreError::RecipeNotFound(recipe.to_string()))?;
        entry
            .components
            .remove(component)
            .ok_or_else(|| CoreError::ComponentNotFound {
                owner: recipe.to_string(),
                component: component.to_string(),
            })
    }

    pub fn remove_recipe(&mut self, name: &str) -> CoreResult<Recipe> {
        self.recipes
            .remove(name)
            .ok_or_else(|| CoreError::RecipeNotFound(name.to_string()))
    }

    // -------------------------------------------------------------------------
    // Modifier edits
    // -------------------------------------------------------------------------

    /// Validates and inserts or replaces a modifier.
    pub fn upsert_modifier(&mut self, modifier: Modifier) -> CoreResult<Option<Modifier>> {
        validate_name("modifier", &modifier.name)?;
        for component in &modifier.components {
            validate_name("component", &component.name)?;
            validate_component_quantity(component.quantity)?;
        }
        Ok(self.modifiers.insert(modifier.name.clone(), modifier))
    }

    /// Sets the extra charge of a modifier, creating it when missing.
    pub fn set_modifier_charge(&mut self, name: &str, extra_charge: Money) -> CoreResult<()> {
        let name = name.trim();
        let modifier = match self.modifiers.get(name) {
            Some(existing) => Modifier {
                extra_charge,
                ..existing.clone()
            },
            None => Modifier::new(name, extra_charge),
        };
        self.upsert_modifier(modifier)?;
        Ok(())
    }

    pub fn set_modifier_component(
        &mut self,
        modifier: &str,
        component: &str,
        quantity: Decimal,
    ) -> CoreResult<()> {
        let mut updated = self
            .modifiers
            .get(modifier)
            .cloned()
            .ok_or_else(|| CoreError::UnknownModifier(modifier.to_string()))?;

        let component = component.trim();
        if self.kind_of(component) == ComponentKind::Unknown {
            return Err(CoreError::UnknownComponent(component.to_string()));
        }

        updated.components.set(component, quantity);
        self.upsert_modifier(updated)?;
        Ok(())
    }

    pub fn remove_modifier_component(&mut self, modifier: &str, component: &str) -> CoreResult<Decimal> {
        let entry = self
            .modifiers
            .get_mut(modifier)
            .ok_or_else(|| CoreError::UnknownModifier(modifier.to_string()))?;
        entry
            .components
            .remove(component)
            .ok_or_else(|| CoreError::ComponentNotFound {
                owner: modifier.to_string(),
                component: component.to_string(),
            })
    }

    pub fn remove_modifier(&mut self, name: &str) -> CoreResult<Modifier> {
        self.modifiers
            .remove(name)
            .ok_or_else(|| CoreError::UnknownModifier(name.to_string()))
    }

    // -------------------------------------------------------------------------
    // Costs
    // -------------------------------------------------------------------------

    /// Cost of one unit of `name` (ingredient, recipe, or zero).
    pub fn unit_cost(&self, name: &str) -> CoreResult<Decimal> {
        resolve_cost(name, &self.ingredients, &self.recipes, &mut Vec::new())
    }

    /// Total cost of a recipe.
    pub fn recipe_cost(&self, name: &str) -> CoreResult<Decimal> {
        let recipe = self
            .recipes
            .get(name)
            .ok_or_else(|| CoreError::RecipeNotFound(name.to_string()))?;
        recipe_total(recipe, &self.ingredients, &self.recipes, &mut Vec::new())
    }

    /// Production cost of one unit of a sellable product.
    ///
    /// Products are usually recipes; a bare ingredient can be sold too.
    pub fn product_cost(&self, name: &str) -> CoreResult<Decimal> {
        match self.kind_of(name) {
            ComponentKind::Unknown => Err(CoreError::UnknownProduct(name.to_string())),
            _ => self.unit_cost(name),
        }
    }

    /// Ingredient cost of one application of a modifier.
    pub fn modifier_cost(&self, name: &str) -> CoreResult<Decimal> {
        let modifier = self
            .modifiers
            .get(name)
            .ok_or_else(|| CoreError::UnknownModifier(name.to_string()))?;

        let mut total = Decimal::ZERO;
        for component in &modifier.components {
            let unit = self.unit_cost(&component.name)?;
            total = component
                .quantity
                .checked_mul(unit)
                .and_then(|partial| total.checked_add(partial))
                .ok_or_else(|| overflow(name))?;
        }
        Ok(total)
    }

    /// Per-component partial costs of a recipe.
    pub fn cost_breakdown(&self, name: &str) -> CoreResult<CostBreakdown> {
        let recipe = self
            .recipes
            .get(name)
            .ok_or_else(|| CoreError::RecipeNotFound(name.to_string()))?;

        let mut visited = vec![recipe.name.clone()];
        let mut lines = Vec::with_capacity(recipe.components.len());
        let mut total = Decimal::ZERO;

        for component in &recipe.components {
            let unit_cost =
                resolve_cost(&component.name, &self.ingredients, &self.recipes, &mut visited)?;
            let partial_cost = unit_cost
                .checked_mul(component.quantity)
                .ok_or_else(|| overflow(name))?;
            total = total.checked_add(partial_cost).ok_or_else(|| overflow(name))?;
            lines.push(CostLine {
                component: component.name.clone(),
                kind: self.kind_of(&component.name),
                quantity: component.quantity,
                unit_cost,
                partial_cost,
            });
        }

        let unresolved = self
            .expand_to_ingredients(name, Decimal::ONE)?
            .unresolved
            .into_iter()
            .collect();

        Ok(CostBreakdown {
            recipe: recipe.name.clone(),
            lines,
            total,
            unresolved,
        })
    }

    // -------------------------------------------------------------------------
    // Graph checks
    // -------------------------------------------------------------------------

    /// Checks a recipe before it is saved.
    ///
    /// Rejects blank names, non-positive quantities, and any component chain
    /// leading back to the recipe itself (evaluated as if `recipe` replaced
    /// the stored version).
    pub fn validate_recipe(&self, recipe: &Recipe) -> CoreResult<()> {
        validate_recipe_name(&recipe.name)?;
        for component in &recipe.components {
            validate_name("component", &component.name)?;
            validate_component_quantity(component.quantity)?;
        }

        let mut visited = Vec::new();
        let mut done = HashSet::new();
        self.visit(recipe, Some(recipe), &mut visited, &mut done)
    }

    /// Checks that no stored recipe reaches itself.
    pub fn validate_graph(&self) -> CoreResult<()> {
        let mut done = HashSet::new();
        for recipe in self.recipes.values() {
            let mut visited = Vec::new();
            self.visit(recipe, None, &mut visited, &mut done)?;
        }
        Ok(())
    }

    fn visit(
        &self,
        recipe: &Recipe,
        candidate: Option<&Recipe>,
        visited: &mut Vec<String>,
        done: &mut HashSet<String>,
    ) -> CoreResult<()> {
        if done.contains(&recipe.name) {
            return Ok(());
        }
        enter(visited, &recipe.name)?;

        for component in &recipe.components {
            if self.ingredients.contains_key(&component.name) {
                continue;
            }
            let next = match candidate {
                Some(c) if c.name == component.name => Some(c),
                _ => self.recipes.get(&component.name),
            };
            if let Some(next) = next {
                self.visit(next, candidate, visited, done)?;
            }
        }

        visited.pop();
        done.insert(recipe.name.clone());
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Expansion
    // -------------------------------------------------------------------------

    /// Flattens `quantity` units of `name` into base-ingredient quantities.
    ///
    /// ```text
    /// expand(Cake, 2):
    ///   Cake × 2 ──► Dough × 2 ──► Flour 1000 g
    ///            └─► Sugar 200 g
    /// ```
    pub fn expand_to_ingredients(&self, name: &str, quantity: Decimal) -> CoreResult<Expansion> {
        let mut out = Expansion::default();
        self.expand_into(name, quantity, &mut Vec::new(), &mut out)?;
        Ok(out)
    }

    /// Flattens `quantity` applications of a modifier.
    pub fn expand_modifier(&self, name: &str, quantity: Decimal) -> CoreResult<Expansion> {
        let modifier = self
            .modifiers
            .get(name)
            .ok_or_else(|| CoreError::UnknownModifier(name.to_string()))?;

        let mut out = Expansion::default();
        for component in &modifier.components {
            let scaled = component
                .quantity
                .checked_mul(quantity)
                .ok_or_else(|| overflow(name))?;
            self.expand_into(&component.name, scaled, &mut Vec::new(), &mut out)?;
        }
        Ok(out)
    }

    fn expand_into(
        &self,
        name: &str,
        quantity: Decimal,
        visited: &mut Vec<String>,
        out: &mut Expansion,
    ) -> CoreResult<()> {
        if self.ingredients.contains_key(name) {
            out.add(name, quantity);
            return Ok(());
        }

        let Some(recipe) = self.recipes.get(name) else {
            out.unresolved.insert(name.to_string());
            return Ok(());
        };

        enter(visited, name)?;
        for component in &recipe.components {
            let scaled = component
                .quantity
                .checked_mul(quantity)
                .ok_or_else(|| overflow(name))?;
            self.expand_into(&component.name, scaled, visited, out)?;
        }
        visited.pop();
        Ok(())
    }
}

fn find_by_name<'a, T>(index: &'a BTreeMap<String, T>, query: &str) -> Option<&'a T> {
    let query = query.trim();
    if let Some(found) = index.get(query) {
        return Some(found);
    }
    let wanted = normalize_name(query);
    if wanted.is_empty() {
        return None;
    }
    index
        .iter()
        .find(|(name, _)| normalize_name(name) == wanted)
        .map(|(_, value)| value)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// 10^20, far past any real recipe quantity.
    fn huge() -> Decimal {
        Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0)
    }

    /// Flour $0.02/g, Sugar $0.01/g, Dough = 500 g Flour, Cake = 1 Dough + 100 g Sugar.
    fn bakery() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.upsert_ingredient(Ingredient::new("Flour", Money::from_cents(2000), dec!(1000), "bag", "g"));
        catalog.upsert_ingredient(Ingredient::new("Sugar", Money::from_cents(1000), dec!(1000), "bag", "g"));
        catalog
            .upsert_recipe(Recipe::new("Dough").with_component("Flour", dec!(500)))
            .unwrap();
        catalog
            .upsert_recipe(
                Recipe::new("Cake")
                    .with_component("Dough", dec!(1))
                    .with_component("Sugar", dec!(100)),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn test_recipe_cost_recurses_through_sub_recipes() {
        let catalog = bakery();
        assert_eq!(catalog.unit_cost("Flour").unwrap(), dec!(0.02));
        assert_eq!(catalog.recipe_cost("Dough").unwrap(), dec!(10));
        assert_eq!(catalog.recipe_cost("Cake").unwrap(), dec!(11));
    }

    #[test]
    fn test_ingredient_name_takes_precedence() {
        let mut catalog = bakery();
        // A recipe shadowed by an ingredient of the same name
        catalog
            .upsert_recipe(Recipe::new("Sugar").with_component("Flour", dec!(1000)))
            .unwrap();

        assert_eq!(catalog.kind_of("Sugar"), ComponentKind::Ingredient);
        assert_eq!(catalog.recipe_cost("Cake").unwrap(), dec!(11));
    }

    #[test]
    fn test_unknown_component_costs_zero_and_is_reported() {
        let catalog = Catalog::from_parts(
            vec![Ingredient::new("Flour", Money::from_cents(2000), dec!(1000), "bag", "g")],
            vec![Recipe::new("Bread")
                .with_component("Flour", dec!(100))
                .with_component("Yeast", dec!(5))],
            vec![],
        );

        assert_eq!(catalog.recipe_cost("Bread").unwrap(), dec!(2));

        let breakdown = catalog.cost_breakdown("Bread").unwrap();
        assert_eq!(breakdown.unresolved, vec!["Yeast".to_string()]);
        assert_eq!(breakdown.lines[1].kind, ComponentKind::Unknown);
        assert_eq!(breakdown.lines[1].partial_cost, Decimal::ZERO);
        assert_eq!(breakdown.total_money().cents(), 200);
    }

    #[test]
    fn test_cost_breakdown_lines() {
        let breakdown = bakery().cost_breakdown("Cake").unwrap();
        assert_eq!(breakdown.lines.len(), 2);
        assert_eq!(breakdown.lines[0].component, "Dough");
        assert_eq!(breakdown.lines[0].kind, ComponentKind::Recipe);
        assert_eq!(breakdown.lines[0].partial_cost, dec!(10));
        assert_eq!(breakdown.lines[1].partial_cost, dec!(1));
        assert_eq!(breakdown.total, dec!(11));
        assert!(breakdown.unresolved.is_empty());
    }

    #[test]
    fn test_validate_recipe_rejects_cycle() {
        let mut catalog = bakery();
        let err = catalog
            .set_recipe_component("Dough", "Cake", dec!(1))
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::RecipeCycle {
                path: vec!["Dough".into(), "Cake".into(), "Dough".into()]
            }
        );
        // The stored recipe is unchanged
        assert_eq!(catalog.recipe("Dough").unwrap().components.len(), 1);
    }

    #[test]
    fn test_validate_recipe_rejects_self_reference() {
        let catalog = bakery();
        let looped = Recipe::new("Loop").with_component("Loop", dec!(1));
        assert!(matches!(
            catalog.validate_recipe(&looped),
            Err(CoreError::RecipeCycle { .. })
        ));
    }

    #[test]
    fn test_resolution_detects_stored_cycle() {
        let catalog = Catalog::from_parts(
            vec![],
            vec![
                Recipe::new("A").with_component("B", dec!(1)),
                Recipe::new("B").with_component("A", dec!(1)),
            ],
            vec![],
        );

        assert!(matches!(catalog.recipe_cost("A"), Err(CoreError::RecipeCycle { .. })));
        assert!(matches!(catalog.validate_graph(), Err(CoreError::RecipeCycle { .. })));
        assert!(matches!(
            catalog.expand_to_ingredients("A", dec!(1)),
            Err(CoreError::RecipeCycle { .. })
        ));
    }

    #[test]
    fn test_shared_sub_recipe_is_not_a_cycle() {
        let mut catalog = bakery();
        catalog
            .upsert_recipe(
                Recipe::new("Double")
                    .with_component("Dough", dec!(1))
                    .with_component("Cake", dec!(1)),
            )
            .unwrap();
        assert_eq!(catalog.recipe_cost("Double").unwrap(), dec!(21));
        assert!(catalog.validate_graph().is_ok());
    }

    #[test]
    fn test_set_component_rejects_unknown_name() {
        let mut catalog = bakery();
        assert_eq!(
            catalog.set_recipe_component("Cake", "Glitter", dec!(1)),
            Err(CoreError::UnknownComponent("Glitter".into()))
        );
        assert!(matches!(
            catalog.set_recipe_component("Pie", "Flour", dec!(1)),
            Err(CoreError::RecipeNotFound(_))
        ));
    }

    #[test]
    fn test_create_recipe_rejects_duplicate() {
        let mut catalog = bakery();
        assert!(catalog.create_recipe("Pie").is_ok());
        assert!(matches!(catalog.create_recipe("Pie"), Err(CoreError::Duplicate { .. })));
        assert_eq!(catalog.recipe_cost("Pie").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_remove_component() {
        let mut catalog = bakery();
        assert_eq!(catalog.remove_recipe_component("Cake", "Sugar").unwrap(), dec!(100));
        assert_eq!(catalog.recipe_cost("Cake").unwrap(), dec!(10));
        assert!(matches!(
            catalog.remove_recipe_component("Cake", "Sugar"),
            Err(CoreError::ComponentNotFound { .. })
        ));
    }

    #[test]
    fn test_modifier_cost_and_expansion() {
        let mut catalog = bakery();
        catalog.set_modifier_charge("Extra Sugar", Money::from_cents(500)).unwrap();
        catalog.set_modifier_component("Extra Sugar", "Sugar", dec!(50)).unwrap();

        assert_eq!(catalog.modifier_cost("Extra Sugar").unwrap(), dec!(0.5));

        let expansion = catalog.expand_modifier("Extra Sugar", dec!(3)).unwrap();
        assert_eq!(expansion.ingredients.get("Sugar"), Some(&dec!(150)));
        assert!(matches!(catalog.modifier_cost("Nope"), Err(CoreError::UnknownModifier(_))));
    }

    #[test]
    fn test_expand_cake() {
        let expansion = bakery().expand_to_ingredients("Cake", dec!(2)).unwrap();
        assert_eq!(expansion.ingredients.get("Flour"), Some(&dec!(1000)));
        assert_eq!(expansion.ingredients.get("Sugar"), Some(&dec!(200)));
        assert!(expansion.unresolved.is_empty());
    }

    #[test]
    fn test_product_cost_unknown_product() {
        let catalog = bakery();
        assert_eq!(catalog.product_cost("Cake").unwrap(), dec!(11));
        assert_eq!(catalog.product_cost("Flour").unwrap(), dec!(0.02));
        assert_eq!(
            catalog.product_cost("Pie"),
            Err(CoreError::UnknownProduct("Pie".into()))
        );
    }

    #[test]
    fn test_oversized_quantities_fail_instead_of_panicking() {
        let flour = Ingredient::new("Flour", Money::from_cents(2000), dec!(1000), "bag", "g")
            .with_recipe_unit_cost(dec!(10000000000));
        let cake = Recipe::new("Cake").with_component("Flour", huge());
        let topping = Modifier::new("Extra Flour", Money::zero()).with_component("Flour", huge());
        let catalog = Catalog::from_parts([flour], [cake.clone()], [topping]);

        let overflow = Err(CoreError::AmountOverflow { name: "Cake".into() });
        assert_eq!(catalog.recipe_cost("Cake"), overflow);
        assert_eq!(catalog.product_cost("Cake"), overflow);
        assert!(matches!(catalog.cost_breakdown("Cake"), Err(CoreError::AmountOverflow { .. })));
        assert!(matches!(
            catalog.modifier_cost("Extra Flour"),
            Err(CoreError::AmountOverflow { .. })
        ));
        assert!(matches!(
            catalog.expand_to_ingredients("Cake", dec!(10000000000)),
            Err(CoreError::AmountOverflow { .. })
        ));

        let mut editable = Catalog::default();
        editable.upsert_ingredient(Ingredient::new("Flour", Money::from_cents(2000), dec!(1000), "bag", "g"));
        assert!(matches!(editable.upsert_recipe(cake), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_component_column_is_not_a_recipe_name() {
        let mut catalog = bakery();
        assert!(matches!(
            catalog.create_recipe("Ingrediente"),
            Err(CoreError::Validation(crate::ValidationError::InvalidFormat { .. }))
        ));
        assert!(matches!(
            catalog.upsert_recipe(Recipe::new("ingrediente").with_component("Flour", dec!(1))),
            Err(CoreError::Validation(_))
        ));
        assert!(catalog.find_recipe("Ingrediente").is_none());
    }

    #[test]
    fn test_find_by_normalized_name() {
        let mut catalog = bakery();
        catalog.upsert_ingredient(Ingredient::new("Azúcar Glass", Money::from_cents(3000), dec!(1000), "bag", "g"));
        assert_eq!(catalog.find_ingredient("azucar glass").unwrap().name, "Azúcar Glass");
        assert_eq!(catalog.find_recipe("cake").unwrap().name, "Cake");
        assert!(catalog.find_recipe("").is_none());
    }

    #[test]
    fn test_dependents() {
        let catalog = bakery();
        assert_eq!(catalog.dependents("Flour"), vec!["Dough".to_string()]);
        assert_eq!(catalog.dependents("Dough"), vec!["Cake".to_string()]);
    }
}

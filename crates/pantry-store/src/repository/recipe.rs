//! # Recipe Repository
//!
//! Recipes are stored as a pivot table: one row per component, one column
//! per recipe.
//!
//! ```text
//! ┌─────────────┬───────┬──────┬──────────┐
//! │ Ingrediente │ Dough │ Cake │ Glaze    │
//! ├─────────────┼───────┼──────┼──────────┤
//! │ Flour       │ 500   │      │          │
//! │ Dough       │       │ 1    │          │
//! │ Sugar       │       │ 100  │          │
//! └─────────────┴───────┴──────┴──────────┘
//!                                 └─ empty recipe: column of blanks
//! ```
//!
//! A recipe with no components has nothing to put in a cell, so a table
//! holding only empty recipes gets one placeholder row with a blank
//! `Ingrediente`. Cells that are blank, malformed or not positive are not
//! components. Oversized cells are kept as they are and logged; costing
//! reports them as an error instead of a number.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, warn};

use pantry_core::{Recipe, MAX_COMPONENT_QUANTITY};

use crate::client::StoreClient;
use crate::error::StoreResult;
use crate::row::{self, fmt_plain, Row};

pub const COL_COMPONENT: &str = pantry_core::RECIPE_COMPONENT_COLUMN;

/// Repository for the recipe pivot table.
#[derive(Debug, Clone)]
pub struct RecipeRepository {
    client: StoreClient,
    resource: String,
}

impl RecipeRepository {
    pub fn new(client: StoreClient, resource: impl Into<String>) -> Self {
        RecipeRepository {
            client,
            resource: resource.into(),
        }
    }

    pub async fn load(&self) -> StoreResult<Vec<Recipe>> {
        let rows = self.client.read_table(&self.resource).await?;
        let recipes = decode(&rows);
        debug!(count = recipes.len(), "Loaded recipes");
        Ok(recipes)
    }

    pub async fn save<'a>(&self, recipes: impl IntoIterator<Item = &'a Recipe>) -> StoreResult<()> {
        let rows = encode(recipes);
        debug!(rows = rows.len(), "Saving recipes");
        self.client.write_table(&self.resource, &rows).await
    }
}

/// Pivot rows → recipes, sorted by name.
pub fn decode(rows: &[Row]) -> Vec<Recipe> {
    let mut recipes: BTreeMap<String, Recipe> = BTreeMap::new();

    for r in rows {
        for column in r.keys() {
            let name = column.trim();
            if name.is_empty() || name == COL_COMPONENT {
                continue;
            }
            recipes
                .entry(name.to_string())
                .or_insert_with(|| Recipe::new(name));
        }
    }

    for r in rows {
        let component = row::text(r, COL_COMPONENT);
        if component.is_empty() {
            continue;
        }
        for (name, recipe) in recipes.iter_mut() {
            match row::optional_decimal(r, name) {
                Some(qty) if qty > Decimal::ZERO => {
                    if qty > Decimal::from(MAX_COMPONENT_QUANTITY) {
                        warn!(recipe = %name, %component, %qty, "Recipe quantity out of range");
                    }
                    recipe.components.set(component.clone(), qty);
                }
                _ => {}
            }
        }
    }

    recipes.into_values().collect()
}

/// Recipes → pivot rows.
///
/// Component rows follow first appearance across recipes.
pub fn encode<'a>(recipes: impl IntoIterator<Item = &'a Recipe>) -> Vec<Row> {
    let recipes: Vec<&Recipe> = recipes.into_iter().collect();
    if recipes.is_empty() {
        return Vec::new();
    }

    let mut components: Vec<&str> = Vec::new();
    for recipe in &recipes {
        for c in &recipe.components {
            if !components.contains(&c.name.as_str()) {
                components.push(&c.name);
            }
        }
    }

    let blank_row = |component: &str| -> Row {
        let mut r = Row::new();
        r.insert(COL_COMPONENT.to_string(), Value::String(component.to_string()));
        for recipe in &recipes {
            r.insert(recipe.name.clone(), Value::String(String::new()));
        }
        r
    };

    if components.is_empty() {
        return vec![blank_row("")];
    }

    components
        .into_iter()
        .map(|component| {
            let mut r = blank_row(component);
            for recipe in &recipes {
                if let Some(qty) = recipe.components.get(component) {
                    r.insert(recipe.name.clone(), fmt_plain(qty));
                }
            }
            r
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn rows(value: Value) -> Vec<Row> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_pivot() {
        let rows = rows(json!([
            {"Ingrediente": "Flour", "Dough": "500", "Cake": "", "Glaze": ""},
            {"Ingrediente": "Dough", "Dough": "", "Cake": 1, "Glaze": ""},
            {"Ingrediente": "Sugar", "Dough": "0", "Cake": "100", "Glaze": "abc"},
            {"Ingrediente": "", "Dough": "7", "Cake": "", "Glaze": ""}
        ]));

        let recipes = decode(&rows);

        let names: Vec<&str> = recipes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Cake", "Dough", "Glaze"]);

        let cake = &recipes[0];
        assert_eq!(cake.components.get("Dough"), Some(dec!(1)));
        assert_eq!(cake.components.get("Sugar"), Some(dec!(100)));
        assert_eq!(cake.components.len(), 2);

        let dough = &recipes[1];
        assert_eq!(dough.components.len(), 1);
        assert_eq!(dough.components.get("Flour"), Some(dec!(500)));

        assert!(recipes[2].components.is_empty());
    }

    #[test]
    fn test_encode_keeps_empty_recipes() {
        let dough = Recipe::new("Dough").with_component("Flour", dec!(500));
        let glaze = Recipe::new("Glaze");

        let encoded = encode([&dough, &glaze]);
        assert_eq!(encoded.len(), 1);
        assert_eq!(encoded[0]["Dough"], json!("500"));
        assert_eq!(encoded[0]["Glaze"], json!(""));

        assert_eq!(decode(&encoded), vec![dough, glaze]);
    }

    #[test]
    fn test_only_empty_recipes_use_a_placeholder_row() {
        let glaze = Recipe::new("Glaze");

        let encoded = encode([&glaze]);
        assert_eq!(encoded.len(), 1);
        assert_eq!(encoded[0]["Ingrediente"], json!(""));

        assert_eq!(decode(&encoded), vec![glaze]);
        assert!(encode(std::iter::empty::<&Recipe>()).is_empty());
    }
}

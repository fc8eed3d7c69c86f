//! # Validation Module
//!
//! Input validation utilities for Pantry POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  ├── Types and required flags                                          │
//! │  └── Immediate usage errors                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - Business rule validation                       │
//! │  ├── Names, quantities, discounts, purchase data                       │
//! │  └── Runs before any store write                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Catalog graph checks (costing::Catalog)                      │
//! │  └── Recipe cycles, unknown names                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pantry_core::validation::{validate_name, validate_quantity};
//!
//! validate_name("recipe", "Chocolate Cake").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::text::normalize_name;
use crate::{MAX_CART_LINES, MAX_COMPONENT_QUANTITY, MAX_LINE_QUANTITY, RECIPE_COMPONENT_COLUMN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted entity name.
pub const MAX_NAME_LEN: usize = 120;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an entity name (ingredient, recipe, modifier, product).
///
/// ## Rules
/// - Must not be blank
/// - At most `MAX_NAME_LEN` characters
/// - Must not contain `;` (the ledger's modifier list separator)
///
/// ```rust
/// use pantry_core::validation::validate_name;
///
/// assert!(validate_name("ingredient", "Flour").is_ok());
/// assert!(validate_name("ingredient", "   ").is_err());
/// ```
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    if name.contains(';') {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain ';'".to_string(),
        });
    }

    Ok(())
}

/// Validates a recipe name: an entity name that is not the pivot table's
/// component column.
pub fn validate_recipe_name(name: &str) -> ValidationResult<()> {
    validate_name("recipe", name)?;
    if normalize_name(name) == normalize_name(RECIPE_COMPONENT_COLUMN) {
        return Err(ValidationError::InvalidFormat {
            field: "recipe".to_string(),
            reason: format!("'{RECIPE_COMPONENT_COLUMN}' is reserved"),
        });
    }
    Ok(())
}

/// Validates a unit label ("g", "bag").
pub fn validate_unit(field: &str, unit: &str) -> ValidationResult<()> {
    if unit.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// pantry> cart add "Chocolate Cake" 2
///       │
///       ▼
/// validate_quantity(2) ← THIS FUNCTION
///       │
///       ├── qty <= 0?  → Error: "quantity must be positive"
///       ├── qty > 999? → Error: "quantity must be between 1 and 999"
///       └── OK → line appended to the cart
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a component quantity inside a recipe or modifier
/// (> 0 and at most `MAX_COMPONENT_QUANTITY`).
pub fn validate_component_quantity(qty: Decimal) -> ValidationResult<()> {
    if qty <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "component quantity".to_string(),
        });
    }
    if qty > Decimal::from(MAX_COMPONENT_QUANTITY) {
        return Err(ValidationError::OutOfRange {
            field: "component quantity".to_string(),
            min: 0,
            max: MAX_COMPONENT_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a discount percentage (0 to 100 inclusive).
pub fn validate_discount_percent(pct: Decimal) -> ValidationResult<()> {
    if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

/// Validates a price. Zero is allowed (free items).
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a stock quantity or threshold (>= 0).
pub fn validate_stock_quantity(field: &str, qty: Decimal) -> ValidationResult<()> {
    if qty < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates inventory thresholds.
///
/// ## Rules
/// - Both non-negative
/// - `min <= max` when a maximum is set
pub fn validate_thresholds(min: Decimal, max: Decimal) -> ValidationResult<()> {
    validate_stock_quantity("minimum stock", min)?;
    validate_stock_quantity("maximum stock", max)?;

    if max > Decimal::ZERO && min > max {
        return Err(ValidationError::InvalidFormat {
            field: "minimum stock".to_string(),
            reason: format!("{min} is above the maximum {max}"),
        });
    }

    Ok(())
}

/// Validates the purchase data of an ingredient.
///
/// ## Rules
/// - Purchase cost > 0
/// - Purchase quantity > 0
/// - Purchase and recipe units non-empty
pub fn validate_purchase(
    cost: Money,
    quantity: Decimal,
    purchase_unit: &str,
    recipe_unit: &str,
) -> ValidationResult<()> {
    if !cost.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "purchase cost".to_string(),
        });
    }

    if quantity <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "purchase quantity".to_string(),
        });
    }

    validate_unit("purchase unit", purchase_unit)?;
    validate_unit("recipe unit", recipe_unit)?;

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more line fits in the cart.
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: 0,
            max: MAX_CART_LINES as i64,
        });
    }

    Ok(())
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

    #[test]
    fn test_validate_name() {
        assert!(validate_name("recipe", "Chocolate Cake").is_ok());
        assert!(validate_name("recipe", "").is_err());
        assert!(validate_name("recipe", &"x".repeat(MAX_NAME_LEN + 1)).is_err());
        assert!(matches!(
            validate_name("modifier", "Cheese;Bacon"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_recipe_name() {
        assert!(validate_recipe_name("Cake").is_ok());
        assert!(validate_recipe_name("Ingredientes de Temporada").is_ok());
        for reserved in ["Ingrediente", " ingrediente ", "INGREDIENTE"] {
            assert!(matches!(
                validate_recipe_name(reserved),
                Err(ValidationError::InvalidFormat { .. })
            ));
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_component_quantity() {
        assert!(validate_component_quantity(dec!(0.5)).is_ok());
        assert!(validate_component_quantity(dec!(1000000)).is_ok());
        assert!(validate_component_quantity(Decimal::ZERO).is_err());
        assert!(matches!(
            validate_component_quantity(huge()),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_discount_percent() {
        assert!(validate_discount_percent(dec!(0)).is_ok());
        assert!(validate_discount_percent(dec!(100)).is_ok());
        assert!(validate_discount_percent(dec!(12.5)).is_ok());
        assert!(validate_discount_percent(dec!(-1)).is_err());
        assert!(validate_discount_percent(dec!(100.01)).is_err());
    }

    #[test]
    fn test_validate_purchase() {
        assert!(validate_purchase(Money::from_cents(2000), dec!(1000), "bag", "g").is_ok());
        assert!(validate_purchase(Money::zero(), dec!(1000), "bag", "g").is_err());
        assert!(validate_purchase(Money::from_cents(2000), dec!(0), "bag", "g").is_err());
        assert!(validate_purchase(Money::from_cents(2000), dec!(1000), " ", "g").is_err());
        assert!(validate_purchase(Money::from_cents(2000), dec!(1000), "bag", "").is_err());
    }

    #[test]
    fn test_validate_thresholds() {
        assert!(validate_thresholds(dec!(100), dec!(500)).is_ok());
        assert!(validate_thresholds(dec!(100), dec!(0)).is_ok());
        assert!(validate_thresholds(dec!(600), dec!(500)).is_err());
        assert!(validate_thresholds(dec!(-1), dec!(500)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price("price", Money::zero()).is_ok());
        assert!(validate_price("price", Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(0).is_ok());
        assert!(validate_cart_size(MAX_CART_LINES - 1).is_ok());
        assert!(validate_cart_size(MAX_CART_LINES).is_err());
    }
}

//! # Error Types
//!
//! Domain-specific error types for pantry-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pantry-core errors (this file)                                        │
//! │  ├── CoreError        - Domain errors (unknown names, cycles, cart)    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  pantry-store errors (separate crate)                                  │
//! │  └── StoreError       - Remote table store failures                    │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - What the operator sees (with ErrorCode)        │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → terminal               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, recipe path)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A cart line names a product that is neither a recipe nor an ingredient.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// A cart line selects a modifier that is not defined.
    #[error("Unknown modifier: {0}")]
    UnknownModifier(String),

    /// A recipe does not exist.
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    /// An ingredient does not exist.
    #[error("Ingredient not found: {0}")]
    IngredientNotFound(String),

    /// A component name is neither an ingredient nor a recipe.
    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    /// A recipe, modifier or product with that name already exists.
    #[error("{kind} '{name}' already exists")]
    Duplicate { kind: String, name: String },

    /// A recipe or modifier has no component with that name.
    #[error("'{owner}' has no component '{component}'")]
    ComponentNotFound { owner: String, component: String },

    /// The recipe graph loops back on itself.
    ///
    /// ## When This Occurs
    /// ```text
    /// Dough ──► Starter ──► Dough
    ///                         │
    ///                         ▼
    /// RecipeCycle { path: ["Dough", "Starter", "Dough"] }
    /// ```
    /// Raised by `Catalog::validate_recipe` before saving and by cost
    /// resolution / inventory deduction if a cycle slipped into the store.
    #[error("Recipe cycle detected: {}", path.join(" -> "))]
    RecipeCycle { path: Vec<String> },

    /// Sub-recipe nesting is deeper than `MAX_RECIPE_DEPTH`.
    #[error("Recipe '{name}' nests deeper than {max} levels")]
    RecipeTooDeep { name: String, max: usize },

    /// A cost or quantity grew past what a decimal can hold.
    ///
    /// Raised when stored quantities or costs are absurdly large (a cell
    /// like `1e20`); the named recipe, modifier or ingredient is the one
    /// being resolved when the arithmetic failed.
    #[error("Amount out of range while resolving '{name}'")]
    AmountOverflow { name: String },

    /// Checkout with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Cart line index out of range.
    #[error("Cart has no line {index}")]
    LineNotFound { index: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A cart line cannot be priced.
    #[error("Invalid line for '{product}': {reason}")]
    InvalidLine { product: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a cycle error from the current resolution path plus the
    /// name that closed the loop.
    pub fn cycle(path: &[String], closing: &str) -> Self {
        let mut path = path.to_vec();
        path.push(closing.to_string());
        CoreError::RecipeCycle { path }
    }

    /// True for errors caused by naming something that does not exist.
    pub fn is_unknown_name(&self) -> bool {
        matches!(
            self,
            CoreError::UnknownProduct(_)
                | CoreError::UnknownModifier(_)
                | CoreError::RecipeNotFound(_)
                | CoreError::IngredientNotFound(_)
                | CoreError::UnknownComponent(_)
                | CoreError::ComponentNotFound { .. }
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when operator input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., unparseable number or date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., an ingredient and a recipe with one name).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

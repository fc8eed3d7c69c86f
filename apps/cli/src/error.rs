//! # CLI Error Type
//!
//! Unified error type for every command.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Pantry POS                             │
//! │                                                                         │
//! │  pantry recipe add Cake Dough 1                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command handler → CliResult<()>                                 │  │
//! │  │         │                                                        │  │
//! │  │  Store error? ──── StoreError::Http { 500 } ─────┐               │  │
//! │  │         │                                        │               │  │
//! │  │  Core error?  ──── CoreError::RecipeCycle ───── CliError ───────►│  │
//! │  │         │                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: warning: [CYCLE] Recipe cycle detected: Cake -> Dough -> Cake  │
//! │  exit code 1                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! In the interactive shell the same message is printed and the shell keeps
//! running, except for `SESSION_EXPIRED`.

use std::fmt;

use serde::Serialize;

use pantry_core::{CoreError, ValidationError};
use pantry_store::StoreError;

use crate::config::ConfigError;

/// Error returned by every command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Message shown to the operator
    pub message: String,
}

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A named ingredient, recipe, modifier or product does not exist
    NotFound,

    /// Operator input failed validation
    ValidationError,

    /// The name is already taken
    Duplicate,

    /// The recipe graph would loop
    Cycle,

    /// The operation would break other data (e.g. deleting a used recipe)
    BusinessLogic,

    /// Cart operation failed
    CartError,

    /// The remote store could not be reached
    StoreUnavailable,

    /// The remote store answered with an error or bad data
    StoreError,

    /// The ledger was written but the inventory was not
    PartialCheckout,

    /// Unknown user or wrong password
    AuthFailed,

    /// The session timed out
    SessionExpired,

    /// The role may not run the command
    Forbidden,

    /// Configuration file or environment is invalid
    ConfigError,

    /// Terminal I/O failed
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::Duplicate => "DUPLICATE",
            ErrorCode::Cycle => "CYCLE",
            ErrorCode::BusinessLogic => "BUSINESS_LOGIC",
            ErrorCode::CartError => "CART_ERROR",
            ErrorCode::StoreUnavailable => "STORE_UNAVAILABLE",
            ErrorCode::StoreError => "STORE_ERROR",
            ErrorCode::PartialCheckout => "PARTIAL_CHECKOUT",
            ErrorCode::AuthFailed => "AUTH_FAILED",
            ErrorCode::SessionExpired => "SESSION_EXPIRED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// Process exit status for one-shot commands.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCode::AuthFailed | ErrorCode::SessionExpired | ErrorCode::Forbidden => 3,
            ErrorCode::ConfigError => 4,
            ErrorCode::StoreUnavailable | ErrorCode::StoreError | ErrorCode::PartialCheckout => 5,
            _ => 1,
        }
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(kind: &str, name: &str) -> Self {
        CliError::new(ErrorCode::NotFound, format!("{kind} not found: {name}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    pub fn business(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::BusinessLogic, message)
    }

    pub fn auth_failed() -> Self {
        CliError::new(ErrorCode::AuthFailed, "Unknown user or wrong password")
    }

    pub fn forbidden(role: impl fmt::Display, action: &str) -> Self {
        CliError::new(ErrorCode::Forbidden, format!("Role '{role}' may not {action}"))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            e if e.is_unknown_name() => ErrorCode::NotFound,
            CoreError::Duplicate { .. } => ErrorCode::Duplicate,
            CoreError::RecipeCycle { .. } | CoreError::RecipeTooDeep { .. } => ErrorCode::Cycle,
            CoreError::EmptyCart | CoreError::CartTooLarge { .. } | CoreError::LineNotFound { .. } => {
                ErrorCode::CartError
            }
            CoreError::QuantityTooLarge { .. } | CoreError::InvalidLine { .. } | CoreError::Validation(_) => {
                ErrorCode::ValidationError
            }
            _ => ErrorCode::BusinessLogic,
        };
        CliError::new(code, err.to_string())
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Store operation failed");
        let code = if err.is_unreachable() {
            ErrorCode::StoreUnavailable
        } else if matches!(err, StoreError::BadEndpoint { .. }) {
            ErrorCode::ConfigError
        } else {
            ErrorCode::StoreError
        };
        CliError::new(code, err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::internal(format!("Terminal I/O failed: {err}"))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("JSON output failed: {err}"))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for commands.
pub type CliResult<T> = Result<T, CliError>;

//! # Store Error Types
//!
//! Error types for remote table store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  reqwest::Error / HTTP status / serde_json::Error                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds resource name and categorization      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError (in the app) ← Error code + message for the operator         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Remote table store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The endpoint in the configuration is not a usable http(s) URL.
    #[error("Invalid store endpoint '{endpoint}': {reason}")]
    BadEndpoint { endpoint: String, reason: String },

    /// The request could not be sent or the connection dropped.
    #[error("Network error on {resource}: {message}")]
    Network { resource: String, message: String },

    /// The store did not answer within the configured timeout.
    #[error("Timed out waiting for {resource}")]
    Timeout { resource: String },

    /// The store answered with a non-success status.
    ///
    /// ## When This Occurs
    /// - 404: the resource name is wrong
    /// - 401/403: the worker rejected the request
    /// - 5xx: the worker failed
    #[error("Store returned HTTP {status} for {resource}: {body}")]
    Http {
        resource: String,
        status: u16,
        body: String,
    },

    /// The body was not a JSON array of row objects.
    #[error("Malformed data in {resource}: {reason}")]
    Malformed { resource: String, reason: String },
}

impl StoreError {
    /// Creates a Malformed error for a resource.
    pub fn malformed(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Malformed {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    /// Categorizes a reqwest failure.
    pub fn from_reqwest(resource: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout {
                resource: resource.to_string(),
            }
        } else if err.is_decode() {
            StoreError::malformed(resource, err.to_string())
        } else {
            StoreError::Network {
                resource: resource.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// True when the store could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, StoreError::Network { .. } | StoreError::Timeout { .. })
    }

    /// HTTP status, if the store answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_resource() {
        let err = StoreError::Http {
            resource: "Recetas".into(),
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "Store returned HTTP 500 for Recetas: boom");
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_unreachable());

        let err = StoreError::Timeout {
            resource: "Inventario".into(),
        };
        assert!(err.is_unreachable());
        assert_eq!(err.status(), None);
    }
}

//! # Store Client
//!
//! HTTP access to the remote table store.
//!
//! ## Wire Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  read_table("Inventario")                                               │
//! │     GET {endpoint}/Inventario                                           │
//! │     200 [{"Ingrediente": "Flour", "Stock Actual": "1500.0000", ...}]    │
//! │     200 null / empty body     → no rows                                 │
//! │     200 {"not": "an array"}   → StoreError::Malformed                   │
//! │     404 / 500                 → StoreError::Http                        │
//! │                                                                         │
//! │  write_table("Inventario", rows)                                        │
//! │     PUT (or POST) {endpoint}/Inventario   body: JSON array of rows      │
//! │     The whole resource is replaced.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::row::Row;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Configuration
// =============================================================================

/// HTTP verb used to replace a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMethod {
    #[default]
    Put,
    Post,
}

/// Store client configuration.
///
/// ## Example
/// ```rust
/// use pantry_store::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::new("https://tables.example.com")
///     .timeout(Duration::from_secs(5));
/// assert_eq!(config.timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL; resources are addressed as `{endpoint}/{resource}`.
    pub endpoint: String,

    /// Per-request timeout.
    /// Default: 10 seconds
    pub timeout: Duration,

    /// Verb used by `write_table`.
    /// Default: PUT
    pub write_method: WriteMethod,
}

impl StoreConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        StoreConfig {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            write_method: WriteMethod::Put,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn write_method(mut self, method: WriteMethod) -> Self {
        self.write_method = method;
        self
    }
}

/// Checks that `endpoint` is an absolute http(s) URL.
pub fn validate_endpoint(endpoint: &str) -> StoreResult<Url> {
    let bad = |reason: String| StoreError::BadEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    let url = Url::parse(endpoint.trim()).map_err(|e| bad(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(bad(format!("unsupported scheme '{other}'"))),
    }
}

// =============================================================================
// Client
// =============================================================================

/// Reads and replaces whole tables on the remote store.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: Client,
    endpoint: String,
    write_method: WriteMethod,
}

impl StoreClient {
    /// Creates a client after validating the endpoint.
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        validate_endpoint(&config.endpoint)?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::BadEndpoint {
                endpoint: config.endpoint.clone(),
                reason: e.to_string(),
            })?;

        debug!(
            endpoint = %config.endpoint,
            timeout_secs = config.timeout.as_secs(),
            write_method = ?config.write_method,
            "Store client ready"
        );

        Ok(StoreClient {
            http,
            endpoint: config.endpoint.trim().trim_end_matches('/').to_string(),
            write_method: config.write_method,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.endpoint, resource.trim_start_matches('/'))
    }

    /// Fetches every row of a resource.
    ///
    /// Column names are trimmed. A `null` or empty body is an empty table.
    pub async fn read_table(&self, resource: &str) -> StoreResult<Vec<Row>> {
        let url = self.url(resource);
        debug!(%resource, %url, "Reading table");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::from_reqwest(resource, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::from_reqwest(resource, e))?;

        if !status.is_success() {
            warn!(%resource, status = status.as_u16(), "Table read rejected");
            return Err(StoreError::Http {
                resource: resource.to_string(),
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        let rows = parse_rows(resource, &body)?;
        debug!(%resource, rows = rows.len(), "Table read");
        Ok(rows)
    }

    /// Replaces a resource with `rows`.
    pub async fn write_table(&self, resource: &str, rows: &[Row]) -> StoreResult<()> {
        let url = self.url(resource);
        debug!(%resource, rows = rows.len(), method = ?self.write_method, "Writing table");

        let request = match self.write_method {
            WriteMethod::Put => self.http.put(&url),
            WriteMethod::Post => self.http.post(&url),
        };

        let response = request
            .json(rows)
            .send()
            .await
            .map_err(|e| StoreError::from_reqwest(resource, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%resource, status = status.as_u16(), "Table write rejected");
            return Err(StoreError::Http {
                resource: resource.to_string(),
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        Ok(())
    }
}

/// Decodes a response body into rows with trimmed column names.
pub fn parse_rows(resource: &str, body: &str) -> StoreResult<Vec<Row>> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| StoreError::malformed(resource, e.to_string()))?;

    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => {
            return Err(StoreError::malformed(
                resource,
                format!("expected an array of rows, got {}", kind_of(&other)),
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map
                .into_iter()
                .map(|(column, cell)| (column.trim().to_string(), cell))
                .collect()),
            other => Err(StoreError::malformed(
                resource,
                format!("row {index} is {}, not an object", kind_of(&other)),
            )),
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn truncate(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_rows_trims_columns() {
        let rows = parse_rows("Inventario", r#"[{" Ingrediente ": "Flour", "Stock Actual": 10}]"#).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Ingrediente"), Some(&json!("Flour")));
        assert_eq!(rows[0].get("Stock Actual"), Some(&json!(10)));
    }

    #[test]
    fn test_parse_rows_empty_bodies() {
        assert!(parse_rows("Recetas", "").unwrap().is_empty());
        assert!(parse_rows("Recetas", "null").unwrap().is_empty());
        assert!(parse_rows("Recetas", "[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rows_rejects_non_tables() {
        assert!(matches!(
            parse_rows("Recetas", r#"{"a": 1}"#),
            Err(StoreError::Malformed { .. })
        ));
        assert!(matches!(
            parse_rows("Recetas", r#"[{"a": 1}, 3]"#),
            Err(StoreError::Malformed { .. })
        ));
        assert!(matches!(
            parse_rows("Recetas", "not json"),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn test_validate_endpoint() {
        assert!(validate_endpoint("https://tables.example.com").is_ok());
        assert!(validate_endpoint("http://localhost:8787/").is_ok());
        assert!(validate_endpoint("ftp://example.com").is_err());
        assert!(validate_endpoint("not a url").is_err());
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = StoreClient::new(StoreConfig::new("http://localhost:8787/")).unwrap();
        assert_eq!(client.url("Recetas"), "http://localhost:8787/Recetas");
        assert_eq!(client.endpoint(), "http://localhost:8787");
    }

    #[test]
    fn test_truncate_long_bodies() {
        let long = "x".repeat(500);
        assert_eq!(truncate(&long).len(), 203);
        assert_eq!(truncate("short"), "short");
    }
}

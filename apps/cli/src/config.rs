//! # Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`PANTRY_*`)
//! 2. Config file (`pantry.toml`)
//! 3. Defaults (this file)
//!
//! ## Example `pantry.toml`
//! ```toml
//! [store]
//! endpoint = "https://tables.example.com/api"
//! timeout_secs = 10
//! write_method = "put"
//!
//! [sales]
//! card_commission_bps = 350
//! vat_bps = 1600
//!
//! [session]
//! timeout_mins = 5
//!
//! [users.ana]
//! password_hash = "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
//! role = "admin"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use pantry_core::sale::SaleSettings;
use pantry_core::{Rate, DEFAULT_CARD_COMMISSION_BPS, DEFAULT_VAT_BPS, LEDGER_DATE_FORMAT};
use pantry_store::client::{validate_endpoint, DEFAULT_TIMEOUT_SECS};
use pantry_store::{Resources, StoreConfig, WriteMethod};

/// Config file name inside the platform config folder.
pub const CONFIG_FILE: &str = "pantry.toml";

/// Minutes of inactivity before the shell session ends.
pub const DEFAULT_SESSION_TIMEOUT_MINS: u64 = 5;

// =============================================================================
// Sections
// =============================================================================

/// Full application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreSection,
    pub resources: Resources,
    pub sales: SalesSection,
    pub session: SessionSection,
    /// User name → credential.
    pub users: BTreeMap<String, UserEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Base URL of the table store.
    pub endpoint: String,
    pub timeout_secs: u64,
    pub write_method: WriteMethod,
}

impl Default for StoreSection {
    fn default() -> Self {
        StoreSection {
            endpoint: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            write_method: WriteMethod::Put,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesSection {
    /// Base card commission in basis points (350 = 3.5%).
    pub card_commission_bps: u32,
    /// VAT charged on the commission, in basis points.
    pub vat_bps: u32,
    /// chrono format of ledger dates.
    pub date_format: String,
}

impl Default for SalesSection {
    fn default() -> Self {
        SalesSection {
            card_commission_bps: DEFAULT_CARD_COMMISSION_BPS,
            vat_bps: DEFAULT_VAT_BPS,
            date_format: LEDGER_DATE_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub timeout_mins: u64,
}

impl Default for SessionSection {
    fn default() -> Self {
        SessionSection {
            timeout_mins: DEFAULT_SESSION_TIMEOUT_MINS,
        }
    }
}

/// A login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEntry {
    /// SHA-256 of the password, hex encoded.
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
}

/// What a user may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Everything.
    Admin,
    /// Sell, use the cart and view history without money columns.
    #[default]
    Seller,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Seller => f.write_str("seller"),
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid config file {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

// =============================================================================
// Loading
// =============================================================================

impl AppConfig {
    /// Loads defaults, then the file, then environment overrides, and
    /// validates the result.
    ///
    /// The file is `explicit`, else `PANTRY_CONFIG`, else the platform
    /// config folder. A missing default file is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env = |key: &str| std::env::var(key).ok();

        let (path, required) = match explicit
            .map(Path::to_path_buf)
            .or_else(|| env("PANTRY_CONFIG").map(PathBuf::from))
        {
            Some(path) => (Some(path), true),
            None => (default_path(), false),
        };

        let mut config = match path {
            Some(path) if required || path.exists() => AppConfig::from_file(&path)?,
            _ => AppConfig::default(),
        };

        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = AppConfig::from_toml(&text).map_err(|reason| ConfigError::Parse {
            path: path.display().to_string(),
            reason,
        })?;
        debug!(path = %path.display(), users = config.users.len(), "Config file loaded");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// Applies `PANTRY_ENDPOINT`, `PANTRY_TIMEOUT_SECS` and
    /// `PANTRY_SESSION_TIMEOUT_MINS` from `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(endpoint) = lookup("PANTRY_ENDPOINT") {
            self.store.endpoint = endpoint;
        }
        if let Some(raw) = lookup("PANTRY_TIMEOUT_SECS") {
            self.store.timeout_secs = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PANTRY_TIMEOUT_SECS".into()))?;
        }
        if let Some(raw) = lookup("PANTRY_SESSION_TIMEOUT_MINS") {
            self.session.timeout_mins = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PANTRY_SESSION_TIMEOUT_MINS".into()))?;
        }
        Ok(())
    }

    /// Checks the endpoint, timeouts, rates and the user table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingRequired("store.endpoint (or PANTRY_ENDPOINT)".into()));
        }
        validate_endpoint(&self.store.endpoint)
            .map_err(|e| ConfigError::InvalidValue(format!("store.endpoint: {e}")))?;

        if self.store.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("store.timeout_secs".into()));
        }
        if self.session.timeout_mins == 0 {
            return Err(ConfigError::InvalidValue("session.timeout_mins".into()));
        }
        if self.sales.card_commission_bps > Rate::FULL.bps() || self.sales.vat_bps > Rate::FULL.bps() {
            return Err(ConfigError::InvalidValue("sales rates must be at most 10000 bps".into()));
        }
        if self.sales.date_format.trim().is_empty() {
            return Err(ConfigError::InvalidValue("sales.date_format".into()));
        }

        if self.users.is_empty() {
            return Err(ConfigError::MissingRequired("at least one [users.<name>] entry".into()));
        }
        for (name, user) in &self.users {
            let hash = user.password_hash.trim();
            if hash.len() != 64 || hex::decode(hash).is_err() {
                return Err(ConfigError::InvalidValue(format!(
                    "users.{name}.password_hash (expected 64 hex characters)"
                )));
            }
        }
        Ok(())
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.store.endpoint.trim())
            .timeout(Duration::from_secs(self.store.timeout_secs))
            .write_method(self.store.write_method)
    }

    pub fn sale_settings(&self) -> SaleSettings {
        SaleSettings::from_rates(
            Rate::from_bps(self.sales.card_commission_bps),
            Rate::from_bps(self.sales.vat_bps),
        )
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session.timeout_mins * 60)
    }
}

/// `pantry.toml` in the platform config folder.
///
/// - **macOS**: `~/Library/Application Support/com.pantry.pos/pantry.toml`
/// - **Windows**: `%APPDATA%\pantry\pos\config\pantry.toml`
/// - **Linux**: `~/.config/pos/pantry.toml`
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "pantry", "pos").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

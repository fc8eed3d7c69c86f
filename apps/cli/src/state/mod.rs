//! # State Module
//!
//! What a command needs besides its own arguments.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │   AppContext     │  │    Session       │  │    CartState         │  │
//! │  │                  │  │                  │  │                      │  │
//! │  │  AppConfig       │  │  user, role      │  │  Cart (shell only)   │  │
//! │  │  Store (tables)  │  │  last activity   │  │  opened_at           │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  One-shot commands: AppContext + Session                                │
//! │  Shell:             AppContext + Session + CartState, for the loop      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod session;

pub use cart::{CartRow, CartState, CartView};
pub use session::{hash_password, Action, Session};

use chrono::{Local, NaiveDate};

use pantry_core::sale::SaleSettings;
use pantry_store::Store;

use crate::config::AppConfig;
use crate::error::CliResult;

/// Validated configuration plus the store built from it.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub store: Store,
}

impl AppContext {
    pub fn from_config(config: AppConfig) -> CliResult<Self> {
        let store = Store::new(config.store_config(), config.resources.clone())?
            .with_date_format(config.sales.date_format.clone());
        Ok(AppContext { config, store })
    }

    pub fn sale_settings(&self) -> SaleSettings {
        self.config.sale_settings()
    }

    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

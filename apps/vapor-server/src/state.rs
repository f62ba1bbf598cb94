//! Shared application state handed to every handler.

use std::sync::Arc;

use vapor_core::types::TaxRate;
use vapor_db::Database;

use crate::config::ServerConfig;

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    pub db: Database,
    pub tax_rate: TaxRate,
    pub enforce_totals: bool,
}

/// What the router carries; cloned per request.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// State with the default tax rate and client totals trusted as sent.
    pub fn new(db: Database) -> Self {
        AppState {
            db,
            tax_rate: TaxRate::default(),
            enforce_totals: false,
        }
    }

    pub fn from_config(db: Database, config: &ServerConfig) -> Self {
        AppState {
            db,
            tax_rate: config.tax_rate,
            enforce_totals: config.enforce_totals,
        }
    }

    /// Turns on server-side total verification at `rate`.
    pub fn with_enforced_totals(mut self, rate: TaxRate) -> Self {
        self.tax_rate = rate;
        self.enforce_totals = true;
        self
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}

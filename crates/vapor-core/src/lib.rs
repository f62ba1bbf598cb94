//! # vapor-core: Pure Business Logic for Vapor POS
//!
//! Everything the point-of-sale backend decides without touching a database
//! lives here: money parsing, bill request validation, calendar windows and
//! the sales report math.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vapor POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web UI (POS / Dashboard)                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vapor-server (axum)                          │   │
//! │  │        POST /bills, GET /bills, GET /reports                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vapor-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  period   │  │  report   │  │   │
//! │  │   │  Product  │  │   Money   │  │ DayWindow │  │SalesTally │  │   │
//! │  │   │   Bill    │  │  TaxRate  │  │ReportRange│  │ TopItem   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vapor-db (Database Layer)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Bill, BillItem, PaymentMethod)
//! - [`money`] - Money type with integer arithmetic and decimal parsing
//! - [`error`] - Domain error types
//! - [`validation`] - Bill request validation
//! - [`period`] - Calendar day filters and report ranges
//! - [`report`] - Sales aggregation
//!
//! ## Example Usage
//!
//! ```rust
//! use vapor_core::money::Money;
//! use vapor_core::types::TaxRate;
//!
//! let subtotal: Money = "150".parse().unwrap();
//! let tax = subtotal.calculate_tax(TaxRate::from_bps(500)); // 5%
//!
//! assert_eq!(tax.cents(), 750);
//! assert_eq!((subtotal + tax).to_string(), "₹157.50");
//! ```

pub mod error;
pub mod money;
pub mod period;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tax rate applied at the counter (5% GST on food service).
pub const DEFAULT_TAX_RATE_BPS: u32 = 500;

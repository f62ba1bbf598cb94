//! # vapor-server: HTTP API for Vapor POS
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vapor POS Server                                 │
//! │                                                                         │
//! │  POS screen / Dashboard ───► HTTP (3000) ───► routes ───► SQLite        │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                                    vapor-core (validation, reports)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The binary in `main.rs` owns the lifecycle: it loads [`ServerConfig`],
//! opens the [`Database`](vapor_db::Database), serves [`build_router`] and
//! closes the pool after a graceful shutdown.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::build_router;
pub use state::{AppState, SharedState};

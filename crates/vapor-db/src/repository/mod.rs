//! # Repository Module
//!
//! Database repository implementations for Vapor POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.bills().create(&new_bill)                                  │
//! │       ▼                                                                 │
//! │  BillRepository                                                        │
//! │  ├── create(&self, bill)        one transaction                        │
//! │  ├── list(&self, day)           joined with current products           │
//! │  └── list_since(&self, start)   raw bills for reports                  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Catalog lookups and seeding
//! - [`BillRepository`](bill::BillRepository) - Bill creation and listing
//! - [`ReportRepository`](report::ReportRepository) - Sales reports

pub mod bill;
pub mod product;
pub mod report;

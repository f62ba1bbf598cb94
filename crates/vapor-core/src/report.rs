//! # Report Module
//!
//! Sales aggregation over a set of bills.
//!
//! ## Aggregation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  bills in window (from vapor-db)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SalesTally::from_bills                                                 │
//! │  ├── total_bills  += 1               per bill                           │
//! │  ├── total_sales  += total_amount    stored value, checked add          │
//! │  └── quantities[product_id] += qty   per item, checked add              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  top_product()   highest quantity, ties → smallest product id           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  summarize(current product record)  → SalesSummary                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The top product's *current* name is looked up by the caller. If the
//! product was deleted, the summary reports no top item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::period::ReportWindow;
use crate::types::{Bill, Product};

// =============================================================================
// Report Types
// =============================================================================

/// Response of `GET /reports`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesReport {
    #[ts(as = "String")]
    pub start_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub end_date: DateTime<Utc>,
    pub summary: SalesSummary,
}

impl SalesReport {
    pub fn new(window: ReportWindow, summary: SalesSummary) -> Self {
        SalesReport {
            start_date: window.start,
            end_date: window.end,
            summary,
        }
    }
}

/// Revenue figures for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesSummary {
    #[ts(type = "number")]
    pub total_sales: Money,
    #[ts(type = "number")]
    pub total_bills: i64,
    pub top_item: Option<TopItem>,
}

/// Best seller by quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TopItem {
    pub name: String,
    #[ts(type = "number")]
    pub quantity_sold: i64,
}

// =============================================================================
// Sales Tally
// =============================================================================

/// Running totals for a report.
///
/// Every sum is checked: stored totals are whatever the till submitted, so a
/// long window can add up past the i64 paise range.
///
/// ```rust
/// use vapor_core::money::Money;
/// use vapor_core::report::SalesTally;
///
/// let mut tally = SalesTally::default();
/// tally.record_bill(Money::from_major(100), [("A", 2)]).unwrap();
/// tally.record_bill(Money::from_major(50), [("A", 1), ("B", 5)]).unwrap();
///
/// assert_eq!(tally.total_bills(), 2);
/// assert_eq!(tally.total_sales(), Money::from_major(150));
/// assert_eq!(tally.top_product(), Some(("B", 5)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesTally {
    total_sales: Money,
    total_bills: i64,
    // BTreeMap so iteration, and therefore the tie-break, is ordered by id
    quantities: BTreeMap<String, i64>,
}

impl SalesTally {
    /// Tallies a slice of bills with their items.
    pub fn from_bills<'a>(bills: impl IntoIterator<Item = &'a Bill>) -> CoreResult<Self> {
        let mut tally = SalesTally::default();
        for bill in bills {
            tally.record_bill(
                bill.total_amount,
                bill.items
                    .iter()
                    .map(|item| (item.product_id.as_str(), item.quantity)),
            )?;
        }
        Ok(tally)
    }

    /// Adds one bill and its `(product_id, quantity)` lines.
    ///
    /// On overflow the tally is left partly updated; callers discard it.
    pub fn record_bill<'a>(
        &mut self,
        total_amount: Money,
        items: impl IntoIterator<Item = (&'a str, i64)>,
    ) -> CoreResult<()> {
        self.total_sales = self
            .total_sales
            .checked_add(total_amount)
            .ok_or_else(|| overflow("totalSales"))?;
        self.total_bills += 1;

        for (product_id, quantity) in items {
            let sold = self.quantities.entry(product_id.to_string()).or_insert(0);
            *sold = sold
                .checked_add(quantity)
                .ok_or_else(|| overflow("quantitySold"))?;
        }
        Ok(())
    }

    pub fn total_sales(&self) -> Money {
        self.total_sales
    }

    pub fn total_bills(&self) -> i64 {
        self.total_bills
    }

    /// Product with the highest quantity. Equal quantities resolve to the
    /// lexicographically smallest product id. `None` when nothing was sold.
    pub fn top_product(&self) -> Option<(&str, i64)> {
        self.quantities
            .iter()
            .fold(None, |best, (id, &qty)| match best {
                Some((_, best_qty)) if best_qty >= qty => best,
                _ => Some((id.as_str(), qty)),
            })
    }

    /// Builds the summary. `top` is the current record of [`top_product`]'s
    /// id, or `None` if it no longer exists.
    ///
    /// [`top_product`]: SalesTally::top_product
    pub fn summarize(&self, top: Option<&Product>) -> SalesSummary {
        let top_item = match (self.top_product(), top) {
            (Some((id, quantity_sold)), Some(product)) if product.id == id => Some(TopItem {
                name: product.name.clone(),
                quantity_sold,
            }),
            _ => None,
        };

        SalesSummary {
            total_sales: self.total_sales,
            total_bills: self.total_bills,
            top_item,
        }
    }
}

fn overflow(what: &str) -> CoreError {
    CoreError::AmountOverflow {
        what: what.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

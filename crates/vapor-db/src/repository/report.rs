//! # Report Repository
//!
//! Loads the bills of a report window and hands them to
//! [`SalesTally`](vapor_core::report::SalesTally). The math lives in
//! vapor-core; this file only does the I/O around it.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::bill::BillRepository;
use crate::repository::product::ProductRepository;
use vapor_core::period::ReportWindow;
use vapor_core::report::{SalesReport, SalesTally};

/// Repository for sales reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Computes the sales report for `window`.
    ///
    /// ## Steps
    /// 1. Scan bills with `created_at >= window.start`
    /// 2. Tally totals and per-product quantities
    /// 3. Look up the top product's current record for its name
    ///
    /// Any storage error aborts the whole report, as does a total that no
    /// longer fits in i64 paise (`DbError::Aggregation`).
    pub async fn compute(&self, window: &ReportWindow) -> DbResult<SalesReport> {
        let bills = BillRepository::new(self.pool.clone())
            .list_since(window.start)
            .await?;

        let tally = SalesTally::from_bills(&bills)?;

        let top_product = match tally.top_product() {
            Some((product_id, _)) => {
                ProductRepository::new(self.pool.clone())
                    .get_by_id(product_id)
                    .await?
            }
            None => None,
        };

        let summary = tally.summarize(top_product.as_ref());

        debug!(
            start = %window.start,
            total_bills = summary.total_bills,
            total_sales = %summary.total_sales,
            top_item = ?summary.top_item.as_ref().map(|t| t.name.as_str()),
            "Computed sales report"
        );

        Ok(SalesReport::new(*window, summary))
    }
}

//! # Bill Repository
//!
//! Database operations for bills and bill items.
//!
//! ## Bill Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       create(&NewBill)                                  │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT bills       (id, total, payment method, created_at)          │
//! │    INSERT bill_items  × N  (price copied from the cart line)            │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure ──► ROLLBACK: neither the bill nor any item is visible    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! The unit price on each line is frozen at sale time. Listings join the
//! *current* product row for name and category, so a product deleted since
//! shows up as `product: None` while the line itself stays intact.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::timestamp;
use vapor_core::period::{truncate_to_millis, DayWindow};
use vapor_core::{
    Bill, BillItem, BillItemWithProduct, BillWithProducts, Category, Money, NewBill,
    PaymentMethod, Product,
};

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct BillRow {
    id: String,
    total_amount_cents: i64,
    payment_method: PaymentMethod,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct BillItemRow {
    id: String,
    bill_id: String,
    product_id: String,
    quantity: i64,
    price_cents: i64,
}

/// Rows that belong to a bill, for grouping item rows under their bill.
trait ItemRow {
    fn bill_id(&self) -> &str;
}

impl ItemRow for BillItemRow {
    fn bill_id(&self) -> &str {
        &self.bill_id
    }
}

impl From<BillItemRow> for BillItem {
    fn from(row: BillItemRow) -> Self {
        BillItem {
            id: row.id,
            bill_id: row.bill_id,
            product_id: row.product_id,
            quantity: row.quantity,
            price: Money::from_cents(row.price_cents),
        }
    }
}

/// A bill item LEFT JOINed with its product. Product columns are all NULL
/// when the product no longer exists.
#[derive(Debug, sqlx::FromRow)]
struct BillItemProductRow {
    #[sqlx(flatten)]
    item: BillItemRow,
    product_ref: Option<String>,
    product_name: Option<String>,
    product_category: Option<Category>,
    product_price_cents: Option<i64>,
    product_is_available: Option<bool>,
}

impl ItemRow for BillItemProductRow {
    fn bill_id(&self) -> &str {
        &self.item.bill_id
    }
}

impl From<BillItemProductRow> for BillItemWithProduct {
    fn from(row: BillItemProductRow) -> Self {
        let product = match (
            row.product_ref,
            row.product_name,
            row.product_category,
            row.product_price_cents,
            row.product_is_available,
        ) {
            (Some(id), Some(name), Some(category), Some(price_cents), Some(is_available)) => {
                Some(Product {
                    id,
                    name,
                    category,
                    price: Money::from_cents(price_cents),
                    is_available,
                })
            }
            _ => None,
        };

        BillItemWithProduct {
            item: row.item.into(),
            product,
        }
    }
}

const SELECT_BILLS: &str = r#"
    SELECT id, total_amount_cents, payment_method, created_at
    FROM bills
    WHERE (?1 IS NULL OR created_at >= ?1)
      AND (?2 IS NULL OR created_at <= ?2)
    ORDER BY created_at DESC, id ASC
"#;

/// Item rows only, for the report scan, which never needs product columns.
const SELECT_ITEMS: &str = r#"
    SELECT bi.id, bi.bill_id, bi.product_id, bi.quantity, bi.price_cents
    FROM bill_items bi
    INNER JOIN bills b ON b.id = bi.bill_id
    WHERE (?1 IS NULL OR b.created_at >= ?1)
      AND (?2 IS NULL OR b.created_at <= ?2)
    ORDER BY bi.bill_id, bi.position
"#;

const SELECT_ITEMS_WITH_PRODUCTS: &str = r#"
    SELECT
        bi.id,
        bi.bill_id,
        bi.product_id,
        bi.quantity,
        bi.price_cents,
        p.id           AS product_ref,
        p.name         AS product_name,
        p.category     AS product_category,
        p.price_cents  AS product_price_cents,
        p.is_available AS product_is_available
    FROM bill_items bi
    INNER JOIN bills b ON b.id = bi.bill_id
    LEFT JOIN products p ON p.id = bi.product_id
    WHERE (?1 IS NULL OR b.created_at >= ?1)
      AND (?2 IS NULL OR b.created_at <= ?2)
    ORDER BY bi.bill_id, bi.position
"#;

// =============================================================================
// Repository
// =============================================================================

/// Repository for bill database operations.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Creates a new BillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    /// Persists a validated bill and all its items in one transaction.
    ///
    /// ## Returns
    /// The stored bill with generated ids and `created_at`, items in cart
    /// order.
    ///
    /// ## Errors
    /// Nothing is written if any insert fails. A bill without items is
    /// rejected before the transaction starts.
    pub async fn create(&self, new_bill: &NewBill) -> DbResult<Bill> {
        if new_bill.items.is_empty() {
            return Err(DbError::CheckViolation {
                message: "bill must have at least one item".to_string(),
            });
        }

        let bill_id = Uuid::new_v4().to_string();
        let bill = Bill {
            id: bill_id.clone(),
            total_amount: new_bill.total_amount,
            payment_method: new_bill.payment_method,
            created_at: truncate_to_millis(Utc::now()),
            items: new_bill
                .items
                .iter()
                .map(|line| BillItem {
                    id: Uuid::new_v4().to_string(),
                    bill_id: bill_id.clone(),
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                    price: line.price,
                })
                .collect(),
        };

        debug!(
            id = %bill.id,
            items = bill.items.len(),
            payment_method = %bill.payment_method,
            "Creating bill"
        );

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        if let Err(e) = insert_bill(&mut tx, &bill).await {
            warn!(id = %bill.id, error = %e, "Bill insert failed, rolling back");
            if let Err(rollback_err) = tx.rollback().await {
                error!(id = %bill.id, error = %rollback_err, "Rollback failed");
            }
            return Err(e);
        }

        tx.commit().await.map_err(DbError::transaction)?;

        info!(
            id = %bill.id,
            items = bill.items.len(),
            total = %bill.total_amount,
            "Bill created"
        );

        Ok(bill)
    }

    /// Lists bills, newest first, each item joined to its current product.
    ///
    /// ## Arguments
    /// * `day` - Restrict to one calendar day (both ends inclusive), or
    ///   `None` for every bill
    pub async fn list(&self, day: Option<&DayWindow>) -> DbResult<Vec<BillWithProducts>> {
        let (from, to) = day
            .map(|w| (timestamp::to_sql(w.start), timestamp::to_sql(w.end)))
            .unzip();

        debug!(from = ?from, to = ?to, "Listing bills");

        let (rows, mut items) = self
            .fetch::<BillItemProductRow>(SELECT_ITEMS_WITH_PRODUCTS, from, to)
            .await?;

        let bills: Vec<BillWithProducts> = rows
            .into_iter()
            .map(|row| BillWithProducts {
                items: items
                    .remove(&row.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(BillItemWithProduct::from)
                    .collect(),
                id: row.id,
                total_amount: Money::from_cents(row.total_amount_cents),
                payment_method: row.payment_method,
                created_at: row.created_at,
            })
            .collect();

        debug!(count = bills.len(), "Listed bills");
        Ok(bills)
    }

    /// Lists every bill created at or after `start`, newest first, with
    /// their items. Used by the report scan.
    pub async fn list_since(&self, start: DateTime<Utc>) -> DbResult<Vec<Bill>> {
        let from = timestamp::to_sql(start);
        debug!(from = %from, "Scanning bills");

        let (rows, mut items) = self
            .fetch::<BillItemRow>(SELECT_ITEMS, Some(from), None)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Bill {
                items: items
                    .remove(&row.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(BillItem::from)
                    .collect(),
                id: row.id,
                total_amount: Money::from_cents(row.total_amount_cents),
                payment_method: row.payment_method,
                created_at: row.created_at,
            })
            .collect())
    }

    /// Counts all bills.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Reads bill rows and the item rows selected by `items_sql` from one
    /// snapshot, items grouped by bill id.
    async fn fetch<T>(
        &self,
        items_sql: &'static str,
        from: Option<String>,
        to: Option<String>,
    ) -> DbResult<(Vec<BillRow>, HashMap<String, Vec<T>>)>
    where
        T: ItemRow + for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let bills: Vec<BillRow> = sqlx::query_as(SELECT_BILLS)
            .bind(from.as_deref())
            .bind(to.as_deref())
            .fetch_all(&mut *tx)
            .await?;

        let rows: Vec<T> = sqlx::query_as(items_sql)
            .bind(from.as_deref())
            .bind(to.as_deref())
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await.map_err(DbError::transaction)?;

        let mut items: HashMap<String, Vec<T>> = HashMap::new();
        for row in rows {
            items.entry(row.bill_id().to_string()).or_default().push(row);
        }

        Ok((bills, items))
    }
}

/// Writes the bill row and its item rows on an open transaction.
async fn insert_bill(conn: &mut SqliteConnection, bill: &Bill) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO bills (id, total_amount_cents, payment_method, created_at)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&bill.id)
    .bind(bill.total_amount.cents())
    .bind(bill.payment_method)
    .bind(timestamp::to_sql(bill.created_at))
    .execute(&mut *conn)
    .await?;

    for (position, item) in bill.items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO bill_items (id, bill_id, product_id, quantity, price_cents, position)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&item.id)
        .bind(&item.bill_id)
        .bind(&item.product_id)
        .bind(item.quantity)
        .bind(item.price.cents())
        .bind(position as i64)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

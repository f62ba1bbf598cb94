//! # Schema Migrations
//!
//! SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied in version order when the pool opens. sqlx records each applied
//! version and its checksum in `_sqlx_migrations`, so editing a file that has
//! already shipped makes startup fail; add `002_...sql` instead.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every embedded migration not yet recorded.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Applying migrations");
    MIGRATOR.run(pool).await?;
    info!(version = ?latest_version(), "Schema up to date");
    Ok(())
}

/// Highest embedded migration version, e.g. `1` for `001_initial_schema.sql`.
pub fn latest_version() -> Option<i64> {
    MIGRATOR.iter().map(|m| m.version).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn applied(db: &Database) -> (i64, Option<i64>) {
        sqlx::query_as("SELECT COUNT(*), MAX(version) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_schema_is_current_and_rerun_is_noop() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let embedded = MIGRATOR.migrations.len() as i64;
        assert_eq!(applied(&db).await, (embedded, latest_version()));
        db.run_migrations().await.unwrap();
        assert_eq!(applied(&db).await, (embedded, latest_version()));
    }

    #[tokio::test]
    async fn test_deleting_a_bill_cascades_to_items() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        sqlx::query(
            "INSERT INTO bills (id, total_amount_cents, payment_method, created_at)
             VALUES ('b1', 3000, 'UPI', '2024-03-15T10:00:00.000Z')",
        )
        .execute(db.pool())
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO bill_items (id, bill_id, product_id, quantity, price_cents, position)
             VALUES ('i1', 'b1', 'p1', 2, 1500, 0)",
        )
        .execute(db.pool())
        .await
        .unwrap();

        sqlx::query("DELETE FROM bills WHERE id = 'b1'")
            .execute(db.pool())
            .await
            .unwrap();

        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bill_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(items, 0);
    }

    #[tokio::test]
    async fn test_unknown_payment_method_is_rejected_by_schema() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let result = sqlx::query(
            "INSERT INTO bills (id, total_amount_cents, payment_method, created_at)
             VALUES ('b1', 100, 'BITCOIN', '2024-03-15T10:00:00.000Z')",
        )
        .execute(db.pool())
        .await;

        assert!(result.is_err());
    }
}

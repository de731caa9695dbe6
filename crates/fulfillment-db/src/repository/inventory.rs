//! # Inventory Repository
//!
//! Stock levels keyed by SKU.
//!
//! ## Decrement Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  decrement("WIDGET-01", 2)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE inventory SET quantity = quantity - 2 WHERE sku = 'WIDGET-01'  │
//! │       │                                                                 │
//! │       ├── 1 row affected  → Ok(())                                     │
//! │       ├── 0 rows affected → DbError::NotFound (unknown SKU)            │
//! │       └── below zero      → DbError::QueryFailed (CHECK constraint)    │
//! │                                                                         │
//! │  Sufficiency is checked by the pipeline before commit. The schema's   │
//! │  CHECK (quantity >= 0) rejects an oversell that slips past it.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use fulfillment_core::validation::{validate_sku, validate_stock_quantity};
use fulfillment_core::InventoryRecord;

/// Repository for inventory records.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Gets the stock record for a SKU, `None` if the SKU is unknown.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<InventoryRecord>> {
        let record = sqlx::query_as::<_, InventoryRecord>(
            "SELECT sku, quantity FROM inventory WHERE sku = ?1",
        )
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Sets the stock level for a SKU, creating the row if needed.
    pub async fn upsert(&self, record: &InventoryRecord) -> DbResult<()> {
        validate_sku(&record.sku)?;
        validate_stock_quantity(record.quantity)?;

        sqlx::query(
            r#"
            INSERT INTO inventory (sku, quantity, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(sku) DO UPDATE SET
                quantity = excluded.quantity,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&record.sku)
        .bind(record.quantity)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Subtracts `quantity` from the stock of `sku`.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no inventory row for the SKU
    /// * `DbError::QueryFailed` - stock would drop below zero; stock is unchanged
    pub async fn decrement(&self, sku: &str, quantity: i64) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE inventory SET quantity = quantity - ?1, updated_at = ?2 WHERE sku = ?3",
        )
        .bind(quantity)
        .bind(Utc::now().to_rfc3339())
        .bind(sku)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory", sku));
        }

        debug!(sku = %sku, quantity = quantity, "Inventory decremented");
        Ok(())
    }

    /// Counts SKUs with an inventory row.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

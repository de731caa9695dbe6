//! # Processed Order Repository
//!
//! Durable record of every committed order. Each commit appends a new row,
//! so re-processing the same order ID produces a second record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use fulfillment_core::Order;

/// A stored processed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProcessedOrderRecord {
    /// Row ID (UUID v4).
    pub id: String,
    pub order_id: String,
    pub customer_id: String,
    pub total_cents: i64,
    /// The committed order as JSON.
    pub payload: String,
    pub processed_at: DateTime<Utc>,
}

impl ProcessedOrderRecord {
    /// Decodes the stored order payload.
    pub fn order(&self) -> DbResult<Order> {
        Ok(serde_json::from_str(&self.payload)?)
    }
}

/// Repository for processed orders.
#[derive(Debug, Clone)]
pub struct ProcessedOrderRepository {
    pool: SqlitePool,
}

impl ProcessedOrderRepository {
    /// Creates a new ProcessedOrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProcessedOrderRepository { pool }
    }

    /// Stores a processed order and returns the new row ID.
    ///
    /// `processed_at` falls back to the current time when the order has none.
    pub async fn insert(&self, order: &Order) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();
        let payload = serde_json::to_string(order)?;
        let processed_at = order.processed_at.unwrap_or_else(Utc::now);

        sqlx::query(
            r#"
            INSERT INTO processed_orders (id, order_id, customer_id, total_cents, payload, processed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&id)
        .bind(&order.id)
        .bind(&order.customer_id)
        .bind(order.total_cents)
        .bind(&payload)
        .bind(processed_at)
        .execute(&self.pool)
        .await?;

        debug!(order_id = %order.id, record_id = %id, "Processed order stored");
        Ok(id)
    }

    /// Lists every stored record for an order ID, oldest first.
    pub async fn list_by_order(&self, order_id: &str) -> DbResult<Vec<ProcessedOrderRecord>> {
        let records = sqlx::query_as::<_, ProcessedOrderRecord>(
            r#"
            SELECT id, order_id, customer_id, total_cents, payload, processed_at
            FROM processed_orders
            WHERE order_id = ?1
            ORDER BY processed_at, rowid
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Counts stored records.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM processed_orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

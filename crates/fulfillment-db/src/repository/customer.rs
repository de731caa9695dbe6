//! # Customer Repository
//!
//! Lookup of customer standing. The pipeline only reads customers; writes
//! exist for seeding and administration.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use fulfillment_core::validation::validate_entity_id;
use fulfillment_core::Customer;

/// Repository for customer records.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Customer))` - Customer found
    /// * `Ok(None)` - No such customer
    ///
    /// Statuses other than `active`/`banned` come back as `Other`.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        debug!(customer_id = %id, "Looking up customer");

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT
                id,
                name,
                CASE WHEN status IN ('active', 'banned') THEN status ELSE 'other' END AS status
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a customer, or replaces name and status if the ID exists.
    pub async fn upsert(&self, customer: &Customer) -> DbResult<()> {
        validate_entity_id("customer_id", &customer.id)?;

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, status, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                status = excluded.status
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(customer.status.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(customer_id = %customer.id, status = %customer.status.as_str(), "Customer upserted");
        Ok(())
    }

    /// Counts customers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

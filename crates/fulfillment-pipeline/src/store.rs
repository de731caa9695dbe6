//! # Order Store
//!
//! Everything the pipeline reads from or writes to persistent state goes
//! through [`OrderStore`].
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │              ┌──────────────────────────┐                               │
//! │              │   dyn OrderStore         │                               │
//! │              └────────────┬─────────────┘                               │
//! │                 ┌─────────┴──────────┐                                  │
//! │                 ▼                    ▼                                  │
//! │   fulfillment_db::Database     InMemoryStore                            │
//! │   (SQLite, runner)             (Mutex<HashMap>, tests + demos)          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use fulfillment_core::{Customer, InventoryRecord, Order};
use fulfillment_db::Database;

use crate::error::{PipelineError, PipelineResult};

/// Persistent state used by the pipeline.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Looks up a customer. `Ok(None)` means the customer does not exist.
    async fn lookup_customer(&self, customer_id: &str) -> PipelineResult<Option<Customer>>;

    /// Looks up stock for a SKU. `Ok(None)` means the SKU is unknown.
    async fn lookup_inventory(&self, sku: &str) -> PipelineResult<Option<InventoryRecord>>;

    /// Subtracts `quantity` from the stock of `sku`.
    async fn decrement_inventory(&self, sku: &str, quantity: i64) -> PipelineResult<()>;

    /// Persists a processed order.
    async fn save_processed_order(&self, order: &Order) -> PipelineResult<()>;
}

// =============================================================================
// SQLite
// =============================================================================

#[async_trait]
impl OrderStore for Database {
    async fn lookup_customer(&self, customer_id: &str) -> PipelineResult<Option<Customer>> {
        Ok(self.customers().get_by_id(customer_id).await?)
    }

    async fn lookup_inventory(&self, sku: &str) -> PipelineResult<Option<InventoryRecord>> {
        Ok(self.inventory().get_by_sku(sku).await?)
    }

    async fn decrement_inventory(&self, sku: &str, quantity: i64) -> PipelineResult<()> {
        Ok(self.inventory().decrement(sku, quantity).await?)
    }

    async fn save_processed_order(&self, order: &Order) -> PipelineResult<()> {
        self.processed_orders().insert(order).await?;
        Ok(())
    }
}

// =============================================================================
// In-Memory
// =============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    customers: HashMap<String, Customer>,
    inventory: HashMap<String, i64>,
    saved: Vec<Order>,
}

/// Store backed by in-process maps.
///
/// ## Usage
/// ```rust
/// use fulfillment_core::Customer;
/// use fulfillment_pipeline::InMemoryStore;
///
/// let store = InMemoryStore::new()
///     .with_customer(Customer::active("cust-1"))
///     .with_stock("A", 5);
///
/// assert_eq!(store.stock_of("A"), Some(5));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a customer.
    pub fn with_customer(self, customer: Customer) -> Self {
        self.lock().customers.insert(customer.id.clone(), customer);
        self
    }

    /// Sets the stock level of a SKU.
    pub fn with_stock(self, sku: impl Into<String>, quantity: i64) -> Self {
        self.lock().inventory.insert(sku.into(), quantity);
        self
    }

    /// Current stock of a SKU.
    pub fn stock_of(&self, sku: &str) -> Option<i64> {
        self.lock().inventory.get(sku).copied()
    }

    /// Orders persisted so far, in save order.
    pub fn saved_orders(&self) -> Vec<Order> {
        self.lock().saved.clone()
    }

    // A panicking test thread must not hide the state from later assertions.
    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn lookup_customer(&self, customer_id: &str) -> PipelineResult<Option<Customer>> {
        Ok(self.lock().customers.get(customer_id).cloned())
    }

    async fn lookup_inventory(&self, sku: &str) -> PipelineResult<Option<InventoryRecord>> {
        Ok(self
            .lock()
            .inventory
            .get(sku)
            .map(|qty| InventoryRecord::new(sku, *qty)))
    }

    async fn decrement_inventory(&self, sku: &str, quantity: i64) -> PipelineResult<()> {
        let mut state = self.lock();
        let stock = state
            .inventory
            .get_mut(sku)
            .ok_or_else(|| PipelineError::Store(format!("Inventory not found: {}", sku)))?;
        *stock -= quantity;
        Ok(())
    }

    async fn save_processed_order(&self, order: &Order) -> PipelineResult<()> {
        self.lock().saved.push(order.clone());
        Ok(())
    }
}

//! # fulfillment-db: Database Layer for Order Fulfillment
//!
//! SQLite storage for customers, inventory and processed orders, built on
//! sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Fulfillment Data Flow                             │
//! │                                                                         │
//! │  Pipeline stage (customer lookup, stock check, commit)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  fulfillment-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │    Repositories    │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│ CustomerRepository │  │ (embedded) │  │   │
//! │  │   │  SqlitePool   │    │ InventoryRepository│  │ 001_init   │  │   │
//! │  │   │               │    │ ProcessedOrderRepo │  │            │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fulfillment_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("fulfillment.db")).await?;
//! let customer = db.customers().get_by_id("cust-1").await?;
//! db.inventory().decrement("WIDGET-01", 2).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::customer::CustomerRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::processed_order::{ProcessedOrderRecord, ProcessedOrderRepository};

//! # fulfillment-pipeline: Batch Order Processing
//!
//! Takes a batch of orders, validates and prices each one, and commits the
//! ones that pass.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     fulfillment-pipeline                                │
//! │                                                                         │
//! │   FulfillmentConfig ──► FulfillmentPipeline::process(&[Option<Order>]) │
//! │   (config.rs)                   │                                       │
//! │                                 │ per order, in input order             │
//! │                                 ▼                                       │
//! │            ┌────────────────────┼─────────────────────┐                 │
//! │            ▼                    ▼                     ▼                 │
//! │     dyn OrderStore        dyn Notifier          dyn OrderLog            │
//! │     ├─ Database           ├─ WebhookNotifier    └─ FileOrderLog         │
//! │     └─ InMemoryStore      └─ NoopNotifier                               │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │                   BatchResult { processed, failed, summary }            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use fulfillment_core::{Customer, Order, OrderItem};
//! use fulfillment_pipeline::{
//!     FileOrderLog, FulfillmentConfig, FulfillmentPipeline, InMemoryStore, NoopNotifier,
//!     ProcessOptions,
//! };
//!
//! # tokio_test_block(async {
//! let store = InMemoryStore::new()
//!     .with_customer(Customer::active("cust-1"))
//!     .with_stock("A", 5);
//!
//! let pipeline = FulfillmentPipeline::new(
//!     Arc::new(store),
//!     Arc::new(NoopNotifier),
//!     Arc::new(FileOrderLog),
//!     &FulfillmentConfig::default(),
//! );
//!
//! let order = Order::pending("ord-1", "cust-1", 11_500).with_item(OrderItem::new("A", 5_000, 2));
//! let result = pipeline.process(&[Some(order)], ProcessOptions::dry_run()).await;
//!
//! assert_eq!(result.summary.total, 1);
//! assert_eq!(result.processed[0].total.cents(), 11_500);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod config;
pub mod error;
pub mod notifier;
pub mod order_log;
pub mod outcome;
pub mod pipeline;
pub mod store;

pub use config::FulfillmentConfig;
pub use error::{PipelineError, PipelineResult};
pub use notifier::{NoopNotifier, Notifier, WebhookNotifier};
pub use order_log::{FileOrderLog, OrderLog};
pub use outcome::{BatchResult, BatchSummary, FailedOrder, ProcessedOrder, ProcessingOutcome};
pub use pipeline::{FulfillmentPipeline, ProcessOptions};
pub use store::{InMemoryStore, OrderStore};

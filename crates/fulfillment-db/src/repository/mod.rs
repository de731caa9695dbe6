//! # Repository Module
//!
//! Repository implementations backing the fulfillment pipeline.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Who Calls What                                       │
//! │                                                                         │
//! │  Pipeline stage                 Repository call                         │
//! │  ──────────────                 ───────────────                         │
//! │  Customer check        ──►      customers().get_by_id(id)              │
//! │  Stock check           ──►      inventory().get_by_sku(sku)            │
//! │  Commit (per item)     ──►      inventory().decrement(sku, qty)        │
//! │  Commit (order)        ──►      processed_orders().insert(order)       │
//! │                                                                         │
//! │  Seeding / admin       ──►      customers().upsert(..)                 │
//! │                                 inventory().upsert(..)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`customer::CustomerRepository`] - Customer lookup and seeding
//! - [`inventory::InventoryRepository`] - Stock levels and decrements
//! - [`processed_order::ProcessedOrderRepository`] - Committed order records

pub mod customer;
pub mod inventory;
pub mod processed_order;

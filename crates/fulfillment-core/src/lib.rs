//! # fulfillment-core: Pure Business Logic for Order Fulfillment
//!
//! This crate holds every business rule the fulfillment pipeline applies,
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Order Fulfillment Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  fulfillment-runner (CLI)                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           fulfillment-pipeline (stages + collaborators)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ fulfillment-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │  Order    │  │   Money   │  │  Policy   │  │  stages   │  │   │
//! │  │   │  Customer │  │  TaxRate  │  │ Breakdown │  │  rules    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Order, OrderItem, Customer, InventoryRecord)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Subtotal / tax / shipping reconciliation
//! - [`error`] - Failure reasons and validation errors
//! - [`validation`] - Per-stage business rules and input validators
//!
//! ## Example Usage
//!
//! ```rust
//! use fulfillment_core::money::Money;
//! use fulfillment_core::pricing::PricingPolicy;
//! use fulfillment_core::types::{OrderItem, TaxRate};
//!
//! let policy = PricingPolicy::new(
//!     TaxRate::from_ppm(100_000),   // 10%
//!     Money::from_cents(10_000),    // free shipping above $100.00
//!     Money::from_cents(500),       // otherwise $5.00
//! );
//!
//! let items = vec![OrderItem::new("A", 5_000, 2)];
//! let breakdown = policy.price(&items).unwrap();
//!
//! // $100.00 is not above the threshold, so shipping applies
//! assert_eq!(breakdown.total.cents(), 11_500);
//! ```

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{FailureReason, ValidationError};
pub use money::Money;
pub use pricing::{PriceBreakdown, PricingPolicy};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest accepted gap between the computed and the declared order total.
///
/// One minor currency unit (0.01 in major units). A gap of exactly one cent
/// still reconciles.
pub const TOTAL_TOLERANCE: Money = Money::from_cents(1);

/// Event kind sent to the notification endpoint for every committed order.
pub const ORDER_PROCESSED_EVENT: &str = "order_processed";

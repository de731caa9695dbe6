//! # Domain Types
//!
//! Core domain types used throughout the fulfillment workspace.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │   │   OrderItem     │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  sku            │   │  id             │       │
//! │  │  customer_id    │──►│  unit_price     │   │  name           │       │
//! │  │  status         │   │  quantity       │   │  status         │       │
//! │  │  total_cents    │   └─────────────────┘   └─────────────────┘       │
//! │  │  processed_at   │                                                    │
//! │  └─────────────────┘   ┌─────────────────┐   ┌─────────────────┐       │
//! │                        │ InventoryRecord │   │    TaxRate      │       │
//! │                        │  ─────────────  │   │  ─────────────  │       │
//! │                        │  sku            │   │  ppm (u32)      │       │
//! │                        │  quantity       │   │  100000 = 10%   │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Immutable Orders
//! The pipeline never edits an input `Order`. A committed order is a new
//! value produced by [`Order::mark_processed`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::ORDER_PROCESSED_EVENT;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in parts per million (ppm).
///
/// ## Why Parts Per Million?
/// Basis points stop at 0.01%, which cannot express real rates such as
/// 8.875%. At ppm scale that rate is exactly 88_750.
///
/// 1 ppm = 0.0001% = 1/1000000
/// 100_000 ppm = 10% (a tax fraction of 0.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Parts per million in a rate of 100%.
    pub const SCALE: u32 = 1_000_000;

    /// Creates a tax rate from parts per million.
    #[inline]
    pub const fn from_ppm(ppm: u32) -> Self {
        TaxRate(ppm)
    }

    /// Creates a tax rate from basis points (1 bps = 100 ppm).
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps.saturating_mul(100))
    }

    /// Creates a tax rate from a percentage (for convenience).
    ///
    /// Exact for up to four decimal places (`8.875` → 88_750 ppm).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 10_000.0).round() as u32)
    }

    /// Returns the rate in parts per million.
    #[inline]
    pub const fn ppm(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle status of an order.
///
/// Only `Pending` orders enter the pipeline; anything else is skipped.
/// Statuses this system does not know about deserialize to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Waiting for fulfillment.
    #[default]
    Pending,
    /// Validated, priced and committed.
    Processed,
    /// Any other status (cancelled, shipped, ...).
    #[serde(other)]
    Other,
}

impl OrderStatus {
    /// Returns the lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processed => "processed",
            OrderStatus::Other => "other",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Customer Status
// =============================================================================

/// Standing of a customer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    #[default]
    Active,
    /// Orders from banned customers always fail.
    Banned,
    #[serde(other)]
    Other,
}

impl CustomerStatus {
    /// Returns the lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Banned => "banned",
            CustomerStatus::Other => "other",
        }
    }
}

impl std::str::FromStr for CustomerStatus {
    type Err = std::convert::Infallible;

    /// Unknown statuses map to `Other`, never an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "active" => CustomerStatus::Active,
            "banned" => CustomerStatus::Banned,
            _ => CustomerStatus::Other,
        })
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Stock Keeping Unit used for the inventory lookup.
    pub sku: String,

    /// Unit price in cents (≥ 0).
    pub unit_price_cents: i64,

    /// Requested quantity (≥ 0).
    pub quantity: i64,
}

impl OrderItem {
    /// Creates a new order line.
    pub fn new(sku: impl Into<String>, unit_price_cents: i64, quantity: i64) -> Self {
        OrderItem {
            sku: sku.into(),
            unit_price_cents,
            quantity,
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Unit price × quantity, `None` if the product overflows.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price().checked_multiply_quantity(self.quantity)
    }

    /// Neither the price nor the quantity is negative.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.unit_price_cents >= 0 && self.quantity >= 0
    }
}

// =============================================================================
// Order
// =============================================================================

/// A customer order as submitted for fulfillment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,

    /// Reference to the customer placing the order.
    pub customer_id: String,

    #[serde(default)]
    pub status: OrderStatus,

    /// Total declared by the order source, in cents. Reconciled against
    /// the computed total before commit.
    #[serde(default)]
    pub total_cents: i64,

    #[serde(default)]
    pub items: Vec<OrderItem>,

    /// Set only on the committed copy of an order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Creates a pending order with no items.
    pub fn pending(id: impl Into<String>, customer_id: impl Into<String>, total_cents: i64) -> Self {
        Order {
            id: id.into(),
            customer_id: customer_id.into(),
            status: OrderStatus::Pending,
            total_cents,
            items: Vec::new(),
            processed_at: None,
        }
    }

    /// Builder-style helper to append an item.
    pub fn with_item(mut self, item: OrderItem) -> Self {
        self.items.push(item);
        self
    }

    /// Checks if the order is eligible for processing.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    /// Returns the declared total as Money.
    #[inline]
    pub fn declared_total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns a committed copy of this order.
    ///
    /// The receiver is left untouched, so the caller keeps the original
    /// input value for reporting.
    pub fn mark_processed(&self, at: DateTime<Utc>) -> Order {
        Order {
            status: OrderStatus::Processed,
            processed_at: Some(at),
            ..self.clone()
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer as seen by the pipeline (read-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: Option<String>,
    pub status: CustomerStatus,
}

impl Customer {
    /// Creates an active customer.
    pub fn active(id: impl Into<String>) -> Self {
        Customer {
            id: id.into(),
            name: None,
            status: CustomerStatus::Active,
        }
    }

    /// Creates a banned customer.
    pub fn banned(id: impl Into<String>) -> Self {
        Customer {
            status: CustomerStatus::Banned,
            ..Customer::active(id)
        }
    }

    #[inline]
    pub fn is_banned(&self) -> bool {
        self.status == CustomerStatus::Banned
    }
}

// =============================================================================
// Inventory Record
// =============================================================================

/// Current stock for a SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryRecord {
    pub sku: String,

    /// Units available right now.
    pub quantity: i64,
}

impl InventoryRecord {
    pub fn new(sku: impl Into<String>, quantity: i64) -> Self {
        InventoryRecord {
            sku: sku.into(),
            quantity,
        }
    }

    /// Checks whether `requested` units can be taken from this record.
    #[inline]
    pub fn covers(&self, requested: i64) -> bool {
        requested >= 0 && self.quantity >= requested
    }
}

// =============================================================================
// Order Event
// =============================================================================

/// Payload sent to the notification endpoint after a commit.
///
/// ## Wire Shape
/// ```json
/// { "event": "order_processed", "order_id": "ord-1", "total": 11500 }
/// ```
/// `total` is in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub event: String,
    pub order_id: String,
    pub total: Money,
}

impl OrderEvent {
    /// Builds the `order_processed` event for a committed order.
    pub fn order_processed(order_id: impl Into<String>, total: Money) -> Self {
        OrderEvent {
            event: ORDER_PROCESSED_EVENT.to_string(),
            order_id: order_id.into(),
            total,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

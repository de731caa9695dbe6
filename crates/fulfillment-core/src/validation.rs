//! # Validation Module
//!
//! Business rules for the pipeline stages, plus input validators for data
//! entering the system.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Stage rules (per order, result is DATA)                       │
//! │  ├── check_declared_total    → InvalidTotal                             │
//! │  ├── check_items             → InvalidItem { sku }                      │
//! │  ├── check_customer          → CustomerNotFound | CustomerBanned        │
//! │  └── check_item_stock        → InsufficientStock { sku }                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Input validators (seed data, upserts, config)                 │
//! │  ├── validate_sku / validate_entity_id                                  │
//! │  ├── validate_stock_quantity / validate_amount_cents                    │
//! │  └── validate_tax_rate_ppm / validate_http_url                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite CHECK / NOT NULL constraints)                │
//! │  └── inventory.quantity >= 0, processed_orders.total_cents >= 0         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{FailureReason, ValidationError};
use crate::types::{Customer, InventoryRecord, Order, OrderItem, TaxRate};

/// Result type for input validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum accepted SKU length.
pub const MAX_SKU_LEN: usize = 64;

// =============================================================================
// Stage Rules
// =============================================================================

/// Stage 2: the declared total must be strictly positive.
pub fn check_declared_total(order: &Order) -> Result<(), FailureReason> {
    if !order.declared_total().is_positive() {
        return Err(FailureReason::InvalidTotal);
    }
    Ok(())
}

/// Stage 2, per item: no item may carry a negative quantity or unit price.
///
/// Returns the first offending item in listed order. A negative quantity
/// would otherwise pass the stock check and raise stock on commit.
///
/// ## Example
/// ```rust
/// use fulfillment_core::validation::check_items;
/// use fulfillment_core::{FailureReason, Order, OrderItem};
///
/// let order = Order::pending("o1", "c1", 500).with_item(OrderItem::new("A", 100, 2));
/// assert!(check_items(&order).is_ok());
///
/// let order = order.with_item(OrderItem::new("B", 100, -3));
/// assert_eq!(
///     check_items(&order),
///     Err(FailureReason::InvalidItem { sku: "B".to_string() })
/// );
/// ```
pub fn check_items(order: &Order) -> Result<(), FailureReason> {
    match order.items.iter().find(|item| !item.is_well_formed()) {
        Some(item) => Err(FailureReason::InvalidItem {
            sku: item.sku.clone(),
        }),
        None => Ok(()),
    }
}

/// Stage 3: the customer must exist and must not be banned.
///
/// ## Example
/// ```rust
/// use fulfillment_core::validation::check_customer;
/// use fulfillment_core::{Customer, FailureReason};
///
/// assert!(check_customer(Some(&Customer::active("c1"))).is_ok());
/// assert_eq!(check_customer(None), Err(FailureReason::CustomerNotFound));
/// assert_eq!(
///     check_customer(Some(&Customer::banned("c2"))),
///     Err(FailureReason::CustomerBanned)
/// );
/// ```
pub fn check_customer(customer: Option<&Customer>) -> Result<&Customer, FailureReason> {
    let customer = customer.ok_or(FailureReason::CustomerNotFound)?;

    if customer.is_banned() {
        return Err(FailureReason::CustomerBanned);
    }

    Ok(customer)
}

/// Stage 4, for a single item: stock must exist and cover the quantity.
///
/// The caller walks items in listed order and stops at the first error.
pub fn check_item_stock(
    item: &OrderItem,
    stock: Option<&InventoryRecord>,
) -> Result<(), FailureReason> {
    match stock {
        Some(record) if record.covers(item.quantity) => Ok(()),
        _ => Err(FailureReason::insufficient_stock(&item.sku)),
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_SKU_LEN`] characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use fulfillment_core::validation::validate_sku;
///
/// assert!(validate_sku("WIDGET-01").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a record identifier (customer id, order id).
pub fn validate_entity_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > 128 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 128,
        });
    }

    Ok(())
}

/// Validates an HTTP(S) endpoint URL.
pub fn validate_http_url(field: &str, url: &str) -> ValidationResult<()> {
    if url.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("must start with http:// or https://, got: {}", url),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock level. Zero is allowed (sold out).
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a non-negative amount in cents (prices, thresholds, fees).
///
/// ## Example
/// ```rust
/// use fulfillment_core::validation::validate_amount_cents;
///
/// assert!(validate_amount_cents("shipping_rate", 500).is_ok());
/// assert!(validate_amount_cents("shipping_rate", 0).is_ok());
/// assert!(validate_amount_cents("shipping_rate", -1).is_err());
/// ```
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a tax rate in parts per million.
///
/// ## Rules
/// - Must be between 0 and 1000000 (0% to 100%)
pub fn validate_tax_rate_ppm(ppm: u32) -> ValidationResult<()> {
    if ppm > TaxRate::SCALE {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: TaxRate::SCALE as i64,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Error Types
//!
//! Domain-specific error types for fulfillment-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fulfillment-core errors (this file)                                   │
//! │  ├── FailureReason    - Why a single order was not fulfilled (DATA)    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  fulfillment-db errors (separate crate)                                │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  fulfillment-pipeline errors (separate crate)                          │
//! │  └── PipelineError    - Config + collaborator failures                 │
//! │                                                                         │
//! │  Flow: DbError → PipelineError → FailureReason::StoreError → result   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## FailureReason is not an exception
//! A failed order is a normal outcome of a batch. `FailureReason` values are
//! collected into the batch result; they never abort processing of the
//! remaining orders.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Failure Reason
// =============================================================================

/// Why an order ended in the `Failed` state.
///
/// ## Stage Mapping
/// ```text
/// Stage 2  total sanity     → InvalidTotal | InvalidItem { sku }
/// Stage 3  customer         → CustomerNotFound | CustomerBanned
/// Stage 4  inventory        → InsufficientStock { sku }
/// Stage 5  pricing          → TotalMismatch { computed, declared } | AmountOutOfRange
/// Stage 6  commit           → StoreError | LogWriteFailed
/// ```
///
/// Customer and inventory lookups go through the store as well, so
/// `StoreError` can also surface from stages 3 and 4.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// Declared total is zero or negative.
    #[error("invalid total")]
    InvalidTotal,

    /// An item has a negative quantity or unit price.
    #[error("invalid item {sku}: negative quantity or price")]
    InvalidItem { sku: String },

    /// The order's customer reference does not resolve.
    #[error("customer not found")]
    CustomerNotFound,

    /// The customer exists but is banned.
    #[error("customer banned")]
    CustomerBanned,

    /// The first item (in listed order) that cannot be covered by stock.
    ///
    /// ## When This Occurs
    /// - No inventory record exists for the SKU
    /// - Available quantity is below the requested quantity
    #[error("insufficient stock for {sku}")]
    InsufficientStock { sku: String },

    /// Computed total differs from the declared one by more than the tolerance.
    #[error("total mismatch: computed {computed}, declared {declared}")]
    TotalMismatch { computed: Money, declared: Money },

    /// A line total, the subtotal or the total does not fit in 64-bit cents.
    #[error("order amount out of range")]
    AmountOutOfRange,

    /// A store call failed (lookup, decrement or persistence).
    #[error("store error: {message}")]
    StoreError { message: String },

    /// Appending to the order log failed after the order was committed.
    #[error("order log write failed: {message}")]
    LogWriteFailed { message: String },
}

impl FailureReason {
    /// Creates an InsufficientStock failure for the given SKU.
    pub fn insufficient_stock(sku: impl Into<String>) -> Self {
        FailureReason::InsufficientStock { sku: sku.into() }
    }

    /// Creates a StoreError failure from any displayable error.
    pub fn store(err: impl std::fmt::Display) -> Self {
        FailureReason::StoreError {
            message: err.to_string(),
        }
    }

    /// Creates a LogWriteFailed failure from any displayable error.
    pub fn log_write(err: impl std::fmt::Display) -> Self {
        FailureReason::LogWriteFailed {
            message: err.to_string(),
        }
    }

    /// Short machine-readable code, matching the serialized `kind` tag.
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::InvalidTotal => "invalid_total",
            FailureReason::InvalidItem { .. } => "invalid_item",
            FailureReason::CustomerNotFound => "customer_not_found",
            FailureReason::CustomerBanned => "customer_banned",
            FailureReason::InsufficientStock { .. } => "insufficient_stock",
            FailureReason::TotalMismatch { .. } => "total_mismatch",
            FailureReason::AmountOutOfRange => "amount_out_of_range",
            FailureReason::StoreError { .. } => "store_error",
            FailureReason::LogWriteFailed { .. } => "log_write_failed",
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised when records or settings entering the system (seed data,
/// inventory upserts, configuration) do not meet basic requirements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., bad SKU characters, bad URL scheme).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages() {
        assert_eq!(FailureReason::InvalidTotal.to_string(), "invalid total");
        assert_eq!(
            FailureReason::insufficient_stock("SKU-B").to_string(),
            "insufficient stock for SKU-B"
        );

        let mismatch = FailureReason::TotalMismatch {
            computed: Money::from_cents(13_200),
            declared: Money::from_cents(12_600),
        };
        assert_eq!(
            mismatch.to_string(),
            "total mismatch: computed $132.00, declared $126.00"
        );
    }

    #[test]
    fn test_failure_serializes_with_kind_tag() {
        let json = serde_json::to_value(FailureReason::insufficient_stock("A")).unwrap();
        assert_eq!(json["kind"], "insufficient_stock");
        assert_eq!(json["sku"], "A");

        let json = serde_json::to_value(FailureReason::CustomerBanned).unwrap();
        assert_eq!(json["kind"], FailureReason::CustomerBanned.code());
    }

    #[test]
    fn test_item_and_range_failures() {
        let reason = FailureReason::InvalidItem {
            sku: "A".to_string(),
        };
        assert_eq!(reason.to_string(), "invalid item A: negative quantity or price");
        assert_eq!(serde_json::to_value(&reason).unwrap()["kind"], reason.code());

        let json = serde_json::to_value(FailureReason::AmountOutOfRange).unwrap();
        assert_eq!(json["kind"], "amount_out_of_range");
    }

    #[test]
    fn test_store_failure_keeps_message() {
        let reason = FailureReason::store("disk I/O error");
        assert_eq!(reason.to_string(), "store error: disk I/O error");
        assert_eq!(reason.code(), "store_error");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "sku".to_string(),
        };
        assert_eq!(err.to_string(), "sku is required");

        let err = ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must not be negative");
    }
}

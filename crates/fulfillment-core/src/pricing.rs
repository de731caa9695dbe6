//! # Pricing Module
//!
//! Recomputes an order's total from its items and reconciles it against the
//! total the order declares.
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal = Σ unit_price × quantity                                     │
//! │  tax      = subtotal × tax_rate                                         │
//! │  shipping = 0         if subtotal >  free_shipping_threshold            │
//! │           = flat rate if subtotal <= free_shipping_threshold            │
//! │  total    = subtotal + tax + shipping                                   │
//! │                                                                         │
//! │  reconciled ⇔ |total − declared| ≤ TOTAL_TOLERANCE (1 cent)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The threshold comparison is strict: a subtotal exactly equal to the
//! threshold still pays shipping.
//!
//! ## Precision
//! Reconciliation compares the unrounded total, in millionths of a cent,
//! against the declared one. The tax and total in [`PriceBreakdown`] are
//! rounded half-up to the cent and are for reporting only: 505.5 cents
//! reports as 506 but still fails against a declared 507.
//!
//! Every amount is checked for overflow. An order whose amounts do not fit
//! in 64-bit cents fails with `AmountOutOfRange`.

use serde::{Deserialize, Serialize};

use crate::error::FailureReason;
use crate::money::Money;
use crate::types::{Order, OrderItem, TaxRate};
use crate::TOTAL_TOLERANCE;

/// Pricing rules applied to every order in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    pub tax_rate: TaxRate,
    pub free_shipping_threshold: Money,
    pub shipping_rate: Money,
}

/// Every intermediate amount of a pricing computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
}

impl PricingPolicy {
    pub fn new(tax_rate: TaxRate, free_shipping_threshold: Money, shipping_rate: Money) -> Self {
        PricingPolicy {
            tax_rate,
            free_shipping_threshold,
            shipping_rate,
        }
    }

    /// Shipping charged for a given subtotal.
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal > self.free_shipping_threshold {
            Money::zero()
        } else {
            self.shipping_rate
        }
    }

    /// Computes the full breakdown for a list of items.
    ///
    /// ## Example
    /// ```rust
    /// use fulfillment_core::{Money, OrderItem, PricingPolicy, TaxRate};
    ///
    /// let policy = PricingPolicy::new(
    ///     TaxRate::from_percentage(10.0),
    ///     Money::from_cents(10_000),
    ///     Money::from_cents(500),
    /// );
    /// let breakdown = policy.price(&[OrderItem::new("A", 6_000, 2)]).unwrap();
    ///
    /// assert_eq!(breakdown.subtotal.cents(), 12_000);
    /// assert_eq!(breakdown.tax.cents(), 1_200);
    /// assert!(breakdown.shipping.is_zero());
    /// assert_eq!(breakdown.total.cents(), 13_200);
    /// ```
    ///
    /// ## Errors
    /// * `FailureReason::AmountOutOfRange` - some amount overflows `i64` cents
    pub fn price(&self, items: &[OrderItem]) -> Result<PriceBreakdown, FailureReason> {
        let subtotal = items.iter().try_fold(Money::zero(), |acc, item| {
            item.line_total().and_then(|line| acc.checked_add(line))
        });
        let subtotal = subtotal.ok_or(FailureReason::AmountOutOfRange)?;

        let tax = subtotal
            .checked_tax(self.tax_rate)
            .ok_or(FailureReason::AmountOutOfRange)?;
        let shipping = self.shipping_for(subtotal);
        let total = subtotal
            .checked_add(tax)
            .and_then(|t| t.checked_add(shipping))
            .ok_or(FailureReason::AmountOutOfRange)?;

        Ok(PriceBreakdown {
            subtotal,
            tax,
            shipping,
            total,
        })
    }

    /// Prices an order and checks the result against its declared total.
    ///
    /// The check uses the unrounded tax, so the tolerance is exactly one
    /// cent however the tax rounds.
    ///
    /// ## Returns
    /// * `Ok(PriceBreakdown)` - computed total is within one cent of the declared one
    /// * `Err(FailureReason::TotalMismatch)` - otherwise
    /// * `Err(FailureReason::AmountOutOfRange)` - some amount overflows `i64` cents
    pub fn reconcile(&self, order: &Order) -> Result<PriceBreakdown, FailureReason> {
        let breakdown = self.price(&order.items)?;
        let declared = order.declared_total();

        if self.exact_distance(&breakdown, declared) > scaled(TOTAL_TOLERANCE) {
            return Err(FailureReason::TotalMismatch {
                computed: breakdown.total,
                declared,
            });
        }

        Ok(breakdown)
    }

    /// `|subtotal × (1 + rate) + shipping − declared|` in millionths of a cent.
    fn exact_distance(&self, breakdown: &PriceBreakdown, declared: Money) -> i128 {
        let subtotal = breakdown.subtotal.cents() as i128;
        let exact_total = subtotal * (TaxRate::SCALE as i128 + self.tax_rate.ppm() as i128)
            + scaled(breakdown.shipping);

        (exact_total - scaled(declared)).abs()
    }
}

/// Cents expressed at tax-rate scale.
#[inline]
fn scaled(amount: Money) -> i128 {
    amount.cents() as i128 * TaxRate::SCALE as i128
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PricingPolicy {
        PricingPolicy::new(
            TaxRate::from_ppm(100_000),
            Money::from_cents(10_000),
            Money::from_cents(500),
        )
    }

    fn order(total_cents: i64, items: Vec<OrderItem>) -> Order {
        items
            .into_iter()
            .fold(Order::pending("o1", "c1", total_cents), Order::with_item)
    }

    #[test]
    fn test_threshold_equality_pays_shipping() {
        let breakdown = policy().price(&[OrderItem::new("A", 5_000, 2)]).unwrap();

        assert_eq!(breakdown.subtotal.cents(), 10_000);
        assert_eq!(breakdown.tax.cents(), 1_000);
        assert_eq!(breakdown.shipping.cents(), 500);
        assert_eq!(breakdown.total.cents(), 11_500);
    }

    #[test]
    fn test_one_cent_above_threshold_ships_free() {
        let breakdown = policy().price(&[OrderItem::new("A", 10_001, 1)]).unwrap();
        assert!(breakdown.shipping.is_zero());
    }

    #[test]
    fn test_reconcile_matching_total() {
        let result = policy().reconcile(&order(11_500, vec![OrderItem::new("A", 5_000, 2)]));
        assert_eq!(result.unwrap().total.cents(), 11_500);
    }

    #[test]
    fn test_reconcile_mismatch() {
        let result = policy().reconcile(&order(12_600, vec![OrderItem::new("A", 6_000, 2)]));
        assert_eq!(
            result.unwrap_err(),
            FailureReason::TotalMismatch {
                computed: Money::from_cents(13_200),
                declared: Money::from_cents(12_600),
            }
        );
    }

    #[test]
    fn test_reconcile_tolerance_is_inclusive() {
        let items = vec![OrderItem::new("A", 5_000, 2)];
        assert!(policy().reconcile(&order(11_501, items.clone())).is_ok());
        assert!(policy().reconcile(&order(11_499, items.clone())).is_ok());
        assert!(policy().reconcile(&order(11_502, items)).is_err());
    }

    #[test]
    fn test_empty_order_pays_only_shipping() {
        let breakdown = policy().price(&[]).unwrap();
        assert!(breakdown.subtotal.is_zero());
        assert_eq!(breakdown.total.cents(), 500);
    }

    #[test]
    fn test_half_cent_tax_does_not_widen_tolerance() {
        // 5¢ at 10% is 0.5¢ tax: exact total 505.5¢, reported as 506¢
        let items = vec![OrderItem::new("A", 5, 1)];

        let result = policy().reconcile(&order(507, items.clone()));
        assert_eq!(
            result.unwrap_err(),
            FailureReason::TotalMismatch {
                computed: Money::from_cents(506),
                declared: Money::from_cents(507),
            }
        );

        let breakdown = policy().reconcile(&order(506, items.clone())).unwrap();
        assert_eq!(breakdown.tax.cents(), 1);
        assert_eq!(breakdown.total.cents(), 506);

        assert!(policy().reconcile(&order(505, items.clone())).is_ok());
        assert!(policy().reconcile(&order(504, items)).is_err());
    }

    #[test]
    fn test_sub_basis_point_rate_reconciles() {
        let policy = PricingPolicy::new(
            TaxRate::from_percentage(8.875),
            Money::from_cents(10_000),
            Money::from_cents(500),
        );
        // 1000¢ + 88.75¢ tax + 500¢ shipping = 1588.75¢
        let items = vec![OrderItem::new("A", 1_000, 1)];

        let breakdown = policy.reconcile(&order(1_589, items.clone())).unwrap();
        assert_eq!(breakdown.tax.cents(), 89);
        assert!(policy.reconcile(&order(1_588, items.clone())).is_ok());
        assert!(policy.reconcile(&order(1_590, items)).is_err());
    }

    #[test]
    fn test_line_total_overflow_fails_order() {
        let items = vec![OrderItem::new("A", i64::MAX / 2, 3)];
        assert_eq!(
            policy().reconcile(&order(100, items)),
            Err(FailureReason::AmountOutOfRange)
        );
    }

    #[test]
    fn test_subtotal_and_total_overflow_fail_order() {
        let half = i64::MAX / 2;
        let items = vec![
            OrderItem::new("A", half, 1),
            OrderItem::new("B", half, 1),
            OrderItem::new("C", 2, 1),
        ];
        assert_eq!(policy().price(&items), Err(FailureReason::AmountOutOfRange));

        // subtotal fits, subtotal plus 10% tax does not
        let items = vec![OrderItem::new("A", i64::MAX - 10, 1)];
        assert_eq!(policy().price(&items), Err(FailureReason::AmountOutOfRange));
    }
}

//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats:                                                           │
//! │    100.0 × 0.1 + 5.0 = 15.000000000000002                               │
//! │    → a reconciliation check against 115.00 becomes a coin toss          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    10000 × 100000 ppm / 1000000 = 1000 cents tax                        │
//! │    Every comparison is exact; the 0.01 tolerance is exactly 1 cent      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fulfillment_core::money::Money;
//!
//! let price = Money::from_cents(5000); // $50.00
//! let line = price.checked_multiply_quantity(2); // $100.00
//! assert_eq!(line, Some(Money::from_cents(10_000)));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences between totals can be negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serde**: serializes as the bare cent count
///
/// ## Where Money Flows
/// ```text
/// OrderItem.unit_price_cents ──► line total ──► subtotal
///                                                  │
///                      tax (TaxRate) ◄─────────────┤
///                      shipping (threshold) ◄──────┤
///                                                  ▼
///                                    computed total ◄──► Order.total_cents
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use fulfillment_core::money::Money;
    ///
    /// let total = Money::from_cents(11_500); // $115.00
    /// assert_eq!(total.cents(), 11_500);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -$5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is strictly greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Absolute distance between two amounts.
    ///
    /// ## Example
    /// ```rust
    /// use fulfillment_core::money::Money;
    ///
    /// let computed = Money::from_cents(13_200);
    /// let declared = Money::from_cents(12_600);
    /// assert_eq!(computed.distance(declared).cents(), 600);
    /// assert_eq!(declared.distance(computed).cents(), 600);
    /// ```
    #[inline]
    pub const fn distance(&self, other: Money) -> Money {
        Money((self.0 - other.0).abs())
    }

    /// Calculates tax with half-up rounding to the nearest cent.
    ///
    /// ## Implementation
    /// Integer math: `(amount * ppm + 500000) / 1000000`.
    /// The +500000 provides rounding (half of one cent at ppm scale).
    /// Negative amounts never reach this in the pipeline (prices are ≥ 0).
    ///
    /// Returns `None` if the tax does not fit in an `i64`, which only a
    /// rate above 100% can cause.
    ///
    /// ## Example
    /// ```rust
    /// use fulfillment_core::money::Money;
    /// use fulfillment_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(12_000); // $120.00
    /// let tax = subtotal.checked_tax(TaxRate::from_percentage(10.0));
    /// assert_eq!(tax, Some(Money::from_cents(1_200)));
    /// ```
    pub fn checked_tax(&self, rate: TaxRate) -> Option<Money> {
        let scale = TaxRate::SCALE as i128;
        // i128 prevents overflow on large amounts
        let tax_cents = (self.0 as i128 * rate.ppm() as i128 + scale / 2) / scale;
        i64::try_from(tax_cents).ok().map(Money)
    }

    /// Multiplies money by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use fulfillment_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(6_000);
    /// assert_eq!(unit_price.checked_multiply_quantity(2), Some(Money::from_cents(12_000)));
    /// assert_eq!(Money::from_cents(i64::MAX / 2).checked_multiply_quantity(3), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable form, used in order log lines and error messages.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summing line totals into a subtotal.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

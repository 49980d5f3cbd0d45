//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                             │
//! │                                                                         │
//! │  A vending machine only ever handles whole coins. The smallest coin    │
//! │  is 10 won, so every amount is an integer number of won and every      │
//! │  valid price is a multiple of 10.                                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Won                                              │
//! │    2000 - 1100 = 900  (exact, always)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vending_core::money::Money;
//!
//! let price = Money::from_won(1100);
//! let inserted = Money::from_won(2000);
//!
//! assert_eq!((inserted - price).won(), 900);
//! assert!(price.is_multiple_of(10));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in won (the machine's only currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction can be checked for going below zero
///   instead of silently wrapping
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serde transparent**: serializes as a bare number in receipts
///
/// ## Where Money Flows
/// ```text
/// cash float ──► CoinInventory::seed ──► coin counts
///
/// inserted money ──► PurchaseSession balance ──► - price per sale
///                                           │
///                                           ▼
///                             CoinInventory::dispense (change)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from a number of won.
    ///
    /// ## Example
    /// ```rust
    /// use vending_core::money::Money;
    ///
    /// let price = Money::from_won(850);
    /// assert_eq!(price.won(), 850);
    /// ```
    #[inline]
    pub const fn from_won(won: i64) -> Self {
        Money(won)
    }

    /// Returns the value in won.
    #[inline]
    pub const fn won(&self) -> i64 {
        self.0
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Checks whether the amount is an exact multiple of `unit`.
    ///
    /// Used to check that prices and cash amounts can be paid in whole
    /// coins of the smallest denomination.
    ///
    /// ## Example
    /// ```rust
    /// use vending_core::money::Money;
    ///
    /// assert!(Money::from_won(1100).is_multiple_of(10));
    /// assert!(!Money::from_won(1105).is_multiple_of(10));
    /// ```
    #[inline]
    pub const fn is_multiple_of(&self, unit: i64) -> bool {
        unit != 0 && self.0 % unit == 0
    }

    /// Subtraction that refuses to produce a negative amount.
    ///
    /// ## Example
    /// ```rust
    /// use vending_core::money::Money;
    ///
    /// let balance = Money::from_won(900);
    /// assert_eq!(balance.checked_debit(Money::from_won(850)), Some(Money::from_won(50)));
    /// assert_eq!(balance.checked_debit(Money::from_won(1100)), None);
    /// ```
    #[inline]
    pub fn checked_debit(&self, amount: Money) -> Option<Money> {
        self.0
            .checked_sub(amount.0)
            .filter(|rest| *rest >= 0)
            .map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display matches the console format of the machine: `1100원`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}원", self.0)
    }
}

/// Default money is zero.
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a coin count.
impl Mul<u64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, count: u64) -> Self {
        Money(self.0 * count as i64)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

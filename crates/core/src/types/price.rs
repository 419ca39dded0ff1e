//! Integer price representation in the smallest currency unit (Vietnamese đồng).

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount of money in đồng.
///
/// The shop only trades in VND, which has no minor unit, so the amount is a
/// plain integer. Arithmetic saturates instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Zero đồng.
    pub const ZERO: Self = Self(0);

    /// Create a price from a whole number of đồng.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Get the underlying amount.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The amount as a decimal, for percentage arithmetic.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.0)
    }

    /// Format for display using Vietnamese grouping, e.g. `45.000đ`.
    #[must_use]
    pub fn display(&self) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        if self.0 < 0 {
            format!("-{grouped}đ")
        } else {
            format!("{grouped}đ")
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_grouping() {
        assert_eq!(Price::new(0).display(), "0đ");
        assert_eq!(Price::new(500).display(), "500đ");
        assert_eq!(Price::new(45_000).display(), "45.000đ");
        assert_eq!(Price::new(1_234_567).display(), "1.234.567đ");
        assert_eq!(Price::new(-15_000).display(), "-15.000đ");
    }

    #[test]
    fn test_times_and_sum() {
        let unit = Price::new(45_000);
        assert_eq!(unit.times(2), Price::new(90_000));

        let total: Price = [Price::new(1), Price::new(2), Price::new(3)].iter().sum();
        assert_eq!(total, Price::new(6));
    }

    #[test]
    fn test_saturating_arithmetic() {
        let max = Price::new(i64::MAX);
        assert_eq!(max + Price::new(1), max);
        assert_eq!(max.times(2), max);
    }
}

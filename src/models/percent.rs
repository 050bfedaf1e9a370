//! Percentage type with two-decimal precision
//!
//! Stored as integer hundredths of a percent, so `100.00%` is `10000` and an
//! allocation that "sums to 100.00" can be checked with plain integer
//! equality. Serialized as a decimal number (`12.5`) for readability.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

use super::money::Money;

/// A percentage rounded to two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percent(i64);

impl Percent {
    /// 100.00%
    pub const HUNDRED: Percent = Percent(10_000);

    /// Create from hundredths of a percent (`1250` is 12.50%)
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Hundredths of a percent
    pub const fn hundredths(&self) -> i64 {
        self.0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Round an arbitrary float percentage to two decimals
    ///
    /// Returns `None` for NaN, infinite, or out-of-range input.
    pub fn from_f64(value: f64) -> Option<Self> {
        let hundredths = (value * 100.0).round();
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        let in_range = hundredths >= i64::MIN as f64 && hundredths < i64::MAX as f64;
        if !hundredths.is_finite() || !in_range {
            return None;
        }
        Some(Self(hundredths as i64))
    }

    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// `amount / base * 100`, rounded half-up to two decimals
    ///
    /// `base` must be positive; non-positive bases yield zero.
    pub fn of(amount: Money, base: Money) -> Self {
        if !base.is_positive() {
            return Self::zero();
        }
        let num = amount.cents() as i128 * 10_000;
        let den = base.cents() as i128;
        Self(clamp_i64(div_round_half_up(num, den)))
    }

    /// The share of `base` this percentage represents, rounded to the cent
    pub fn apply(&self, base: Money) -> Money {
        let num = base.cents() as i128 * self.0 as i128;
        Money::from_cents(clamp_i64(div_round_half_up(num, 10_000)))
    }
}

fn clamp_i64(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Integer division rounding halves away from zero (`den` > 0)
fn div_round_half_up(num: i128, den: i128) -> i128 {
    if num >= 0 {
        (2 * num + den) / (2 * den)
    } else {
        -((-2 * num + den) / (2 * den))
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        f.pad(&format!("{}{}.{:02}%", sign, abs / 100, abs % 100))
    }
}

impl Add for Percent {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Percent {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Percent {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl std::iter::Sum for Percent {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Percent::zero(), |acc, p| acc + p)
    }
}

impl<'a> std::iter::Sum<&'a Percent> for Percent {
    fn sum<I: Iterator<Item = &'a Percent>>(iter: I) -> Self {
        iter.fold(Percent::zero(), |acc, p| acc + *p)
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Percent::from_f64(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid percentage: {}", value)))
    }
}

//! Exact monetary amounts with 2 fractional digits on the wire.
//!
//! Uses `rust_decimal` internally. Unlike the wire format, arithmetic keeps
//! full precision; rounding to cents (half-up) happens only when a value is
//! rendered, so intermediate interest and fee products never compound
//! rounding error.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

/// A monetary amount backed by an exact decimal.
///
/// # Examples
///
/// ```
/// use fixed_width_batch::Money;
///
/// let amount = Money::from_implied("000010050").unwrap();
/// assert_eq!(amount.to_string(), "100.50");
/// assert_eq!(amount.to_implied(11), "00000010050");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Money(Decimal);

impl Money {
    /// Number of implied fractional digits in every fixed-width field.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Wraps an exact decimal without rounding it.
    pub fn new(value: Decimal) -> Self {
        Money(value)
    }

    /// Builds an amount from a whole number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, Self::SCALE))
    }

    /// Parses an implied-decimal field such as `"000010050"` (= 100.50).
    ///
    /// Surrounding whitespace is ignored and a leading sign is accepted.
    /// Returns `None` for empty input or anything that is not an integer.
    pub fn from_implied(field: &str) -> Option<Self> {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<i64>().ok().map(Self::from_cents)
    }

    /// The exact, unrounded value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// The value rounded half-up (away from zero on ties) to 2 places.
    pub fn rounded(&self) -> Decimal {
        let mut r = self
            .0
            .round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        r.rescale(Self::SCALE);
        r
    }

    /// Multiplies by a rate, keeping full precision.
    pub fn times(&self, rate: Decimal) -> Self {
        Money(self.0 * rate)
    }

    /// Returns `true` if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Encodes the rounded value as a zero-padded implied-decimal field of
    /// `width` characters. Negative values carry a leading `-` inside the
    /// width. A value too large for the width is rendered in full rather
    /// than truncated.
    pub fn to_implied(&self, width: usize) -> String {
        let cents = self.rounded().mantissa();
        let digits = cents.unsigned_abs().to_string();
        if cents < 0 {
            format!("-{:0>w$}", digits, w = width.saturating_sub(1))
        } else {
            format!("{:0>width$}", digits)
        }
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

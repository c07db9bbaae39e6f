use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

/// An exact monetary amount in minor currency units (cents).
///
/// All engine arithmetic happens on the underlying integer, so repeated
/// additions never drift and zero-sum invariants hold exactly rather than
/// within a tolerance. Decimal strings exist only at the boundary: parsing
/// input and rendering output.
///
/// Signed: positive values are credits (owed to a user), negative values
/// are debts.
///
/// # Examples
///
/// ```
/// use splitledger::core::money::Money;
///
/// let price: Money = "12.34".parse().unwrap();
/// assert_eq!(price.minor(), 1234);
/// assert_eq!(price.to_string(), "12.34");
/// assert_eq!(price + Money::from_minor(66), Money::from_major(13));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

/// Errors arising from parsing or converting monetary amounts.
#[derive(Debug, Error)]
pub enum MoneyError {
    #[error("invalid monetary amount '{input}'")]
    InvalidAmount { input: String },
    #[error("amount {value} has sub-cent precision")]
    SubCentPrecision { value: Decimal },
}

impl Money {
    pub const ZERO: Money = Money(0);

    /// Construct from minor units (cents).
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Construct from whole major units (e.g. dollars).
    pub const fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    /// The amount in minor units.
    pub const fn minor(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Money {
        Money(self.0.abs())
    }

    /// Decimal representation in major units (two fractional digits).
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Convert a decimal major-unit amount, rejecting sub-cent precision.
    pub fn from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        let minor = value * Decimal::ONE_HUNDRED;
        if !minor.fract().is_zero() {
            return Err(MoneyError::SubCentPrecision { value });
        }
        minor
            .to_i64()
            .map(Money)
            .ok_or(MoneyError::SubCentPrecision { value })
    }

    /// The given percentage of this amount, rounded to the nearest cent
    /// (midpoints away from zero).
    pub fn percent(&self, pct: Decimal) -> Money {
        let share = Decimal::from(self.0) * pct / Decimal::ONE_HUNDRED;
        let rounded = share.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        Money(rounded.to_i64().unwrap_or(0))
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;
    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Decimal = s.parse().map_err(|_| MoneyError::InvalidAmount {
            input: s.to_string(),
        })?;
        Money::from_decimal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_and_display() {
        let m: Money = "12.34".parse().unwrap();
        assert_eq!(m.minor(), 1234);
        assert_eq!(m.to_string(), "12.34");
    }

    #[test]
    fn test_negative_display() {
        let m = Money::from_minor(-7);
        assert_eq!(m.to_string(), "-0.07");
    }

    #[test]
    fn test_whole_amount_parse() {
        let m: Money = "90".parse().unwrap();
        assert_eq!(m, Money::from_major(90));
    }

    #[test]
    fn test_sub_cent_rejected() {
        let err = "1.005".parse::<Money>();
        assert!(matches!(err, Err(MoneyError::SubCentPrecision { .. })));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            "abc".parse::<Money>(),
            Err(MoneyError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(150);
        let b = Money::from_minor(75);
        assert_eq!(a + b, Money::from_minor(225));
        assert_eq!(a - b, Money::from_minor(75));
        assert_eq!(-a, Money::from_minor(-150));
        assert_eq!((b - a).abs(), Money::from_minor(75));
    }

    #[test]
    fn test_sum() {
        let total: Money = [10, 20, 30].into_iter().map(Money::from_minor).sum();
        assert_eq!(total, Money::from_minor(60));
    }

    #[test]
    fn test_percent_rounds_to_cent() {
        // 33.33% of 10.00 = 3.333 → 3.33
        let m = Money::from_major(10);
        assert_eq!(m.percent(dec!(33.33)), Money::from_minor(333));
        // 50% of 0.05 = 0.025 → rounds away from zero → 0.03
        assert_eq!(Money::from_minor(5).percent(dec!(50)), Money::from_minor(3));
    }

    #[test]
    fn test_serde_transparent_minor_units() {
        let m = Money::from_minor(1234);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1234");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}

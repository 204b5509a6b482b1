use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Number of fractional digits every stored amount carries (`NUMERIC(10,2)`).
pub const AMOUNT_SCALE: u32 = 2;

/// Exclusive upper bound on the magnitude of a single stored amount.
fn amount_limit() -> Decimal {
    Decimal::new(100_000_000, 0)
}

/// A money value with exactly two fractional digits.
///
/// Wraps `rust_decimal::Decimal` so sums and differences never pick up binary
/// floating-point error. Values read back from the database are trusted as-is;
/// values coming from callers go through [`Amount::new`], which enforces the
/// `NUMERIC(10,2)` column bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// The exact zero, already at scale 2 so it renders as `0.00`.
    pub fn zero() -> Self {
        Amount(Decimal::new(0, AMOUNT_SCALE))
    }

    /// Builds an amount from a whole number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Amount(Decimal::new(cents, AMOUNT_SCALE))
    }

    /// Validates and rescales a caller-supplied decimal.
    pub fn new(value: Decimal) -> Result<Self, CoreError> {
        if value.normalize().scale() > AMOUNT_SCALE {
            return Err(CoreError::AmountOutOfRange(format!(
                "{value} has more than {AMOUNT_SCALE} decimal places"
            )));
        }
        if value.abs() >= amount_limit() {
            return Err(CoreError::AmountOutOfRange(format!(
                "{value} exceeds the maximum of 99999999.99"
            )));
        }
        let mut scaled = value;
        scaled.rescale(AMOUNT_SCALE);
        Ok(Amount(scaled))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl FromStr for Amount {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| CoreError::AmountOutOfRange(format!("'{s}' is not a decimal: {e}")))?;
        Amount::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0 - rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// Serialized as a string so the two-decimal rendering survives JSON.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Amount::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn zero_renders_with_two_decimals() {
        assert_eq!(Amount::zero().to_string(), "0.00");
        assert_eq!(Amount::default(), Amount::zero());
    }

    #[test]
    fn new_rescales_whole_numbers() {
        let amount = Amount::new(dec!(150)).unwrap();
        assert_eq!(amount.to_string(), "150.00");
        assert_eq!(amount.value().scale(), 2);
    }

    #[test]
    fn new_rejects_extra_precision_and_overflow() {
        assert!(Amount::new(dec!(1.005)).is_err());
        assert!(Amount::new(dec!(100000000)).is_err());
        assert!(Amount::new(dec!(-100000000.00)).is_err());
        // Trailing zeros beyond the scale are not extra precision.
        assert!(Amount::new(dec!(1.5000)).is_ok());
        assert!(Amount::new(dec!(99999999.99)).is_ok());
    }

    #[test]
    fn sums_are_exact() {
        let parts = [Amount::from_cents(10), Amount::from_cents(20)];
        let total: Amount = parts.iter().sum();
        assert_eq!(total, Amount::from_cents(30));
        assert_eq!(total.to_string(), "0.30");

        let empty: Vec<Amount> = Vec::new();
        assert_eq!(empty.into_iter().sum::<Amount>().to_string(), "0.00");
    }

    #[test]
    fn difference_can_go_negative() {
        let net = Amount::from_cents(5_000) - Amount::from_cents(10_000);
        assert!(net.is_negative());
        assert_eq!(net.to_string(), "-50.00");
        assert!(!Amount::zero().is_negative());
    }

    #[test]
    fn json_uses_fixed_two_decimal_strings() {
        let json = serde_json::to_string(&Amount::from_cents(15_000)).unwrap();
        assert_eq!(json, "\"150.00\"");

        let from_number: Amount = serde_json::from_str("100.5").unwrap();
        assert_eq!(from_number.to_string(), "100.50");
        let from_string: Amount = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_string, Amount::from_cents(4_200));

        assert!(serde_json::from_str::<Amount>("\"0.001\"").is_err());
    }

    #[test]
    fn json_accepts_negative_numbers_and_strings() {
        let loss: Amount = serde_json::from_str("-12.5").unwrap();
        assert_eq!(loss, Amount::from_cents(-1_250));
        let loss: Amount = serde_json::from_str("\"-12.50\"").unwrap();
        assert_eq!(loss.to_string(), "-12.50");

        let zero: Amount = serde_json::from_str("\"-0.00\"").unwrap();
        assert!(!zero.is_negative());
        assert!(serde_json::from_str::<Amount>("\"abc\"").is_err());
    }

    #[test]
    fn parses_from_str() {
        assert_eq!("  12.3 ".parse::<Amount>().unwrap().to_string(), "12.30");
        assert!("abc".parse::<Amount>().is_err());
    }
}

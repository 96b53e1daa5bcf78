//! Fixed-point currency handling
//!
//! Amounts are `rust_decimal::Decimal` values with two fractional digits.
//! On the wire they are written as decimal strings (`"3.50"`) and read from
//! either JSON numbers or strings.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Deserializer, Visitor};
use serde::Serializer;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits stored for every amount
pub const SCALE: u32 = 2;

/// Largest magnitude a `NUMERIC(10, 2)` column holds
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Round to two places (half away from zero) and fix the scale at two
///
/// A zero result is always positive, so `-0.001` is stored as `0.00`.
pub fn normalize(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(SCALE);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

/// Whether the amount fits the stored precision once rounded
pub fn in_range(amount: Decimal) -> bool {
    normalize(amount).abs() <= MAX_AMOUNT
}

/// Parse a decimal from its textual form, accepting scientific notation
pub fn parse_str(text: &str) -> Option<Decimal> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Read an amount out of a raw JSON value (number or numeric string)
pub fn from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_str(&n.to_string()),
        Value::String(s) => parse_str(s),
        _ => None,
    }
}

pub fn serialize<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&normalize(*amount).to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(AmountVisitor).map(normalize)
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal amount as a number or string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
        // Shortest round-trip text keeps 3.5 as 3.5 rather than 3.4999...
        parse_str(&v.to_string()).ok_or_else(|| E::custom(format!("invalid amount: {}", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
        parse_str(v).ok_or_else(|| E::custom(format!("invalid amount: {}", v)))
    }
}

/// Same wire format for optional amounts
pub mod option {
    use super::*;
    use serde::Deserialize;

    pub fn serialize<S>(amount: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match amount {
            Some(amount) => super::serialize(amount, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(deserialize_with = "crate::core::money::deserialize")] Decimal);

        Option::<Wrapper>::deserialize(deserializer).map(|w| w.map(|Wrapper(d)| d))
    }
}

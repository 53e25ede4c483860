use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::core_math::{mul_div, pow10_u256, U256, PRICE_DECIMALS};
use crate::utils::error::CurveError;

/// Non-negative fixed point decimal, stored as `value * 10^PRICE_DECIMALS`.
///
/// Every price the default curve produces is exactly representable, from
/// `10^-12` (step `10^-18`) up to just under `10^39`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price {
    atomics: U256,
}

impl Price {
    pub const DECIMAL_PLACES: u32 = PRICE_DECIMALS;

    pub fn zero() -> Self {
        Self {
            atomics: U256::zero(),
        }
    }

    pub fn one() -> Self {
        Self::from_atomics(scale())
    }

    pub fn from_atomics(atomics: U256) -> Self {
        Self { atomics }
    }

    pub fn atomics(&self) -> U256 {
        self.atomics
    }

    pub fn is_zero(&self) -> bool {
        self.atomics.is_zero()
    }

    /// Shortest `f64` representation, rounded half up to `DECIMAL_PLACES`.
    pub fn from_f64(value: f64) -> Result<Self, CurveError> {
        if !value.is_finite() || value < 0.0 {
            return Err(CurveError::InvalidInput(format!(
                "price must be finite and non-negative, got {}",
                value
            )));
        }
        parse_atomics(&format!("{:e}", value), true).map(Self::from_atomics)
    }

    pub fn to_f64(&self) -> f64 {
        // Display output is always a valid float literal.
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    /// Product rounded down to `DECIMAL_PLACES`; `None` on overflow.
    pub fn checked_mul(&self, other: &Price) -> Option<Price> {
        mul_div(self.atomics, other.atomics, scale()).map(Self::from_atomics)
    }

    /// Quotient rounded down to `DECIMAL_PLACES`; `None` when `other` is zero.
    pub fn checked_div(&self, other: &Price) -> Option<Price> {
        mul_div(self.atomics, scale(), other.atomics).map(Self::from_atomics)
    }
}

fn scale() -> U256 {
    U256::from(10u64).pow(U256::from(PRICE_DECIMALS))
}

// Accepts `123`, `0.5`, `.5`, `1.25e-7` and `4E20`. With `round_excess` the
// digits past `PRICE_DECIMALS` are rounded half up instead of rejected.
fn parse_atomics(input: &str, round_excess: bool) -> Result<U256, CurveError> {
    let invalid = |reason: &str| CurveError::InvalidInput(format!("{}: {:?}", reason, input));

    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if trimmed.starts_with('-') {
        return Err(invalid("price must be non-negative"));
    }

    let (mantissa, exponent) = match trimmed.find(|c: char| c == 'e' || c == 'E') {
        Some(index) => {
            let exponent = trimmed[index + 1..]
                .parse::<i64>()
                .map_err(|_| invalid("malformed exponent"))?;
            (&trimmed[..index], exponent)
        }
        None => (trimmed, 0),
    };

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part) {
        return Err(invalid("malformed decimal"));
    }

    let digits = format!("{}{}", int_part, frac_part);
    // value == digits * 10^-scale
    let shift = (frac_part.len() as i64)
        .checked_sub(exponent)
        .and_then(|scale| (PRICE_DECIMALS as i64).checked_sub(scale))
        .ok_or_else(|| invalid("malformed exponent"))?;

    if shift >= 0 {
        let factor = u32::try_from(shift)
            .ok()
            .and_then(pow10_u256)
            .ok_or_else(|| invalid("price too large"))?;
        return digits_to_u256(&digits)
            .and_then(|value| value.checked_mul(factor))
            .ok_or_else(|| invalid("price too large"));
    }

    let dropped = usize::try_from(-shift).unwrap_or(usize::MAX);
    let (kept, excess) = if dropped >= digits.len() {
        ("", digits.as_str())
    } else {
        digits.split_at(digits.len() - dropped)
    };

    if excess.bytes().all(|b| b == b'0') {
        return digits_to_u256(kept).ok_or_else(|| invalid("price too large"));
    }
    if !round_excess {
        return Err(invalid(&format!(
            "price has more than {} decimal places",
            PRICE_DECIMALS
        )));
    }

    // The first excess digit is only significant when nothing was padded in
    // front of it.
    let round_up = dropped <= digits.len() && excess.as_bytes()[0] >= b'5';
    let value = digits_to_u256(kept).ok_or_else(|| invalid("price too large"))?;
    if round_up {
        value
            .checked_add(U256::one())
            .ok_or_else(|| invalid("price too large"))
    } else {
        Ok(value)
    }
}

fn digits_to_u256(digits: &str) -> Option<U256> {
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Some(U256::zero());
    }
    U256::from_dec_str(significant).ok()
}

impl FromStr for Price {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_atomics(s, false).map(Self::from_atomics)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let places = PRICE_DECIMALS as usize;
        let digits = format!("{:0>width$}", self.atomics.to_string(), width = places + 1);
        let (int_part, frac_part) = digits.split_at(digits.len() - places);
        let frac_part = frac_part.trim_end_matches('0');

        if frac_part.is_empty() {
            write!(f, "{}", int_part)
        } else {
            write!(f, "{}.{}", int_part, frac_part)
        }
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

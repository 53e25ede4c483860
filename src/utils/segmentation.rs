use super::core_math::{ilog10_u256, pow10_f64, U256, PRICE_DECIMALS};
use super::error::CurveError;

/// Ticks per decade of price.
pub const DECADE_WIDTH: i32 = 9_000_000;
/// `DECADE_WIDTH == 9 * 10^RESOLUTION_EXPONENT`.
pub const RESOLUTION_EXPONENT: u32 = 6;
/// Tick of the smallest price, `10^-12`.
pub const MIN_TICK: i32 = -108_000_000;
/// Tick of the largest price, `10^38`.
pub const MAX_TICK: i32 = 342_000_000;

const MAX_RESOLUTION_EXPONENT: u32 = 8;

/// Splits the tick line into decades of `decade_width` ticks. Decade `f`
/// covers prices `[10^f, 10^(f+1))` with a constant step of `10^(f - k)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segmentation {
    decade_width: i64,
    resolution: u32,
}

impl Segmentation {
    pub const DEFAULT: Segmentation = Segmentation {
        decade_width: DECADE_WIDTH as i64,
        resolution: RESOLUTION_EXPONENT,
    };

    /// The width must be `9 * 10^k` so every step inside a decade is a power
    /// of ten.
    pub fn new(decade_width: i32) -> Result<Self, CurveError> {
        let resolution = (1..=MAX_RESOLUTION_EXPONENT)
            .find(|k| 9 * 10_i64.pow(*k) == decade_width as i64)
            .ok_or_else(|| {
                CurveError::InvalidConfig(format!(
                    "decade width must be 9 * 10^k with 1 <= k <= {}, got {}",
                    MAX_RESOLUTION_EXPONENT, decade_width
                ))
            })?;

        Ok(Self {
            decade_width: decade_width as i64,
            resolution,
        })
    }

    pub fn decade_width(&self) -> i64 {
        self.decade_width
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn decade_of_tick(&self, tick: i64) -> i32 {
        tick.div_euclid(self.decade_width) as i32
    }

    pub fn decade_start(&self, decade: i32) -> i64 {
        decade as i64 * self.decade_width
    }

    /// Position inside the decade, always in `[0, decade_width)`.
    pub fn offset_in_decade(&self, tick: i64) -> i64 {
        tick.rem_euclid(self.decade_width)
    }
}

impl Default for Segmentation {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// `z` such that `10^z <= price < 10^(z+1)`.
///
/// `log10` alone misclassifies values sitting on a power of ten (it can return
/// `0.9999999999999999` for a price the encoder produced as exactly `10`), so
/// the estimate is checked against the same powers the encoder uses.
pub fn decade_of_price(price: f64) -> Result<i32, CurveError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(CurveError::InvalidInput(format!(
            "price must be positive and finite, got {}",
            price
        )));
    }

    let mut decade = price.log10().floor() as i32;
    if price < pow10_f64(decade) {
        decade -= 1;
    } else if price >= pow10_f64(decade + 1) {
        decade += 1;
    }
    Ok(decade)
}

/// Exact counterpart of [`decade_of_price`] on fixed point atomics.
pub fn decade_of_atomics(atomics: U256) -> Result<i32, CurveError> {
    let digits = ilog10_u256(atomics)
        .ok_or_else(|| CurveError::InvalidInput("price must be positive, got 0".to_string()))?;
    Ok(digits as i32 - PRICE_DECIMALS as i32)
}

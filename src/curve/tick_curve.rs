use crate::config::{CurveConfig, OutOfRangePolicy, DEFAULT_PRECISION_TOLERANCE};
use crate::models::price::Price;
use crate::models::tick::{Rounding, TickDecode};
use crate::utils::core_math::{
    atomics_to_tick, relative_error, tick_to_atomics, MAX_ATOMIC_EXPONENT, PRICE_DECIMALS,
};
use crate::utils::error::CurveError;
use crate::utils::price_calcs::{price_to_tick, tick_to_price};
use crate::utils::segmentation::{self, Segmentation, MAX_TICK, MIN_TICK};

/// A validated tick curve: segmentation, tick bounds and the out of range
/// policy. Cheap to copy, holds no state beyond its configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickCurve {
    segmentation: Segmentation,
    min_tick: i32,
    max_tick: i32,
    out_of_range: OutOfRangePolicy,
    precision_tolerance: f64,
}

impl Default for TickCurve {
    fn default() -> Self {
        Self {
            segmentation: Segmentation::DEFAULT,
            min_tick: MIN_TICK,
            max_tick: MAX_TICK,
            out_of_range: OutOfRangePolicy::Reject,
            precision_tolerance: DEFAULT_PRECISION_TOLERANCE,
        }
    }
}

impl TickCurve {
    pub fn new(config: CurveConfig) -> Result<Self, CurveError> {
        let segmentation = Segmentation::new(config.decade_width)?;

        if config.min_tick >= config.max_tick {
            return Err(CurveError::InvalidConfig(format!(
                "min_tick {} must be below max_tick {}",
                config.min_tick, config.max_tick
            )));
        }

        // Smallest step must land on a whole atomic.
        let lowest_decade = segmentation.decade_of_tick(config.min_tick as i64) as i64;
        let finest_step = lowest_decade - segmentation.resolution() as i64;
        if finest_step < -(PRICE_DECIMALS as i64) {
            return Err(CurveError::InvalidConfig(format!(
                "min_tick {} needs a price step of 10^{}, below the 10^-{} price resolution",
                config.min_tick, finest_step, PRICE_DECIMALS
            )));
        }

        // Prices stay under 10^(top + 1), which has to fit 256 bits.
        let highest_decade = segmentation.decade_of_tick(config.max_tick as i64) as i64;
        if highest_decade + 1 + PRICE_DECIMALS as i64 > MAX_ATOMIC_EXPONENT as i64 {
            return Err(CurveError::InvalidConfig(format!(
                "max_tick {} reaches prices up to 10^{}, beyond the largest representable price",
                config.max_tick,
                highest_decade + 1
            )));
        }

        if !config.precision_tolerance.is_finite() || config.precision_tolerance < 0.0 {
            return Err(CurveError::InvalidConfig(format!(
                "precision_tolerance must be finite and non-negative, got {}",
                config.precision_tolerance
            )));
        }

        Ok(Self {
            segmentation,
            min_tick: config.min_tick,
            max_tick: config.max_tick,
            out_of_range: config.out_of_range,
            precision_tolerance: config.precision_tolerance,
        })
    }

    pub fn config(&self) -> CurveConfig {
        CurveConfig {
            decade_width: self.segmentation.decade_width() as i32,
            min_tick: self.min_tick,
            max_tick: self.max_tick,
            out_of_range: self.out_of_range,
            precision_tolerance: self.precision_tolerance,
        }
    }

    pub fn min_tick(&self) -> i32 {
        self.min_tick
    }

    pub fn max_tick(&self) -> i32 {
        self.max_tick
    }

    pub fn decade_width(&self) -> i32 {
        self.segmentation.decade_width() as i32
    }

    pub fn resolution_exponent(&self) -> u32 {
        self.segmentation.resolution()
    }

    pub fn out_of_range_policy(&self) -> OutOfRangePolicy {
        self.out_of_range
    }

    pub fn precision_tolerance(&self) -> f64 {
        self.precision_tolerance
    }

    pub fn decade_of_tick(&self, tick: i32) -> i32 {
        self.segmentation.decade_of_tick(tick as i64)
    }

    pub fn decade_of_price(&self, price: f64) -> Result<i32, CurveError> {
        segmentation::decade_of_price(price)
    }

    pub fn min_price(&self) -> f64 {
        tick_to_price(&self.segmentation, self.min_tick as i64)
    }

    pub fn max_price(&self) -> f64 {
        tick_to_price(&self.segmentation, self.max_tick as i64)
    }

    pub fn min_price_exact(&self) -> Result<Price, CurveError> {
        self.encode_exact(self.min_tick)
    }

    pub fn max_price_exact(&self) -> Result<Price, CurveError> {
        self.encode_exact(self.max_tick)
    }

    pub fn encode(&self, tick: i32) -> Result<f64, CurveError> {
        let tick = self.bound_tick(tick)?;
        Ok(tick_to_price(&self.segmentation, tick as i64))
    }

    /// Nearest tick for `price`. Prices off the curve follow the configured
    /// [`OutOfRangePolicy`]; invalid prices are always an error.
    pub fn decode(&self, price: f64) -> Result<i32, CurveError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(CurveError::InvalidInput(format!(
                "price must be positive and finite, got {}",
                price
            )));
        }

        let (min_price, max_price) = (self.min_price(), self.max_price());
        if price < min_price || price > max_price {
            return self.out_of_range_tick(price < min_price, price, min_price, max_price);
        }

        let tick = price_to_tick(&self.segmentation, price)?;
        self.checked_tick(tick)
    }

    /// Decodes and re-encodes, flagging the result when the re-encoded price
    /// drifts from `price` by more than the configured tolerance.
    pub fn decode_checked(&self, price: f64) -> Result<TickDecode, CurveError> {
        self.decode_with_tolerance(price, self.precision_tolerance)
    }

    pub fn decode_with_tolerance(&self, price: f64, tolerance: f64) -> Result<TickDecode, CurveError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(CurveError::InvalidInput(format!(
                "tolerance must be finite and non-negative, got {}",
                tolerance
            )));
        }

        let tick = self.decode(price)?;
        let encoded_price = tick_to_price(&self.segmentation, tick as i64);
        let error = relative_error(price, encoded_price);

        Ok(TickDecode {
            tick,
            price,
            encoded_price,
            relative_error: error,
            precision_loss: error > tolerance,
        })
    }

    pub fn encode_exact(&self, tick: i32) -> Result<Price, CurveError> {
        let tick = self.bound_tick(tick)?;
        tick_to_atomics(&self.segmentation, tick as i64)
            .map(Price::from_atomics)
            .ok_or_else(|| {
                CurveError::InvalidConfig(format!("tick {} has no exact price on this curve", tick))
            })
    }

    pub fn decode_exact(&self, price: &Price, rounding: Rounding) -> Result<i32, CurveError> {
        if price.is_zero() {
            return Err(CurveError::InvalidInput("price must be positive, got 0".to_string()));
        }

        let (min_price, max_price) = (self.min_price_exact()?, self.max_price_exact()?);
        if *price < min_price || *price > max_price {
            return self.out_of_range_tick(*price < min_price, price, &min_price, &max_price);
        }

        let tick = atomics_to_tick(&self.segmentation, price.atomics(), rounding).ok_or_else(|| {
            CurveError::InvalidInput(format!("price {} is finer than the curve resolution", price))
        })?;
        self.checked_tick(tick)
    }

    fn bound_tick(&self, tick: i32) -> Result<i32, CurveError> {
        if (self.min_tick..=self.max_tick).contains(&tick) {
            return Ok(tick);
        }
        match self.out_of_range {
            OutOfRangePolicy::Reject => {
                Err(CurveError::out_of_range(tick, self.min_tick, self.max_tick))
            }
            OutOfRangePolicy::Clamp => Ok(tick.clamp(self.min_tick, self.max_tick)),
        }
    }

    fn out_of_range_tick<P: std::fmt::Display>(
        &self,
        below: bool,
        price: P,
        min_price: P,
        max_price: P,
    ) -> Result<i32, CurveError> {
        match (self.out_of_range, below) {
            (OutOfRangePolicy::Reject, _) => Err(CurveError::out_of_range(price, min_price, max_price)),
            (OutOfRangePolicy::Clamp, true) => Ok(self.min_tick),
            (OutOfRangePolicy::Clamp, false) => Ok(self.max_tick),
        }
    }

    fn checked_tick(&self, tick: i64) -> Result<i32, CurveError> {
        i32::try_from(tick)
            .ok()
            .filter(|tick| (self.min_tick..=self.max_tick).contains(tick))
            .ok_or_else(|| CurveError::out_of_range(tick, self.min_tick as i64, self.max_tick as i64))
    }
}

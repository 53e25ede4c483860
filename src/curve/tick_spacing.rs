use crate::models::price::Price;
use crate::models::tick::{Rounding, TickRange};
use crate::utils::error::CurveError;

use super::tick_curve::TickCurve;

// Pools only accept ticks that are multiples of their tick spacing. These
// helpers snap curve ticks onto that grid without leaving the curve.
impl TickCurve {
    /// Smallest multiple of `spacing` that is `>= min_tick`.
    pub fn min_valid_tick(&self, spacing: i32) -> Result<i32, CurveError> {
        let (lower, _) = self.valid_bounds(spacing)?;
        Ok(lower)
    }

    /// Largest multiple of `spacing` that is `<= max_tick`.
    pub fn max_valid_tick(&self, spacing: i32) -> Result<i32, CurveError> {
        let (_, upper) = self.valid_bounds(spacing)?;
        Ok(upper)
    }

    /// Nearest multiple of `spacing`, halfway ticks go up. The result is
    /// always a valid tick, so ticks past the ends snap to the outermost one.
    pub fn closest_valid_tick(&self, tick: i32, spacing: i32) -> Result<i32, CurveError> {
        let (lower, upper) = self.valid_bounds(spacing)?;
        let spacing = spacing as i64;
        let snapped = (tick as i64 + spacing / 2).div_euclid(spacing) * spacing;
        Ok(snapped.clamp(lower as i64, upper as i64) as i32)
    }

    /// Tick range covering `[lower, upper]`: the lower price is floored and
    /// snapped down, the upper one ceiled and snapped up.
    pub fn tick_range(&self, lower: &Price, upper: &Price, spacing: i32) -> Result<TickRange, CurveError> {
        if lower >= upper {
            return Err(CurveError::InvalidInput(format!(
                "lower price {} must be below upper price {}",
                lower, upper
            )));
        }
        let (min_valid, max_valid) = self.valid_bounds(spacing)?;

        let lower_tick = self.decode_exact(lower, Rounding::Floor)? as i64;
        let upper_tick = self.decode_exact(upper, Rounding::Ceil)? as i64;

        let spacing = spacing as i64;
        let lower_tick = lower_tick.div_euclid(spacing) * spacing;
        let upper_tick = -((-upper_tick).div_euclid(spacing) * spacing);

        let lower_tick = lower_tick.clamp(min_valid as i64, max_valid as i64) as i32;
        let upper_tick = upper_tick.clamp(min_valid as i64, max_valid as i64) as i32;
        if lower_tick >= upper_tick {
            return Err(CurveError::out_of_range(
                format!("[{}, {}]", lower, upper),
                min_valid,
                max_valid,
            ));
        }

        TickRange::new(lower_tick, upper_tick)
    }

    /// Tick range for `[price / factor, price * factor]`. Both ends saturate
    /// at the curve's price bounds.
    pub fn band_around(&self, price: &Price, factor: &Price, spacing: i32) -> Result<TickRange, CurveError> {
        if price.is_zero() {
            return Err(CurveError::InvalidInput("price must be positive, got 0".to_string()));
        }
        if *factor <= Price::one() {
            return Err(CurveError::InvalidInput(format!(
                "band factor must be greater than 1, got {}",
                factor
            )));
        }

        let (min_price, max_price) = (self.min_price_exact()?, self.max_price_exact()?);

        let lower = price.checked_div(factor).unwrap_or(min_price).max(min_price);
        let upper = price.checked_mul(factor).unwrap_or(max_price).min(max_price);

        self.tick_range(&lower, &upper, spacing)
    }

    fn valid_bounds(&self, spacing: i32) -> Result<(i32, i32), CurveError> {
        if spacing <= 0 {
            return Err(CurveError::InvalidInput(format!(
                "tick spacing must be positive, got {}",
                spacing
            )));
        }

        let spacing_wide = spacing as i64;
        let (min_tick, max_tick) = (self.min_tick() as i64, self.max_tick() as i64);
        let lower = -((-min_tick).div_euclid(spacing_wide) * spacing_wide);
        let upper = max_tick.div_euclid(spacing_wide) * spacing_wide;

        if lower > upper {
            return Err(CurveError::out_of_range(
                format!("tick spacing {}", spacing),
                min_tick,
                max_tick,
            ));
        }
        Ok((lower as i32, upper as i32))
    }
}

use super::core_math::pow10_f64;
use super::error::CurveError;
use super::segmentation::{decade_of_price, Segmentation};

/// `10^f + (tick - f*d) * 10^(f - k)` with `f = floor(tick / d)`.
///
/// Evaluated as `(10^k + offset) * 10^(f - k)`: the integer factor is exact
/// in an `f64`, so whenever `10^|f - k|` is exact too (`|f - k| <= 22`) the
/// price is the correctly rounded value of the exact decimal.
pub fn tick_to_price(segmentation: &Segmentation, tick: i64) -> f64 {
    let decade = segmentation.decade_of_tick(tick);
    let offset = segmentation.offset_in_decade(tick);
    if offset == 0 {
        return pow10_f64(decade);
    }

    let resolution = segmentation.resolution() as i32;
    let significand = (10_i64.pow(resolution as u32) + offset) as f64;
    let step_exp = decade - resolution;
    if step_exp >= 0 {
        significand * pow10_f64(step_exp)
    } else {
        significand / pow10_f64(-step_exp)
    }
}

/// Inverse of [`tick_to_price`], rounded to the nearest tick.
///
/// Solving the encoder for the tick inside decade `z` gives
/// `tick = z*d + (price - 10^z) / 10^(z - k)`. The decade comes from
/// [`decade_of_price`], never from the textual form of the price. A price
/// within half a step under `10^(z+1)` rounds up to the first tick of the
/// next decade, so the seam is handled by the rounding and not by a special
/// case.
pub fn price_to_tick(segmentation: &Segmentation, price: f64) -> Result<i64, CurveError> {
    let decade = decade_of_price(price)?;
    let base = pow10_f64(decade);
    let step = pow10_f64(decade - segmentation.resolution() as i32);

    let offset = ((price - base) / step).round() as i64;
    Ok(segmentation.decade_start(decade) + offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::core_math::relative_error;

    #[test]
    fn test_tick_to_price() {
        let seg = Segmentation::default();

        assert_eq!(tick_to_price(&seg, 0), 1.0);
        assert_eq!(tick_to_price(&seg, 9_000_000), 10.0);
        assert_eq!(tick_to_price(&seg, -9_000_000), 0.1);
        assert_eq!(tick_to_price(&seg, -108_000_000), 1e-12);
        assert_eq!(tick_to_price(&seg, 342_000_000), 1e38);

        let cases = [
            (100, 1.0001),
            (-100, 0.99999),
            (8_999_900, 9.9999),
            (9_000_100, 10.001),
            (-9_000_100, 0.099999),
            (8_999_999, 9.999999),
        ];
        for (tick, expected) in cases {
            let price = tick_to_price(&seg, tick);
            assert_eq!(price, expected, "Tick {} should encode to {}", tick, expected);
        }
    }

    #[test]
    fn test_tick_to_price_high_decades() {
        let seg = Segmentation::default();
        // 10^(f - 6) is no longer an exact f64 past decade 28.
        for (tick, expected) in [(261_000_001, 1.000001e29), (341_999_999, 9.999999e37)] {
            let price = tick_to_price(&seg, tick);
            assert!(
                relative_error(expected, price) <= 1e-15,
                "Tick {} encoded to {}, expected {}",
                tick,
                price,
                expected
            );
        }
    }

    #[test]
    fn test_price_to_tick() {
        let seg = Segmentation::default();

        assert_eq!(price_to_tick(&seg, 1.0).unwrap(), 0);
        assert_eq!(price_to_tick(&seg, 1.0001).unwrap(), 100);
        assert_eq!(price_to_tick(&seg, 0.99999).unwrap(), -100);
        assert_eq!(price_to_tick(&seg, 9.9999).unwrap(), 8_999_900);
        assert_eq!(price_to_tick(&seg, 10.001).unwrap(), 9_000_100);
        assert_eq!(price_to_tick(&seg, 0.099999).unwrap(), -9_000_100);
    }

    #[test]
    fn test_price_to_tick_at_decade_seam() {
        let seg = Segmentation::default();

        // 9.999999999999998 is the float just under ten, it belongs to tick 9e6.
        let below_ten = f64::from_bits(10.0_f64.to_bits() - 1);
        assert_eq!(price_to_tick(&seg, below_ten).unwrap(), 9_000_000);

        // Half a step under the seam still rounds to the last tick of decade 0.
        assert_eq!(price_to_tick(&seg, 9.9999986).unwrap(), 8_999_999);
        assert_eq!(price_to_tick(&seg, 9.9999996).unwrap(), 9_000_000);
    }

    #[test]
    fn test_price_to_tick_other_resolution() {
        let seg = Segmentation::new(90).unwrap();

        assert_eq!(tick_to_price(&seg, 1), 1.1);
        assert_eq!(price_to_tick(&seg, 1.1).unwrap(), 1);
        assert_eq!(price_to_tick(&seg, 55.0).unwrap(), 135);
        assert_eq!(price_to_tick(&seg, 0.95).unwrap(), -5);
    }

    #[test]
    fn test_price_to_tick_rejects_invalid() {
        let seg = Segmentation::default();
        assert!(price_to_tick(&seg, 0.0).is_err());
        assert!(price_to_tick(&seg, -2.0).is_err());
        assert!(price_to_tick(&seg, f64::NAN).is_err());
    }
}

//! Tick ↔ price mapping on a piecewise geometric curve.
//!
//! Each power of ten of price is one decade of [`DECADE_WIDTH`] ticks, with a
//! constant step inside the decade:
//!
//! ```text
//! price(tick) = 10^f + (tick - f * d) * 10^(f - 6),   f = floor(tick / d)
//! ```
//!
//! Relative resolution is between `10^-7` and `10^-6` at every scale, from
//! `10^-12` at [`MIN_TICK`] to `10^38` at [`MAX_TICK`].
//!
//! [`encode`] and [`decode`] work on `f64` with the default curve. A
//! [`TickCurve`] carries a custom configuration and the exact [`Price`]
//! variants.

pub mod config;
pub mod curve;
pub mod models;
pub mod utils;

pub use config::{CurveConfig, OutOfRangePolicy};
pub use curve::tick_curve::TickCurve;
pub use models::price::Price;
pub use models::tick::{Rounding, TickDecode, TickRange};
pub use utils::core_math::PRICE_DECIMALS;
pub use utils::error::CurveError;
pub use utils::segmentation::{DECADE_WIDTH, MAX_TICK, MIN_TICK, RESOLUTION_EXPONENT};

/// Price of `tick` on the default curve.
pub fn encode(tick: i32) -> Result<f64, CurveError> {
    TickCurve::default().encode(tick)
}

/// Nearest tick for `price` on the default curve.
pub fn decode(price: f64) -> Result<i32, CurveError> {
    TickCurve::default().decode(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_scenarios() {
        assert_eq!(encode(0).unwrap(), 1.0);
        assert_eq!(decode(1.0).unwrap(), 0);
        assert_eq!(decode(1.0001).unwrap(), 100);
        assert_eq!(decode(0.99999).unwrap(), -100);
        assert_eq!(decode(9.9999).unwrap(), 8_999_900);
        assert_eq!(decode(10.001).unwrap(), 9_000_100);
        assert_eq!(decode(0.099999).unwrap(), -9_000_100);

        let more = [
            (0.099998, -9_000_200),
            (0.94998, -500_200),
            (0.94999, -500_100),
            (0.99998, -200),
            (1.0002, 200),
            (10.002, 9_000_200),
        ];
        for (price, tick) in more {
            assert_eq!(decode(price).unwrap(), tick, "{} should decode to {}", price, tick);
            assert_eq!(encode(tick).unwrap(), price, "Tick {} should encode to {}", tick, price);
        }
    }

    #[test]
    fn test_literal_scenarios_exact() {
        let curve = TickCurve::default();
        let cases = [
            ("1", 0),
            ("1.0001", 100),
            ("0.99999", -100),
            ("9.9999", 8_999_900),
            ("10.001", 9_000_100),
            ("0.099999", -9_000_100),
            ("0.099998", -9_000_200),
            ("0.94998", -500_200),
            ("0.94999", -500_100),
            ("0.99998", -200),
            ("1.0002", 200),
            ("10.002", 9_000_200),
        ];

        for (raw, tick) in cases {
            let price: Price = raw.parse().unwrap();
            assert_eq!(curve.decode_exact(&price, Rounding::Nearest).unwrap(), tick);
            assert_eq!(curve.encode_exact(tick).unwrap(), price, "Tick {} should encode to {}", tick, raw);
        }
    }

    #[test]
    fn test_error_kinds() {
        assert!(matches!(decode(0.0), Err(CurveError::InvalidInput(_))));
        assert!(matches!(decode(-3.5), Err(CurveError::InvalidInput(_))));
        assert!(matches!(decode(f64::NAN), Err(CurveError::InvalidInput(_))));
        assert!(matches!(decode(1e-20), Err(CurveError::OutOfRange { .. })));
        assert!(matches!(encode(MIN_TICK - 1), Err(CurveError::OutOfRange { .. })));
        assert!(matches!(encode(MAX_TICK + 1), Err(CurveError::OutOfRange { .. })));
    }

    #[test]
    fn test_f64_and_exact_agree() {
        let curve = TickCurve::default();
        for tick in [MIN_TICK, -9_000_001, -1, 0, 1, 8_999_999, 123_456_789, MAX_TICK] {
            let exact = curve.encode_exact(tick).unwrap();
            let float = curve.encode(tick).unwrap();
            assert_eq!(exact.to_f64(), float, "Tick {} diverges", tick);
            assert_eq!(Price::from_f64(float).unwrap(), exact);
        }
    }
}

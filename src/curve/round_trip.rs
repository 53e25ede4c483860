//! Round trip assertions shared by the curve tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::tick::Rounding;
use crate::utils::core_math::relative_error;

use super::tick_curve::TickCurve;

pub(crate) fn assert_tick_round_trip(curve: &TickCurve, ticks: impl IntoIterator<Item = i32>) {
    for tick in ticks {
        let price = curve.encode(tick).unwrap();
        let decoded = curve.decode(price).unwrap();
        assert_eq!(decoded, tick, "Tick {} encoded to {} but decoded to {}", tick, price, decoded);
    }
}

pub(crate) fn assert_exact_tick_round_trip(curve: &TickCurve, ticks: impl IntoIterator<Item = i32>) {
    for tick in ticks {
        let price = curve.encode_exact(tick).unwrap();
        for rounding in [Rounding::Nearest, Rounding::Floor, Rounding::Ceil] {
            let decoded = curve.decode_exact(&price, rounding).unwrap();
            assert_eq!(
                decoded, tick,
                "Tick {} encoded to {} but decoded to {} with {:?}",
                tick, price, decoded, rounding
            );
        }
    }
}

pub(crate) fn assert_price_round_trip(curve: &TickCurve, prices: &[f64], tolerance: f64) {
    for price in prices {
        let tick = curve.decode(*price).unwrap();
        let encoded = curve.encode(tick).unwrap();
        let error = relative_error(*price, encoded);
        assert!(
            error <= tolerance,
            "Price {} decoded to tick {} which encodes to {} (error {} > {})",
            price,
            tick,
            encoded,
            error,
            tolerance
        );
    }
}

/// Ticks within `radius` of every decade start inside the curve.
pub(crate) fn seam_ticks(curve: &TickCurve, radius: i32) -> Vec<i32> {
    let lowest = curve.decade_of_tick(curve.min_tick());
    let highest = curve.decade_of_tick(curve.max_tick());

    (lowest..=highest + 1)
        .flat_map(|decade| {
            let start = decade as i64 * curve.decade_width() as i64;
            (start - radius as i64)..=(start + radius as i64)
        })
        .filter(|tick| (curve.min_tick() as i64..=curve.max_tick() as i64).contains(tick))
        .map(|tick| tick as i32)
        .collect()
}

pub(crate) fn sample_ticks(curve: &TickCurve, count: usize, seed: u64) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| rng.gen_range(curve.min_tick()..=curve.max_tick()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CurveConfig;

    #[test]
    fn test_seam_ticks_stay_in_range() {
        let curve = TickCurve::default();
        let ticks = seam_ticks(&curve, 2);

        assert!(ticks.iter().all(|t| *t >= curve.min_tick() && *t <= curve.max_tick()));
        assert!(ticks.contains(&curve.min_tick()));
        assert!(ticks.contains(&curve.max_tick()));
        assert!(ticks.contains(&-1) && ticks.contains(&0) && ticks.contains(&1));
        assert!(!ticks.contains(&(curve.min_tick() - 1)));
        // 49 interior seams with 5 ticks each, plus 3 at each end.
        assert_eq!(ticks.len(), 49 * 5 + 3 + 3);
    }

    #[test]
    fn test_sample_ticks_deterministic() {
        let curve = TickCurve::default();
        assert_eq!(sample_ticks(&curve, 100, 42), sample_ticks(&curve, 100, 42));
        assert_ne!(sample_ticks(&curve, 100, 42), sample_ticks(&curve, 100, 43));
    }

    #[test]
    #[should_panic(expected = "decoded to tick")]
    fn test_price_round_trip_reports_drift() {
        let curve = TickCurve::new(CurveConfig {
            decade_width: 90,
            min_tick: -900,
            max_tick: 900,
            ..CurveConfig::default()
        })
        .unwrap();
        // 1.14 is 40% of a 0.1 step away from tick 1.
        assert_price_round_trip(&curve, &[1.14], 1e-6);
    }
}

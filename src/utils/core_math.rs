use uint::construct_uint;

use crate::models::tick::Rounding;

use super::segmentation::Segmentation;

construct_uint! {
    pub struct U256(4);
}

construct_uint! {
    pub struct U512(8);
}

/// Fractional digits carried by a fixed point price. A price `p` is stored as
/// the integer `p * 10^PRICE_DECIMALS`.
pub const PRICE_DECIMALS: u32 = 24;

/// Largest `e` with `10^e <= U256::MAX`.
pub const MAX_ATOMIC_EXPONENT: u32 = 77;

const POW10_F64_MIN_EXP: i32 = -30;

// Literals are correctly rounded by the compiler, `powi` is not.
const POW10_F64: [f64; 91] = [
    1e-30, 1e-29, 1e-28, 1e-27, 1e-26, 1e-25, 1e-24,
    1e-23, 1e-22, 1e-21, 1e-20, 1e-19, 1e-18, 1e-17,
    1e-16, 1e-15, 1e-14, 1e-13, 1e-12, 1e-11, 1e-10,
    1e-9, 1e-8, 1e-7, 1e-6, 1e-5, 1e-4, 1e-3,
    1e-2, 1e-1, 1e0, 1e1, 1e2, 1e3, 1e4,
    1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11,
    1e12, 1e13, 1e14, 1e15, 1e16, 1e17, 1e18,
    1e19, 1e20, 1e21, 1e22, 1e23, 1e24, 1e25,
    1e26, 1e27, 1e28, 1e29, 1e30, 1e31, 1e32,
    1e33, 1e34, 1e35, 1e36, 1e37, 1e38, 1e39,
    1e40, 1e41, 1e42, 1e43, 1e44, 1e45, 1e46,
    1e47, 1e48, 1e49, 1e50, 1e51, 1e52, 1e53,
    1e54, 1e55, 1e56, 1e57, 1e58, 1e59, 1e60,
];

pub fn pow10_f64(exp: i32) -> f64 {
    match usize::try_from(exp - POW10_F64_MIN_EXP) {
        Ok(index) if index < POW10_F64.len() => POW10_F64[index],
        _ => 10_f64.powi(exp),
    }
}

pub fn pow10_u256(exp: u32) -> Option<U256> {
    if exp > MAX_ATOMIC_EXPONENT {
        return None;
    }
    let ten = U256::from(10u8);
    (0..exp).try_fold(U256::one(), |acc, _| acc.checked_mul(ten))
}

/// `floor(log10(value))`, `None` for zero.
pub fn ilog10_u256(value: U256) -> Option<u32> {
    if value.is_zero() {
        return None;
    }

    let ten = U256::from(10u8);
    let mut exp = 0;
    let mut bound = ten;
    while bound <= value {
        exp += 1;
        match bound.checked_mul(ten) {
            Some(next) => bound = next,
            None => break,
        }
    }
    Some(exp)
}

pub fn widen(value: U256) -> U512 {
    let limbs = value.0;
    U512([limbs[0], limbs[1], limbs[2], limbs[3], 0, 0, 0, 0])
}

pub fn narrow(value: U512) -> Option<U256> {
    let limbs = value.0;
    if limbs[4..].iter().any(|limb| *limb != 0) {
        return None;
    }
    Some(U256([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

/// `a * b / denominator` rounded down, with a 512 bit intermediate product.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    narrow(widen(a).checked_mul(widen(b))? / widen(denominator))
}

pub fn relative_error(expected: f64, actual: f64) -> f64 {
    if expected == 0.0 {
        return actual.abs();
    }
    ((actual - expected) / expected).abs()
}

/// Exact encoder: `10^f + offset * 10^(f - k)` scaled by `10^PRICE_DECIMALS`.
///
/// `None` when the decade needs more than `PRICE_DECIMALS` fractional digits
/// or the result does not fit 256 bits.
pub fn tick_to_atomics(segmentation: &Segmentation, tick: i64) -> Option<U256> {
    let decade = segmentation.decade_of_tick(tick) as i64;
    let offset = segmentation.offset_in_decade(tick) as u64;

    let base_exp = u32::try_from(decade + PRICE_DECIMALS as i64).ok()?;
    let step_exp = u32::try_from(step_exponent(segmentation, decade)).ok()?;

    let base = pow10_u256(base_exp)?;
    let step = pow10_u256(step_exp)?;
    step.checked_mul(U256::from(offset))?.checked_add(base)
}

/// Exact decoder. The decade comes from the integer log of the atomics, the
/// offset from one exact division whose remainder drives `rounding`.
///
/// `None` for zero or for a price whose decade is finer than
/// `PRICE_DECIMALS` can address.
pub fn atomics_to_tick(segmentation: &Segmentation, atomics: U256, rounding: Rounding) -> Option<i64> {
    let decade = ilog10_u256(atomics)? as i64 - PRICE_DECIMALS as i64;

    let base = pow10_u256(u32::try_from(decade + PRICE_DECIMALS as i64).ok()?)?;
    let step = pow10_u256(u32::try_from(step_exponent(segmentation, decade)).ok()?)?;

    let (offset, remainder) = (atomics - base).div_mod(step);
    // offset < decade_width, so the low limb holds all of it
    let offset = offset.low_u64() as i64;

    let offset = match rounding {
        Rounding::Floor => offset,
        Rounding::Ceil if remainder.is_zero() => offset,
        Rounding::Ceil => offset + 1,
        Rounding::Nearest if remainder >= step - remainder => offset + 1,
        Rounding::Nearest => offset,
    };

    Some(segmentation.decade_start(decade as i32) + offset)
}

fn step_exponent(segmentation: &Segmentation, decade: i64) -> i64 {
    decade - segmentation.resolution() as i64 + PRICE_DECIMALS as i64
}

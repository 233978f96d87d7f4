// src/math.rs
//! Fixed-point arithmetic shared by valuation, dominance and fee estimation.
//!
//! Every value is a `BigInt` carried on an explicit power-of-ten scale. Division is
//! truncating integer division, the same as the on-chain program; nothing here goes
//! through floating point except the display helpers at the bottom.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use tracing::warn;

use crate::shared::types::{
    Bps, Dominance, PriceRecord, UsdValue, DOMINANCE_SCALE_DECIMALS, USD_SCALE_DECIMALS,
};

/// Deviation reported for a token that has holdings but no target allocation (10000 x 100 bps)
pub const FULLY_OVERWEIGHT_BPS: i64 = 1_000_000;

/// Largest power of ten a price exponent may push a value through
pub const MAX_SCALE_EXPONENT: i64 = 96;

/// `10^exp`
pub fn pow10(exp: u32) -> BigInt {
    BigInt::from(10u32).pow(exp)
}

/// Multiply by `10^exp` when `exp >= 0`, otherwise divide (truncating) by `10^-exp`
pub fn shift_decimal(value: &BigInt, exp: i64) -> Option<BigInt> {
    if exp.abs() > MAX_SCALE_EXPONENT {
        return None;
    }
    if exp >= 0 {
        Some(value * pow10(exp as u32))
    } else {
        Some(value / pow10((-exp) as u32))
    }
}

/// Value `amount` native units (with `decimals`) at `price`, on the USD scale.
///
/// Computes `amount * price * 10^(6 - decimals + exponent)`, dividing when the combined
/// exponent is negative. Zero for a non-positive price or a zero amount.
pub fn scale_to_usd(amount: &BigInt, decimals: u8, price: &PriceRecord) -> UsdValue {
    if !price.is_usable() || amount.is_zero() {
        return UsdValue::zero();
    }

    let combined = USD_SCALE_DECIMALS as i64 - decimals as i64 + price.exponent as i64;
    let product = amount * &price.price;

    match shift_decimal(&product, combined) {
        Some(value) => UsdValue::new(value),
        None => {
            warn!(
                "Price exponent {} with {} decimals is out of range, valuing at zero",
                price.exponent, decimals
            );
            UsdValue::zero()
        }
    }
}

/// `part * 10^10 / whole` on the dominance scale. Zero when `whole` is not positive.
pub fn scale_percentage(part: &BigInt, whole: &BigInt) -> Dominance {
    if !whole.is_positive() {
        return Dominance::zero();
    }
    Dominance::new(part * pow10(DOMINANCE_SCALE_DECIMALS) / whole)
}

/// Relative deviation of `actual` from `target` in basis points.
///
/// Both operands are dominance-scaled shares. A non-positive target yields
/// [`FULLY_OVERWEIGHT_BPS`] when the token still holds value, otherwise zero.
pub fn relative_deviation_bps(actual: &Dominance, target: &Dominance) -> Bps {
    if !target.is_positive() {
        return if actual.is_positive() {
            Bps::from(FULLY_OVERWEIGHT_BPS)
        } else {
            Bps::zero()
        };
    }

    let diff = actual.value() - target.value();
    Bps::new(diff * Bps::factor() / target.value())
}

/// Clamp `value` into `[lo, hi]`
pub fn clamp_big(value: BigInt, lo: &BigInt, hi: &BigInt) -> BigInt {
    if &value < lo {
        lo.clone()
    } else if &value > hi {
        hi.clone()
    } else {
        value
    }
}

/// Larger of `value` and zero
pub fn floor_at_zero(value: BigInt) -> BigInt {
    if value.is_negative() {
        BigInt::zero()
    } else {
        value
    }
}

pub fn narrow_to_i32(value: &BigInt) -> Option<i32> {
    value.to_i32()
}

/// Lossy conversion of a value scaled by `10^decimals` to a plain number for display
pub fn to_display_f64(value: &BigInt, decimals: u32) -> f64 {
    let whole = pow10(decimals);
    let integer = value / &whole;
    let fraction = value % &whole;

    integer.to_f64().unwrap_or(f64::MAX)
        + fraction.to_f64().unwrap_or(0.0) / whole.to_f64().unwrap_or(1.0)
}

//! Amount conversion between USD, native token units and share tokens

mod target_amount;

pub use target_amount::{
    target_adjustment, target_deposit_amount, target_withdraw_amount, usd_change_to_reach_target, TargetAdjustment,
};

use num_bigint::BigInt;
use num_traits::Zero;

use crate::math::{pow10, scale_to_usd, shift_decimal};
use crate::shared::types::{PreciseAmount, PriceRecord, UsdValue, PRECISION_SCALE_DECIMALS, USD_SCALE_DECIMALS};

/// Native token amount worth `usd_value`, pre-multiplied by 10^12.
///
/// Inverse of [`scale_to_usd`]. Use [`to_native_amount`] to divide the precision factor
/// back out before treating the result as a real token quantity.
pub fn usd_to_token_amount(usd_value: &UsdValue, decimals: u8, price: &PriceRecord) -> PreciseAmount {
    if !price.is_usable() || !usd_value.is_positive() {
        return PreciseAmount::zero();
    }

    let combined = decimals as i64 - USD_SCALE_DECIMALS as i64 - price.exponent as i64;
    let scaled = usd_value.value() * pow10(PRECISION_SCALE_DECIMALS);

    let amount = if combined >= 0 {
        shift_decimal(&scaled, combined).map(|numerator| numerator / &price.price)
    } else {
        shift_decimal(&price.price, -combined).map(|denominator| scaled / denominator)
    };
    PreciseAmount::new(amount.unwrap_or_default())
}

/// Drop the 10^12 precision factor, truncating
pub fn to_native_amount(amount: &PreciseAmount) -> BigInt {
    amount.value() / PreciseAmount::factor()
}

/// Share token (wLQI) amount worth `usd_value`; zero without a positive unit value
pub fn usd_to_share_token_amount(usd_value: &UsdValue, share_unit_value: Option<&UsdValue>, share_decimals: u8) -> BigInt {
    match share_unit_value {
        Some(unit) if unit.is_positive() => usd_value.value() * pow10(share_decimals as u32) / unit.value(),
        _ => BigInt::zero(),
    }
}

/// USD value of a share token amount; zero without a positive unit value
pub fn share_amount_to_usd(share_amount: &BigInt, share_unit_value: &UsdValue, share_decimals: u8) -> UsdValue {
    if !share_unit_value.is_positive() {
        return UsdValue::zero();
    }
    UsdValue::new(share_amount * share_unit_value.value() / pow10(share_decimals as u32))
}

/// USD value of a native token amount
pub fn token_amount_to_usd(amount: &BigInt, decimals: u8, price: &PriceRecord) -> UsdValue {
    scale_to_usd(amount, decimals, price)
}

/// Parse a user-typed decimal amount ("1.25") into raw units with `decimals` places.
///
/// `None` for empty, negative or malformed text, or more fractional digits than `decimals`.
pub fn parse_ui_amount(text: &str, decimals: u8) -> Option<BigInt> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if fraction.len() > decimals as usize {
        return None;
    }

    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(whole);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(decimals as usize - fraction.len()));

    digits.parse::<BigInt>().ok()
}

//! Amounts that bring a token back to its target dominance

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use tracing::debug;

use super::{to_native_amount, usd_to_share_token_amount, usd_to_token_amount};
use crate::domain::pool::ProcessedToken;
use crate::domain::valuation::processed_token_value;
use crate::shared::types::{Dominance, PriceRecord, UsdValue};

/// Trade that moves a token to its target share of the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetAdjustment {
    /// Deposit `token_amount` native units, worth `usd`
    Deposit { usd: UsdValue, token_amount: BigInt },
    /// Withdraw `share_amount` raw share tokens, worth `usd`
    Withdraw { usd: UsdValue, share_amount: BigInt },
    AtTarget,
    /// Missing data, an empty pool or a 100% target
    Unreachable,
}

/// Signed USD change to the token's holdings after which its share of the pool equals `target`.
///
/// Solves `(v + x) / (T + x) = t` on the dominance scale: `x = (t*T - S*v) / (S - t)`.
/// Positive means deposit, negative means withdraw.
pub fn usd_change_to_reach_target(token_value: &UsdValue, total_value: &UsdValue, target: &Dominance) -> Option<UsdValue> {
    let scale = Dominance::factor();
    let t = target.value();
    if t.is_negative() || t >= &scale || !total_value.is_positive() || token_value.is_negative() {
        return None;
    }

    let numerator = t * total_value.value() - &scale * token_value.value();
    let denominator = scale - t;
    Some(UsdValue::new(numerator / denominator))
}

/// Native token units to deposit for a positive USD change
pub fn target_deposit_amount(change: &UsdValue, decimals: u8, price: &PriceRecord) -> BigInt {
    to_native_amount(&usd_to_token_amount(change, decimals, price))
}

/// Raw share tokens to burn for a withdrawal worth `change` (sign ignored)
pub fn target_withdraw_amount(change: &UsdValue, share_unit_value: Option<&UsdValue>, share_decimals: u8) -> BigInt {
    let magnitude = UsdValue::new(change.value().abs());
    usd_to_share_token_amount(&magnitude, share_unit_value, share_decimals)
}

pub fn target_adjustment(
    token: &ProcessedToken,
    total_value: &UsdValue,
    target: &Dominance,
    share_unit_value: Option<&UsdValue>,
    share_decimals: u8,
) -> TargetAdjustment {
    let (Some(decimals), Some(price), Some(token_value)) =
        (token.decimals, token.price_record.as_ref(), processed_token_value(token))
    else {
        return TargetAdjustment::Unreachable;
    };

    let Some(change) = usd_change_to_reach_target(&token_value, total_value, target) else {
        return TargetAdjustment::Unreachable;
    };
    debug!("Token {} needs a {} usd-scaled change to reach target {}", token.symbol, change, target);

    if change.is_zero() {
        TargetAdjustment::AtTarget
    } else if change.is_positive() {
        let token_amount = target_deposit_amount(&change, decimals, price);
        TargetAdjustment::Deposit { usd: change, token_amount }
    } else if share_unit_value.map_or(false, UsdValue::is_positive) {
        let share_amount = target_withdraw_amount(&change, share_unit_value, share_decimals);
        TargetAdjustment::Withdraw { usd: UsdValue::new(-change.value()), share_amount }
    } else {
        TargetAdjustment::Unreachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dominance::{deviation_for_values, target_percentage};
    use crate::domain::valuation::tests::processed;

    fn one_dollar() -> PriceRecord {
        PriceRecord::new(100_000_000i64, -8)
    }

    #[test]
    fn test_deposit_change_reaches_target() {
        // $2 of $10 against a 50% target: deposit $6 -> $8 of $16
        let target = target_percentage(&BigInt::from(1), &BigInt::from(2));
        let change = usd_change_to_reach_target(&UsdValue::from(2_000_000i64), &UsdValue::from(10_000_000i64), &target);
        assert_eq!(change, Some(UsdValue::from(6_000_000i64)));
    }

    #[test]
    fn test_withdraw_change_reaches_target_within_rounding() {
        let target = target_percentage(&BigInt::from(1), &BigInt::from(4));
        let value = UsdValue::from(6_000_000i64);
        let total = UsdValue::from(10_000_000i64);

        let change = usd_change_to_reach_target(&value, &total, &target).unwrap();
        assert_eq!(change, UsdValue::from(-4_666_666i64));

        let after = &value + &change;
        let total_after = &total + &change;
        assert!(deviation_for_values(&after, &total_after, &target).is_zero());
    }

    #[test]
    fn test_unreachable_targets() {
        let full = Dominance::factor();
        let value = UsdValue::from(1i64);
        let total = UsdValue::from(10i64);
        assert!(usd_change_to_reach_target(&value, &total, &Dominance::new(full)).is_none());
        assert!(usd_change_to_reach_target(&value, &total, &Dominance::from(-1i64)).is_none());
        assert!(usd_change_to_reach_target(&value, &UsdValue::zero(), &Dominance::from(1i64)).is_none());

        // zero target withdraws everything
        let change = usd_change_to_reach_target(&value, &total, &Dominance::zero());
        assert_eq!(change, Some(UsdValue::from(-1i64)));
    }

    #[test]
    fn test_target_adjustment_converts_amounts() {
        let half = target_percentage(&BigInt::from(1), &BigInt::from(2));
        let total = UsdValue::from(10_000_000i64);
        let unit = UsdValue::from(2_000_000i64);

        let under = processed(2_000_000, Some(6), Some(one_dollar()), 1);
        assert_eq!(
            target_adjustment(&under, &total, &half, Some(&unit), 6),
            TargetAdjustment::Deposit {
                usd: UsdValue::from(6_000_000i64),
                token_amount: BigInt::from(6_000_000u64),
            }
        );

        // $8 of $10 against 50%: withdraw $6 = 3 shares at $2
        let over = processed(8_000_000, Some(6), Some(one_dollar()), 1);
        assert_eq!(
            target_adjustment(&over, &total, &half, Some(&unit), 6),
            TargetAdjustment::Withdraw {
                usd: UsdValue::from(6_000_000i64),
                share_amount: BigInt::from(3_000_000u64),
            }
        );

        let balanced = processed(5_000_000, Some(6), Some(one_dollar()), 1);
        assert_eq!(target_adjustment(&balanced, &total, &half, Some(&unit), 6), TargetAdjustment::AtTarget);

        let unpriced = processed(5_000_000, Some(6), None, 1);
        assert_eq!(target_adjustment(&unpriced, &total, &half, Some(&unit), 6), TargetAdjustment::Unreachable);

        // withdraw needed but no share value to convert through
        assert_eq!(target_adjustment(&over, &total, &half, None, 6), TargetAdjustment::Unreachable);
    }
}

//! Dominance domain - target and actual pool shares and their deviation
//!
//! Shares are always compared on the dominance scale (10^10). The percent helpers at the
//! bottom are for display and never feed back into a calculation.

use num_bigint::BigInt;

use crate::math::{relative_deviation_bps, scale_percentage};
use crate::shared::types::{Bps, Dominance, UsdValue};

/// Target share of one token given its raw dominance and the sum over all tokens
pub fn target_percentage(token_target_dominance: &BigInt, total_target_dominance: &BigInt) -> Dominance {
    scale_percentage(token_target_dominance, total_target_dominance)
}

/// Actual share of one token given its USD value and the total pool value
pub fn actual_percentage(token_value: &UsdValue, total_pool_value: &UsdValue) -> Dominance {
    scale_percentage(token_value.value(), total_pool_value.value())
}

/// Relative deviation of the actual share from the target share
pub fn deviation_bps(actual: &Dominance, target: &Dominance) -> Bps {
    relative_deviation_bps(actual, target)
}

/// Deviation of a token valued at `token_value` in a pool worth `total_pool_value`
pub fn deviation_for_values(token_value: &UsdValue, total_pool_value: &UsdValue, target: &Dominance) -> Bps {
    deviation_bps(&actual_percentage(token_value, total_pool_value), target)
}

/// Dominance as a plain percentage, e.g. 1_000_000_000 -> 10.0
pub fn dominance_to_percent(dominance: &Dominance) -> f64 {
    dominance.to_display_f64() * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::DOMINANCE_SCALE_DECIMALS;

    #[test]
    fn test_shares_are_on_dominance_scale() {
        let target = target_percentage(&BigInt::from(1), &BigInt::from(10));
        let actual = actual_percentage(&UsdValue::from(1_500_000i64), &UsdValue::from(15_000_000i64));

        assert_eq!(target, Dominance::from(10i64.pow(DOMINANCE_SCALE_DECIMALS - 1)));
        assert_eq!(actual, target);
        assert!(deviation_bps(&actual, &target).is_zero());
        assert!((dominance_to_percent(&actual) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_deviation_does_not_mix_scales() {
        // 3 of 20 USD held against a 10% target: actual 15%, relative +50% = 5000 bps
        let target = target_percentage(&BigInt::from(2_500u64), &BigInt::from(25_000u64));
        let dev = deviation_for_values(&UsdValue::from(3_000_000i64), &UsdValue::from(20_000_000i64), &target);
        assert_eq!(dev, Bps::from(5_000i64));

        // a raw USD value compared against a dominance target gives garbage
        let mismatched = deviation_bps(&Dominance::from(3_000_000i64), &target);
        assert_ne!(mismatched, dev);
    }

    #[test]
    fn test_empty_pool_has_no_share() {
        let actual = actual_percentage(&UsdValue::from(5i64), &UsdValue::zero());
        assert!(actual.is_zero());
        let target = target_percentage(&BigInt::from(5), &BigInt::from(0));
        assert!(target.is_zero());
    }
}

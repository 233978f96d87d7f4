//! Dominance-weighted fee curve
//!
//! A trade that pushes a token further from its target weight pays more, one that pulls
//! it back pays less or earns a bonus. With a trade amount the pre- and post-trade
//! deviations are averaged, otherwise only the current deviation counts.

use num_bigint::BigInt;
use num_traits::Signed;
use tracing::{debug, warn};

use super::{FeeEstimate, FeeParams, TradeAmount};
use crate::domain::conversion::{share_amount_to_usd, to_native_amount, token_amount_to_usd, usd_to_token_amount};
use crate::domain::dominance::{deviation_for_values, target_percentage};
use crate::math::{clamp_big, floor_at_zero, narrow_to_i32};
use crate::shared::types::{PriceRecord, TradeAction, UsdValue};

/// Everything a fee estimate depends on, taken from one consistent snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeInputs {
    pub action: TradeAction,
    pub is_delisted: bool,
    /// `None` when the token's price or decimals are missing
    pub token_value: Option<UsdValue>,
    pub total_pool_value: UsdValue,
    pub target_dominance_raw: BigInt,
    pub total_target_dominance: BigInt,
    pub amount: TradeAmount,
    pub decimals: Option<u8>,
    pub price: Option<PriceRecord>,
    pub vault_balance: BigInt,
    pub share_unit_value: Option<UsdValue>,
    pub share_decimals: u8,
}

impl FeeInputs {
    /// USD value the trade moves. `None` for an unspecified, unconvertible or non-positive amount.
    pub fn usd_change(&self) -> Option<UsdValue> {
        let change = match &self.amount {
            TradeAmount::Unspecified => return None,
            TradeAmount::Usd(usd) => usd.clone(),
            TradeAmount::Token(amount) => {
                let (decimals, price) = (self.decimals?, self.price.as_ref()?);
                token_amount_to_usd(amount, decimals, price)
            }
            TradeAmount::Share(amount) => {
                let unit = self.share_unit_value.as_ref()?;
                share_amount_to_usd(amount, unit, self.share_decimals)
            }
        };
        change.is_positive().then_some(change)
    }

    /// Native token units the withdrawal takes out of the vault
    fn required_token_amount(&self, change: Option<&UsdValue>) -> Option<BigInt> {
        match &self.amount {
            TradeAmount::Token(amount) => Some(amount.clone()),
            _ => {
                let change = change?;
                let price = self.price.as_ref()?;
                Some(to_native_amount(&usd_to_token_amount(change, self.decimals?, price)))
            }
        }
    }
}

pub struct FeeEstimator {
    params: FeeParams,
}

impl FeeEstimator {
    pub fn new(params: FeeParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &FeeParams {
        &self.params
    }

    pub fn estimate(&self, inputs: &FeeInputs) -> FeeEstimate {
        let is_deposit = inputs.action.is_deposit();
        let change = inputs.usd_change();
        let withdrawal_exceeds_liquidity = !is_deposit && self.exceeds_liquidity(inputs, change.as_ref());

        if inputs.is_delisted {
            if is_deposit {
                return FeeEstimate::NotApplicable;
            }
            return FeeEstimate::Estimate {
                fee_bps: self.params.delisted_withdraw_bps,
                withdrawal_exceeds_liquidity,
                used_post_trade: false,
            };
        }

        let token_value = match &inputs.token_value {
            Some(value) if inputs.total_pool_value.is_positive() && !value.is_negative() => value,
            _ => {
                debug!("No usable pool or token value, falling back to the base fee");
                return FeeEstimate::Estimate {
                    fee_bps: self.params.base_fee_bps,
                    withdrawal_exceeds_liquidity,
                    used_post_trade: false,
                };
            }
        };

        let target = target_percentage(&inputs.target_dominance_raw, &inputs.total_target_dominance);
        let pre = deviation_for_values(token_value, &inputs.total_pool_value, &target).into_inner();

        let post = change.as_ref().and_then(|change| {
            let (token_after, total_after) = if is_deposit {
                (token_value + change, &inputs.total_pool_value + change)
            } else {
                (
                    UsdValue::new(floor_at_zero(token_value.value() - change.value())),
                    UsdValue::new(floor_at_zero(inputs.total_pool_value.value() - change.value())),
                )
            };
            if !total_after.is_positive() {
                debug!("Post-trade pool value is zero, using the current deviation only");
                return None;
            }
            Some(deviation_for_values(&token_after, &total_after, &target).into_inner())
        });

        let used_post_trade = post.is_some();
        let deviation = match post {
            Some(post) => (&pre + post) / 2,
            None => pre,
        };

        let fee_bps = self.fee_for_deviation(&deviation, is_deposit);
        debug!(
            "{} fee {} bps at deviation {} bps (post-trade: {})",
            inputs.action.as_str(),
            fee_bps,
            deviation,
            used_post_trade
        );

        FeeEstimate::Estimate {
            fee_bps,
            withdrawal_exceeds_liquidity,
            used_post_trade,
        }
    }

    /// `base + k*deviation` for deposits, `base - k*deviation` for withdrawals, clamped
    fn fee_for_deviation(&self, deviation: &BigInt, is_deposit: bool) -> i32 {
        let p = &self.params;
        let adjustment = deviation * p.k_numerator / p.k_denominator;
        let base = BigInt::from(p.base_fee_bps);

        let (raw, min, max) = if is_deposit {
            (base + adjustment, p.deposit_min_bps, p.deposit_max_bps)
        } else {
            (base - adjustment, p.withdraw_min_bps, p.withdraw_max_bps)
        };
        let clamped = clamp_big(raw, &BigInt::from(min), &BigInt::from(max));
        narrow_to_i32(&clamped).unwrap_or(max)
    }

    /// `false` also when the amount cannot be converted to native units, with a warning
    fn exceeds_liquidity(&self, inputs: &FeeInputs, change: Option<&UsdValue>) -> bool {
        match inputs.required_token_amount(change) {
            Some(required) if required > inputs.vault_balance => {
                debug!(
                    "Withdrawal needs {} native units, vault holds {}",
                    required, inputs.vault_balance
                );
                true
            }
            Some(_) => false,
            None => {
                let requested = match &inputs.amount {
                    TradeAmount::Unspecified => false,
                    TradeAmount::Usd(usd) => usd.is_positive(),
                    TradeAmount::Token(amount) | TradeAmount::Share(amount) => amount.is_positive(),
                };
                if requested {
                    warn!(
                        "Liquidity check not run: no decimals, price or share value to convert {:?} into native units",
                        inputs.amount
                    );
                }
                false
            }
        }
    }
}

/// Estimate with a one-off [`FeeEstimator`]
pub fn estimate_fee(inputs: &FeeInputs, params: &FeeParams) -> FeeEstimate {
    FeeEstimator::new(params.clone()).estimate(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_dollar() -> PriceRecord {
        PriceRecord::new(100_000_000i64, -8)
    }

    /// Token worth `token_usd` whole dollars in a $100 pool with a 10% target
    fn inputs(action: TradeAction, token_usd: i64) -> FeeInputs {
        FeeInputs {
            action,
            is_delisted: false,
            token_value: Some(UsdValue::from(token_usd * 1_000_000)),
            total_pool_value: UsdValue::from(100_000_000i64),
            target_dominance_raw: BigInt::from(1),
            total_target_dominance: BigInt::from(10),
            amount: TradeAmount::Unspecified,
            decimals: Some(6),
            price: Some(one_dollar()),
            vault_balance: BigInt::from(token_usd * 1_000_000),
            share_unit_value: Some(UsdValue::from(1_000_000i64)),
            share_decimals: 6,
        }
    }

    fn fee(inputs: &FeeInputs) -> i32 {
        estimate_fee(inputs, &FeeParams::default())
            .fee_bps()
            .unwrap()
    }

    #[test]
    fn test_concrete_scenario_charges_base_fee() {
        // 1.0 token at $1.50 in a $15 pool with a 10% target
        let mut inputs = inputs(TradeAction::Deposit, 0);
        inputs.token_value = Some(UsdValue::from(1_500_000i64));
        inputs.total_pool_value = UsdValue::from(15_000_000i64);
        inputs.price = Some(PriceRecord::new(150_000_000i64, -8));
        inputs.vault_balance = BigInt::from(1_000_000u64);

        assert_eq!(
            estimate_fee(&inputs, &FeeParams::default()),
            FeeEstimate::Estimate {
                fee_bps: 10,
                withdrawal_exceeds_liquidity: false,
                used_post_trade: false,
            }
        );
    }

    #[test]
    fn test_deposit_fee_increases_with_deviation() {
        // deviation 0, +5000, +10000, +20000 bps
        let fees: Vec<i32> = [10, 15, 20, 30]
            .iter()
            .map(|usd| fee(&inputs(TradeAction::Deposit, *usd)))
            .collect();
        assert_eq!(fees, vec![10, 1010, 2010, 4010]);
    }

    #[test]
    fn test_withdraw_fee_decreases_with_deviation() {
        // deviation -5000, -2000, 0, +10000 bps
        let fees: Vec<i32> = [5, 8, 10, 20]
            .iter()
            .map(|usd| fee(&inputs(TradeAction::Withdraw, *usd)))
            .collect();
        assert_eq!(fees, vec![1010, 410, 10, 0]);
    }

    #[test]
    fn test_clamps_under_extreme_deviation() {
        // target share rounds to zero against 10^15 total dominance
        let mut over = inputs(TradeAction::Deposit, 50);
        over.total_target_dominance = BigInt::from(10u64.pow(15));
        assert_eq!(fee(&over), 9999);
        over.action = TradeAction::Withdraw;
        assert_eq!(fee(&over), 0);

        // holding nothing against a large target
        let mut under = inputs(TradeAction::Deposit, 0);
        under.target_dominance_raw = BigInt::from(9);
        assert_eq!(fee(&under), -500);
        under.action = TradeAction::Withdraw;
        assert_eq!(fee(&under), 2010);

        let mut huge = inputs(TradeAction::Withdraw, 0);
        huge.target_dominance_raw = BigInt::from(1);
        huge.total_target_dominance = BigInt::from(1);
        let params = FeeParams {
            k_numerator: 1_000,
            k_denominator: 1,
            ..FeeParams::default()
        };
        assert_eq!(estimate_fee(&huge, &params).fee_bps(), Some(9999));
    }

    #[test]
    fn test_delisted_token() {
        let mut deposit = inputs(TradeAction::Deposit, 10);
        deposit.is_delisted = true;
        deposit.target_dominance_raw = BigInt::from(0);
        assert_eq!(estimate_fee(&deposit, &FeeParams::default()), FeeEstimate::NotApplicable);

        let mut withdraw = deposit.clone();
        withdraw.action = TradeAction::Withdraw;
        assert_eq!(fee(&withdraw), -500);

        // regardless of pool state or amount
        withdraw.total_pool_value = UsdValue::zero();
        withdraw.amount = TradeAmount::Usd(UsdValue::from(3_000_000i64));
        assert_eq!(fee(&withdraw), -500);
    }

    #[test]
    fn test_missing_pool_value_falls_back_to_base_fee() {
        let mut inputs = inputs(TradeAction::Deposit, 30);
        inputs.total_pool_value = UsdValue::zero();
        assert_eq!(fee(&inputs), 10);

        inputs.total_pool_value = UsdValue::from(100_000_000i64);
        inputs.token_value = Some(UsdValue::from(-1i64));
        assert_eq!(fee(&inputs), 10);

        // unpriced token
        inputs.token_value = None;
        assert_eq!(fee(&inputs), 10);
    }

    #[test]
    fn test_trade_amount_averages_pre_and_post_deviation() {
        // $10 of $100 at a 10% target, depositing $10: post share 20/110
        let mut deposit = inputs(TradeAction::Deposit, 10);
        deposit.amount = TradeAmount::Usd(UsdValue::from(10_000_000i64));
        let estimate = estimate_fee(&deposit, &FeeParams::default());

        // post deviation 8181 bps, averaged 4090, 10 + 818
        assert_eq!(
            estimate,
            FeeEstimate::Estimate {
                fee_bps: 828,
                withdrawal_exceeds_liquidity: false,
                used_post_trade: true,
            }
        );

        // the same amount in share tokens at $1 per share
        deposit.amount = TradeAmount::Share(BigInt::from(10_000_000u64));
        assert_eq!(estimate_fee(&deposit, &FeeParams::default()), estimate);

        // and in native tokens at $1
        deposit.amount = TradeAmount::Token(BigInt::from(10_000_000u64));
        assert_eq!(estimate_fee(&deposit, &FeeParams::default()), estimate);
    }

    #[test]
    fn test_zero_amount_uses_pre_trade_only() {
        let mut deposit = inputs(TradeAction::Deposit, 20);
        deposit.amount = TradeAmount::Usd(UsdValue::zero());
        let estimate = estimate_fee(&deposit, &FeeParams::default());
        assert_eq!(estimate.fee_bps(), Some(2010));
        assert!(matches!(estimate, FeeEstimate::Estimate { used_post_trade: false, .. }));
    }

    #[test]
    fn test_withdrawing_whole_pool_falls_back_to_pre_trade() {
        let mut withdraw = inputs(TradeAction::Withdraw, 10);
        withdraw.amount = TradeAmount::Usd(UsdValue::from(200_000_000i64));
        let estimate = estimate_fee(&withdraw, &FeeParams::default());
        assert_eq!(estimate.fee_bps(), Some(10));
        assert!(matches!(estimate, FeeEstimate::Estimate { used_post_trade: false, .. }));
        assert!(estimate.exceeds_liquidity());
    }

    #[test]
    fn test_liquidity_guard() {
        // vault holds 10_000_000 native units worth $10
        let mut withdraw = inputs(TradeAction::Withdraw, 10);

        withdraw.amount = TradeAmount::Token(BigInt::from(10_000_001u64));
        assert!(estimate_fee(&withdraw, &FeeParams::default()).exceeds_liquidity());

        withdraw.amount = TradeAmount::Usd(UsdValue::from(10_000_001i64));
        assert!(estimate_fee(&withdraw, &FeeParams::default()).exceeds_liquidity());

        withdraw.amount = TradeAmount::Usd(UsdValue::from(10_000_000i64));
        assert!(!estimate_fee(&withdraw, &FeeParams::default()).exceeds_liquidity());

        // deposits never trip the guard
        let mut deposit = withdraw.clone();
        deposit.action = TradeAction::Deposit;
        deposit.amount = TradeAmount::Token(BigInt::from(50_000_000u64));
        assert!(!estimate_fee(&deposit, &FeeParams::default()).exceeds_liquidity());
    }

    #[test]
    fn test_withdraw_amount_averages_pre_and_post_deviation() {
        // $5 of $100 at a 10% target, withdrawing $1: post share 4/99
        let mut withdraw = inputs(TradeAction::Withdraw, 5);
        withdraw.amount = TradeAmount::Usd(UsdValue::from(1_000_000i64));

        // pre -5000, post -5959, averaged -5479, 10 + 1095
        assert_eq!(
            estimate_fee(&withdraw, &FeeParams::default()),
            FeeEstimate::Estimate {
                fee_bps: 1105,
                withdrawal_exceeds_liquidity: false,
                used_post_trade: true,
            }
        );
    }

    #[test]
    fn test_overweight_withdraw_averages_into_bonus() {
        // $20 of $100 at a 10% target, withdrawing $10: pre 10000, post 1111, averaged 5555
        let mut withdraw = inputs(TradeAction::Withdraw, 20);
        withdraw.amount = TradeAmount::Usd(UsdValue::from(10_000_000i64));
        let params = FeeParams {
            withdraw_min_bps: -2_000,
            ..FeeParams::default()
        };

        assert_eq!(
            estimate_fee(&withdraw, &params),
            FeeEstimate::Estimate {
                fee_bps: -1101,
                withdrawal_exceeds_liquidity: false,
                used_post_trade: true,
            }
        );
        // default clamps floor the same trade at zero
        assert_eq!(fee(&withdraw), 0);
    }

    #[test]
    fn test_liquidity_guard_on_share_amounts() {
        // vault holds 10_000_000 native units worth $10, one share is worth $1
        let mut withdraw = inputs(TradeAction::Withdraw, 10);

        withdraw.amount = TradeAmount::Share(BigInt::from(10_000_001u64));
        assert!(estimate_fee(&withdraw, &FeeParams::default()).exceeds_liquidity());

        withdraw.amount = TradeAmount::Share(BigInt::from(10_000_000u64));
        assert!(!estimate_fee(&withdraw, &FeeParams::default()).exceeds_liquidity());
    }

    #[test]
    fn test_liquidity_unchecked_without_decimals() {
        // delisted token with no history record
        let mut withdraw = inputs(TradeAction::Withdraw, 1);
        withdraw.is_delisted = true;
        withdraw.decimals = None;
        withdraw.amount = TradeAmount::Usd(UsdValue::from(50_000_000i64));

        let change = withdraw.usd_change();
        assert!(withdraw.required_token_amount(change.as_ref()).is_none());
        assert_eq!(
            estimate_fee(&withdraw, &FeeParams::default()),
            FeeEstimate::Estimate {
                fee_bps: -500,
                withdrawal_exceeds_liquidity: false,
                used_post_trade: false,
            }
        );

        // native amounts need no conversion and are still checked
        withdraw.amount = TradeAmount::Token(BigInt::from(1_000_001u64));
        assert!(estimate_fee(&withdraw, &FeeParams::default()).exceeds_liquidity());
    }

    #[test]
    fn test_delisted_withdraw_still_checks_liquidity() {
        let mut withdraw = inputs(TradeAction::Withdraw, 1);
        withdraw.is_delisted = true;
        withdraw.amount = TradeAmount::Token(BigInt::from(1_000_001u64));

        assert_eq!(
            estimate_fee(&withdraw, &FeeParams::default()),
            FeeEstimate::Estimate {
                fee_bps: -500,
                withdrawal_exceeds_liquidity: true,
                used_post_trade: false,
            }
        );
    }

    #[test]
    fn test_estimate_is_idempotent() {
        let mut inputs = inputs(TradeAction::Withdraw, 14);
        inputs.amount = TradeAmount::Usd(UsdValue::from(2_000_000i64));
        let estimator = FeeEstimator::new(FeeParams::default());
        assert_eq!(estimator.estimate(&inputs), estimator.estimate(&inputs));
    }
}

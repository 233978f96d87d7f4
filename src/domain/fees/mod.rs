//! Fees domain - dynamic deposit/withdraw fee and bonus estimation

mod fee_estimator;

pub use fee_estimator::{estimate_fee, FeeEstimator, FeeInputs};

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::shared::errors::ConfigError;
use crate::shared::types::UsdValue;

/// Fee curve constants. Defaults match the on-chain program.
///
/// Negative basis points are a bonus paid to the trader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeParams {
    pub base_fee_bps: i32,
    /// Deviation multiplier `k = k_numerator / k_denominator`
    pub k_numerator: i32,
    pub k_denominator: i32,
    pub deposit_min_bps: i32,
    pub deposit_max_bps: i32,
    pub withdraw_min_bps: i32,
    pub withdraw_max_bps: i32,
    pub delisted_withdraw_bps: i32,
}

impl Default for FeeParams {
    fn default() -> Self {
        Self {
            base_fee_bps: 10,
            k_numerator: 2,
            k_denominator: 10,
            deposit_min_bps: -500,
            deposit_max_bps: 9999,
            withdraw_min_bps: 0,
            withdraw_max_bps: 9999,
            delisted_withdraw_bps: -500,
        }
    }
}

impl FeeParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k_denominator <= 0 {
            return Err(ConfigError::InvalidFees(format!(
                "k_denominator must be positive, got {}",
                self.k_denominator
            )));
        }
        if self.deposit_min_bps > self.deposit_max_bps {
            return Err(ConfigError::InvalidFees(format!(
                "deposit range [{}, {}] is empty",
                self.deposit_min_bps, self.deposit_max_bps
            )));
        }
        if self.withdraw_min_bps > self.withdraw_max_bps {
            return Err(ConfigError::InvalidFees(format!(
                "withdraw range [{}, {}] is empty",
                self.withdraw_min_bps, self.withdraw_max_bps
            )));
        }
        Ok(())
    }
}

/// Size of a proposed trade, in whichever unit the caller has it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TradeAmount {
    /// No amount entered, or one that could not be parsed
    #[default]
    Unspecified,
    /// USD-scaled value
    Usd(UsdValue),
    /// Raw native units of the pool token
    Token(BigInt),
    /// Raw share token (wLQI) units
    Share(BigInt),
}

/// Result of a fee estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeeEstimate {
    /// Deposits of delisted tokens are not accepted. This is not a zero fee.
    NotApplicable,
    Estimate {
        fee_bps: i32,
        /// The withdrawal needs more of the token than the vault holds. Blocks the trade
        /// whatever the fee says.
        withdrawal_exceeds_liquidity: bool,
        /// Whether the post-trade deviation went into the average
        used_post_trade: bool,
    },
}

impl FeeEstimate {
    pub fn fee_bps(&self) -> Option<i32> {
        match self {
            FeeEstimate::NotApplicable => None,
            FeeEstimate::Estimate { fee_bps, .. } => Some(*fee_bps),
        }
    }

    pub fn exceeds_liquidity(&self) -> bool {
        matches!(
            self,
            FeeEstimate::Estimate {
                withdrawal_exceeds_liquidity: true,
                ..
            }
        )
    }

    pub fn is_bonus(&self) -> bool {
        self.fee_bps().map_or(false, |bps| bps < 0)
    }
}

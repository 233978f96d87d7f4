//! Application services and use cases

use solana_sdk::pubkey::Pubkey;
use tracing::{info, warn};

use crate::domain::conversion::{parse_ui_amount, target_adjustment, TargetAdjustment};
use crate::domain::dominance::target_percentage;
use crate::domain::fees::{FeeEstimate, FeeEstimator, FeeInputs, FeeParams, TradeAmount};
use crate::domain::pool::{PoolLayout, PoolSnapshot, ProcessedToken};
use crate::domain::valuation::{value_pool, PoolValuation};
use crate::infrastructure::blockchain::{build_snapshot, AccountSource};
use crate::shared::config::Config;
use crate::shared::errors::{AppError, PoolError};
use crate::shared::types::{Denomination, TradeAction, UsdValue, USD_SCALE_DECIMALS};

/// One decoded snapshot and its valuation. Replaced whole on every refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    pub snapshot: PoolSnapshot,
    pub valuation: PoolValuation,
}

impl PoolState {
    pub fn token(&self, mint: &Pubkey) -> Result<&ProcessedToken, PoolError> {
        self.snapshot
            .token(mint)
            .ok_or_else(|| PoolError::UnknownToken(mint.to_string()))
    }

    /// Share unit value, `None` when no shares are issued
    pub fn share_unit_value(&self) -> Option<&UsdValue> {
        Some(&self.valuation.share_unit_value).filter(|v| v.is_positive())
    }
}

/// Thin adapter between callers (CLI, UI) and the valuation and fee logic
pub struct PoolService {
    layout: PoolLayout,
    estimator: FeeEstimator,
    state: Option<PoolState>,
}

impl PoolService {
    pub fn new(layout: PoolLayout, fees: FeeParams) -> Self {
        Self {
            layout,
            estimator: FeeEstimator::new(fees),
            state: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        config.fees.validate()?;
        Ok(Self::new(config.pool_layout()?, config.fees.clone()))
    }

    pub fn layout(&self) -> &PoolLayout {
        &self.layout
    }

    /// Rebuild the pool state from `source`
    pub fn refresh<S: AccountSource + ?Sized>(&mut self, source: &S, owner: Option<&Pubkey>) -> Result<&PoolState, PoolError> {
        let snapshot = build_snapshot(&self.layout, source, owner)?;
        let valuation = value_pool(&snapshot);
        info!(
            "Pool value {} USD, share value {} USD",
            valuation.total_value_usd.to_display_f64(),
            valuation.share_unit_value.to_display_f64()
        );
        let state = self.state.insert(PoolState { snapshot, valuation });
        Ok(&*state)
    }

    pub fn state(&self) -> Result<&PoolState, PoolError> {
        self.state.as_ref().ok_or(PoolError::NotLoaded)
    }

    /// Turn user-typed text into a trade amount. Unparseable text becomes `Unspecified`.
    pub fn parse_trade_amount(&self, mint: &Pubkey, text: &str, denomination: Denomination) -> Result<TradeAmount, PoolError> {
        let state = self.state()?;
        let decimals = match denomination {
            Denomination::Token => state.token(mint)?.decimals,
            Denomination::Usd => Some(USD_SCALE_DECIMALS as u8),
            Denomination::Share => Some(state.snapshot.share_decimals),
        };

        let Some(raw) = decimals.and_then(|d| parse_ui_amount(text, d)) else {
            if !text.trim().is_empty() {
                warn!("Could not read {:?} as a {:?} amount", text, denomination);
            }
            return Ok(TradeAmount::Unspecified);
        };

        Ok(match denomination {
            Denomination::Token => TradeAmount::Token(raw),
            Denomination::Usd => TradeAmount::Usd(UsdValue::new(raw)),
            Denomination::Share => TradeAmount::Share(raw),
        })
    }

    pub fn fee_inputs(&self, mint: &Pubkey, action: TradeAction, amount: TradeAmount) -> Result<FeeInputs, PoolError> {
        let state = self.state()?;
        let token = state.token(mint)?;
        let token_value = state.valuation.token(mint).and_then(|t| t.value_usd.clone());

        Ok(FeeInputs {
            action,
            is_delisted: token.is_delisted,
            token_value,
            total_pool_value: state.valuation.total_value_usd.clone(),
            target_dominance_raw: token.target_dominance_raw.clone(),
            total_target_dominance: state.snapshot.total_target_dominance.clone(),
            amount,
            decimals: token.decimals,
            price: token.price_record.clone(),
            vault_balance: token.vault_balance.clone(),
            share_unit_value: state.share_unit_value().cloned(),
            share_decimals: state.snapshot.share_decimals,
        })
    }

    pub fn estimate_fee(
        &self,
        mint: &Pubkey,
        action: TradeAction,
        amount_text: &str,
        denomination: Denomination,
    ) -> Result<FeeEstimate, PoolError> {
        let amount = self.parse_trade_amount(mint, amount_text, denomination)?;
        let inputs = self.fee_inputs(mint, action, amount)?;
        let estimate = self.estimator.estimate(&inputs);
        if estimate.exceeds_liquidity() {
            warn!("Withdrawal of {} from {} exceeds vault liquidity", amount_text, mint);
        }
        Ok(estimate)
    }

    /// Trade that brings `mint` to its target dominance
    pub fn target_adjustment(&self, mint: &Pubkey) -> Result<TargetAdjustment, PoolError> {
        let state = self.state()?;
        let token = state.token(mint)?;
        let target = target_percentage(&token.target_dominance_raw, &state.snapshot.total_target_dominance);

        Ok(target_adjustment(
            token,
            &state.valuation.total_value_usd,
            &target,
            state.share_unit_value(),
            state.snapshot.share_decimals,
        ))
    }
}

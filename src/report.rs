// src/report.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::PoolService;
use crate::domain::conversion::TargetAdjustment;
use crate::domain::dominance::dominance_to_percent;
use crate::domain::fees::FeeEstimate;
use crate::shared::errors::PoolError;
use crate::shared::types::{Denomination, TradeAction};

#[derive(Debug, Serialize)]
pub struct PoolReport {
    pub timestamp: DateTime<Utc>,
    pub slot: Option<u64>,
    pub oracle_authority: String,

    pub total_value_usd: f64,
    pub share_unit_value_usd: f64,
    pub share_supply: Option<String>,
    pub skipped_tokens: usize,

    pub tokens: Vec<TokenReport>,
    pub trade: Option<TradeReport>,
}

#[derive(Debug, Serialize)]
pub struct TokenReport {
    pub mint: String,
    pub symbol: String,
    pub decimals: Option<u8>,
    pub vault_balance: String,
    pub price_usd: Option<f64>,
    pub value_usd: Option<f64>,
    pub actual_dominance_pct: Option<f64>,
    pub target_dominance_pct: f64,
    pub deviation_bps: Option<i64>,
    pub delisted: bool,
    pub user_balance: Option<String>,
    pub to_target: AdjustmentReport,
}

#[derive(Debug, Serialize)]
pub struct AdjustmentReport {
    pub action: &'static str,
    pub usd: Option<f64>,
    /// Native units for a deposit, share tokens for a withdrawal
    pub amount: Option<String>,
}

impl From<&TargetAdjustment> for AdjustmentReport {
    fn from(adjustment: &TargetAdjustment) -> Self {
        match adjustment {
            TargetAdjustment::Deposit { usd, token_amount } => Self {
                action: "deposit",
                usd: Some(usd.to_display_f64()),
                amount: Some(token_amount.to_string()),
            },
            TargetAdjustment::Withdraw { usd, share_amount } => Self {
                action: "withdraw",
                usd: Some(usd.to_display_f64()),
                amount: Some(share_amount.to_string()),
            },
            TargetAdjustment::AtTarget => Self {
                action: "at_target",
                usd: None,
                amount: None,
            },
            TargetAdjustment::Unreachable => Self {
                action: "unreachable",
                usd: None,
                amount: None,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TradeReport {
    pub mint: String,
    pub action: TradeAction,
    pub amount: String,
    pub denomination: Denomination,
    pub estimate: FeeEstimate,
    pub fee_pct: Option<f64>,
}

impl TradeReport {
    pub fn new(mint: String, action: TradeAction, amount: String, denomination: Denomination, estimate: FeeEstimate) -> Self {
        Self {
            fee_pct: estimate.fee_bps().map(|bps| bps as f64 / 100.0),
            mint,
            action,
            amount,
            denomination,
            estimate,
        }
    }
}

impl PoolReport {
    pub fn from_service(service: &PoolService, slot: Option<u64>) -> Result<Self, PoolError> {
        let state = service.state()?;
        let snapshot = &state.snapshot;
        let valuation = &state.valuation;

        let tokens = snapshot
            .tokens
            .iter()
            .zip(&valuation.tokens)
            .map(|(token, value)| {
                let adjustment = service.target_adjustment(&token.mint)?;
                Ok(TokenReport {
                    mint: token.mint.to_string(),
                    symbol: token.symbol.clone(),
                    decimals: token.decimals,
                    vault_balance: token.vault_balance.to_string(),
                    price_usd: token.price_record.as_ref().map(|p| p.to_display_f64()),
                    value_usd: value.value_usd.as_ref().map(|v| v.to_display_f64()),
                    actual_dominance_pct: value.actual_dominance.as_ref().map(dominance_to_percent),
                    target_dominance_pct: dominance_to_percent(&value.target_dominance),
                    deviation_bps: value.deviation_bps.as_ref().and_then(|d| d.to_i64()),
                    delisted: token.is_delisted,
                    user_balance: token.user_balance.as_ref().map(|b| b.to_string()),
                    to_target: AdjustmentReport::from(&adjustment),
                })
            })
            .collect::<Result<Vec<_>, PoolError>>()?;

        Ok(Self {
            timestamp: Utc::now(),
            slot,
            oracle_authority: snapshot.oracle_authority.to_string(),
            total_value_usd: valuation.total_value_usd.to_display_f64(),
            share_unit_value_usd: valuation.share_unit_value.to_display_f64(),
            share_supply: snapshot.share_supply.as_ref().map(|s| s.to_string()),
            skipped_tokens: valuation.skipped,
            tokens,
            trade: None,
        })
    }

    pub fn with_trade(mut self, trade: TradeReport) -> Self {
        self.trade = Some(trade);
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

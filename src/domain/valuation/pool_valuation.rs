//! Whole-pool valuation pass

use solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

use super::{pool_share_unit_value, processed_token_value};
use crate::domain::dominance::{actual_percentage, deviation_bps, target_percentage};
use crate::domain::pool::PoolSnapshot;
use crate::shared::types::{Bps, Dominance, UsdValue};

/// Valuation of one token within the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenValuation {
    pub mint: Pubkey,
    /// `None` when decimals or price were missing from the snapshot
    pub value_usd: Option<UsdValue>,
    /// `None` with `value_usd`, a token left out of the pool has no share of it
    pub actual_dominance: Option<Dominance>,
    pub target_dominance: Dominance,
    pub deviation_bps: Option<Bps>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolValuation {
    pub total_value_usd: UsdValue,
    pub share_unit_value: UsdValue,
    pub tokens: Vec<TokenValuation>,
    /// Tokens left out of the total for missing data
    pub skipped: usize,
}

impl PoolValuation {
    pub fn token(&self, mint: &Pubkey) -> Option<&TokenValuation> {
        self.tokens.iter().find(|t| &t.mint == mint)
    }
}

/// Value every token, the pool total, the share unit value and each token's deviation
pub fn value_pool(snapshot: &PoolSnapshot) -> PoolValuation {
    let values: Vec<Option<UsdValue>> = snapshot.tokens.iter().map(processed_token_value).collect();

    let mut skipped = 0;
    for token in &snapshot.tokens {
        if !token.has_complete_data() {
            skipped += 1;
            warn!(
                "Token {} ({}) has incomplete data (decimals: {:?}, price: {}), left out of pool value",
                token.symbol,
                token.mint,
                token.decimals,
                token.price_record.is_some()
            );
        }
    }

    let total_value_usd: UsdValue = values.iter().flatten().cloned().sum();
    let share_unit_value = pool_share_unit_value(
        &total_value_usd,
        snapshot.share_supply.as_ref(),
        snapshot.share_decimals,
    );

    let tokens = snapshot
        .tokens
        .iter()
        .zip(values)
        .map(|(token, value_usd)| {
            let target_dominance = target_percentage(&token.target_dominance_raw, &snapshot.total_target_dominance);
            let actual_dominance = value_usd.as_ref().map(|v| actual_percentage(v, &total_value_usd));
            let deviation = actual_dominance
                .as_ref()
                .map(|actual| deviation_bps(actual, &target_dominance));

            TokenValuation {
                mint: token.mint,
                value_usd,
                actual_dominance,
                target_dominance,
                deviation_bps: deviation,
            }
        })
        .collect();

    debug!(
        "Pool valued at {} (usd-scaled), share unit value {}, {} tokens skipped",
        total_value_usd, share_unit_value, skipped
    );

    PoolValuation {
        total_value_usd,
        share_unit_value,
        tokens,
        skipped,
    }
}

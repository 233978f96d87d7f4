//! Pool domain - supported tokens and the per-snapshot token records

use num_bigint::BigInt;
use num_traits::Zero;
use solana_sdk::pubkey::Pubkey;

use crate::shared::types::PriceRecord;

/// Static account addresses for one pool token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SupportedTokenConfig {
    pub mint: Pubkey,
    pub vault: Pubkey,
    pub price_feed: Pubkey,
    pub history: Pubkey,
}

/// Account addresses describing a whole pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolLayout {
    pub oracle_aggregator: Pubkey,
    pub share_mint: Pubkey,
    pub tokens: Vec<SupportedTokenConfig>,
}

impl PoolLayout {
    pub fn token(&self, mint: &Pubkey) -> Option<&SupportedTokenConfig> {
        self.tokens.iter().find(|t| &t.mint == mint)
    }
}

/// One pool token as seen in a single account snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedToken {
    pub mint: Pubkey,
    pub symbol: String,
    /// `None` when the history record could not be decoded
    pub decimals: Option<u8>,
    pub vault_balance: BigInt,
    /// `None` when the price feed could not be decoded
    pub price_record: Option<PriceRecord>,
    pub target_dominance_raw: BigInt,
    pub is_delisted: bool,
    /// `None` when no user was given
    pub user_balance: Option<BigInt>,
}

impl ProcessedToken {
    /// Decimals and a price are both needed to value the vault
    pub fn has_complete_data(&self) -> bool {
        self.decimals.is_some() && self.price_record.is_some()
    }

    pub fn is_delisted_target(target_dominance_raw: &BigInt) -> bool {
        target_dominance_raw.is_zero()
    }
}

/// Everything decoded from one consistent set of account buffers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub tokens: Vec<ProcessedToken>,
    /// `None` when the share mint is absent
    pub share_supply: Option<BigInt>,
    pub share_decimals: u8,
    pub total_target_dominance: BigInt,
    pub oracle_authority: Pubkey,
}

impl PoolSnapshot {
    pub fn token(&self, mint: &Pubkey) -> Option<&ProcessedToken> {
        self.tokens.iter().find(|t| &t.mint == mint)
    }
}

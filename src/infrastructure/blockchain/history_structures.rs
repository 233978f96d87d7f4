//! Historical token record structures

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use super::layout::{ensure_len, fixed_str, read_prefix, require, ACCOUNT_HEADER_LEN};
use crate::shared::errors::{DecodeError, RecordKind};

/// Header + price feed id(32) + decimals(1) + symbol(10)
pub const HISTORICAL_TOKEN_ACCOUNT_LEN: usize = ACCOUNT_HEADER_LEN + 32 + 1 + 10;

/// Per-token history account structure
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoricalTokenAccount {
    /// Account discriminator
    pub discriminator: [u8; 8],
    pub price_feed_id: [u8; 32],
    pub decimals: u8,
    pub symbol: [u8; 10],
}

impl HistoricalTokenAccount {
    pub fn try_deserialize(data: &[u8]) -> Result<Self, DecodeError> {
        ensure_len(RecordKind::HistoricalToken, data, HISTORICAL_TOKEN_ACCOUNT_LEN)?;
        read_prefix(RecordKind::HistoricalToken, data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalTokenRecord {
    pub price_feed_id: Pubkey,
    pub decimals: u8,
    pub symbol: String,
}

impl From<&HistoricalTokenAccount> for HistoricalTokenRecord {
    fn from(account: &HistoricalTokenAccount) -> Self {
        Self {
            price_feed_id: Pubkey::new_from_array(account.price_feed_id),
            decimals: account.decimals,
            symbol: fixed_str(&account.symbol),
        }
    }
}

pub fn decode_historical_record(data: Option<&[u8]>) -> Result<HistoricalTokenRecord, DecodeError> {
    let data = require(RecordKind::HistoricalToken, data)?;
    let account = HistoricalTokenAccount::try_deserialize(data)?;
    let record = HistoricalTokenRecord::from(&account);
    debug!("Decoded history record for {} ({} decimals)", record.symbol, record.decimals);
    Ok(record)
}

//! Oracle aggregator account structures
//!
//! The aggregator holds one entry per supported asset: its symbol, target dominance,
//! mint and price feed addresses (as base58 text) and the last update time.

use borsh::{BorshDeserialize, BorshSerialize};
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use tracing::{debug, warn};

use super::layout::{ensure_len, fixed_str, read_prefix, require, ACCOUNT_HEADER_LEN};
use crate::shared::errors::{DecodeError, RecordKind};

/// symbol(10) + dominance(8) + mint text(64) + price feed text(64) + timestamp(8)
pub const ORACLE_TOKEN_INFO_LEN: usize = 10 + 8 + 64 + 64 + 8;

/// Header + authority(32) + declared count(4) + vector length(4)
pub const ORACLE_AGGREGATOR_HEADER_LEN: usize = ACCOUNT_HEADER_LEN + 32 + 4 + 4;

/// One aggregator entry as laid out on chain
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct OracleTokenInfo {
    pub symbol: [u8; 10],
    pub dominance: u64,
    pub address: [u8; 64],
    pub price_feed_id: [u8; 64],
    pub timestamp: i64,
}

/// Oracle aggregator account structure
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct OracleAggregatorAccount {
    /// Account discriminator
    pub discriminator: [u8; 8],
    /// Key allowed to update the aggregator
    pub authority: [u8; 32],
    /// Number of tokens the program says it tracks
    pub total_tokens: u32,
    /// Length-prefixed entry vector
    pub data: Vec<OracleTokenInfo>,
}

impl OracleAggregatorAccount {
    /// Try to deserialize account data into OracleAggregatorAccount.
    ///
    /// Every entry the vector length announces must fit inside the buffer; a short
    /// buffer fails the whole account rather than returning the entries that fit.
    pub fn try_deserialize(data: &[u8]) -> Result<Self, DecodeError> {
        let kind = RecordKind::OracleAggregator;
        ensure_len(kind, data, ORACLE_AGGREGATOR_HEADER_LEN)?;

        let vector_len_offset = ORACLE_AGGREGATOR_HEADER_LEN - 4;
        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&data[vector_len_offset..ORACLE_AGGREGATOR_HEADER_LEN]);
        let vector_len = u32::from_le_bytes(len_bytes) as usize;

        let needed = vector_len
            .checked_mul(ORACLE_TOKEN_INFO_LEN)
            .and_then(|entries| entries.checked_add(ORACLE_AGGREGATOR_HEADER_LEN))
            .ok_or_else(|| DecodeError::Corrupt {
                kind,
                reason: format!("vector length {} overflows", vector_len),
            })?;
        ensure_len(kind, data, needed)?;

        read_prefix(kind, data)
    }
}

/// Decoded aggregator entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleTokenEntry {
    pub symbol: String,
    pub dominance_raw: u64,
    pub mint_address_text: String,
    pub price_feed_address_text: String,
    pub timestamp: i64,
}

impl OracleTokenEntry {
    pub fn dominance(&self) -> BigInt {
        BigInt::from(self.dominance_raw)
    }

    pub fn mint_address(&self) -> Option<Pubkey> {
        Pubkey::from_str(&self.mint_address_text).ok()
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

impl From<&OracleTokenInfo> for OracleTokenEntry {
    fn from(info: &OracleTokenInfo) -> Self {
        Self {
            symbol: fixed_str(&info.symbol),
            dominance_raw: info.dominance,
            mint_address_text: fixed_str(&info.address),
            price_feed_address_text: fixed_str(&info.price_feed_id),
            timestamp: info.timestamp,
        }
    }
}

/// Decoded oracle aggregator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleAggregator {
    pub authority: Pubkey,
    pub declared_count: u32,
    pub entries: Vec<OracleTokenEntry>,
}

impl OracleAggregator {
    /// Entry whose mint text matches `mint`
    pub fn entry_for_mint(&self, mint: &Pubkey) -> Option<&OracleTokenEntry> {
        let mint_text = mint.to_string();
        self.entries.iter().find(|e| e.mint_address_text == mint_text)
    }

    /// Sum of every entry's target dominance
    pub fn total_dominance(&self) -> BigInt {
        self.entries.iter().map(|e| e.dominance()).sum()
    }
}

/// Decode an oracle aggregator account.
///
/// A declared count that disagrees with the vector length is logged and the vector
/// length wins.
pub fn decode_oracle_aggregator(data: Option<&[u8]>) -> Result<OracleAggregator, DecodeError> {
    let data = require(RecordKind::OracleAggregator, data)?;
    let account = OracleAggregatorAccount::try_deserialize(data)?;

    if account.total_tokens as usize != account.data.len() {
        warn!(
            "Oracle aggregator declares {} tokens but holds {} entries, using entries",
            account.total_tokens,
            account.data.len()
        );
    }

    let entries: Vec<OracleTokenEntry> = account.data.iter().map(OracleTokenEntry::from).collect();
    debug!("Decoded oracle aggregator with {} entries", entries.len());

    Ok(OracleAggregator {
        authority: Pubkey::new_from_array(account.authority),
        declared_count: account.total_tokens,
        entries,
    })
}

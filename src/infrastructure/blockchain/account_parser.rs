//! Pool snapshot assembly from raw account buffers

use std::collections::HashMap;

use num_bigint::BigInt;
use num_traits::Zero;
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;
use tracing::{debug, info, warn};

use super::history_structures::decode_historical_record;
use super::oracle_structures::{decode_oracle_aggregator, OracleAggregator};
use super::price_structures::decode_price_record;
use super::token_accounts::{decode_mint_info, decode_token_amount};
use crate::domain::pool::{PoolLayout, PoolSnapshot, ProcessedToken, SupportedTokenConfig};
use crate::shared::errors::{DecodeError, PoolError};

/// Share token decimals assumed when the share mint is missing
pub const DEFAULT_SHARE_DECIMALS: u8 = 9;

/// Anything that maps an account address to its current raw bytes
pub trait AccountSource {
    fn account_data(&self, address: &Pubkey) -> Option<&[u8]>;
}

impl AccountSource for HashMap<Pubkey, Vec<u8>> {
    fn account_data(&self, address: &Pubkey) -> Option<&[u8]> {
        self.get(address).map(Vec::as_slice)
    }
}

/// Associated token account of `owner` for `mint`
pub fn user_token_account(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

/// Decode every account the pool needs into one [`PoolSnapshot`].
///
/// Only the oracle aggregator is required. Missing or corrupt per-token accounts leave
/// the matching fields empty and the token is valued as incomplete.
pub fn build_snapshot<S: AccountSource + ?Sized>(
    layout: &PoolLayout,
    source: &S,
    owner: Option<&Pubkey>,
) -> Result<PoolSnapshot, PoolError> {
    let aggregator = decode_oracle_aggregator(source.account_data(&layout.oracle_aggregator))?;

    let (share_supply, share_decimals) = match decode_mint_info(source.account_data(&layout.share_mint)) {
        Some(mint) => (Some(BigInt::from(mint.supply)), mint.decimals),
        None => {
            warn!("Share mint {} missing or malformed, share value unavailable", layout.share_mint);
            (None, DEFAULT_SHARE_DECIMALS)
        }
    };

    let tokens: Vec<ProcessedToken> = layout
        .tokens
        .iter()
        .map(|token| process_token(token, &aggregator, source, owner))
        .collect();

    info!(
        "Built snapshot: {} tokens, {} oracle entries, share supply {:?}",
        tokens.len(),
        aggregator.entries.len(),
        share_supply
    );

    Ok(PoolSnapshot {
        tokens,
        share_supply,
        share_decimals,
        total_target_dominance: aggregator.total_dominance(),
        oracle_authority: aggregator.authority,
    })
}

fn process_token<S: AccountSource + ?Sized>(
    token: &SupportedTokenConfig,
    aggregator: &OracleAggregator,
    source: &S,
    owner: Option<&Pubkey>,
) -> ProcessedToken {
    let vault_balance = BigInt::from(decode_token_amount(source.account_data(&token.vault)));
    let price_record = optional(decode_price_record(source.account_data(&token.price_feed)), &token.mint);
    let history = optional(decode_historical_record(source.account_data(&token.history)), &token.mint);

    let entry = aggregator.entry_for_mint(&token.mint);
    if entry.is_none() {
        debug!("No oracle entry for {}, treating target as zero", token.mint);
    }
    let target_dominance_raw = entry.map(|e| e.dominance()).unwrap_or_else(BigInt::zero);

    let symbol = history
        .as_ref()
        .map(|h| h.symbol.clone())
        .filter(|s| !s.is_empty())
        .or_else(|| entry.map(|e| e.symbol.clone()).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| token.mint.to_string());

    let user_balance = owner.map(|owner| {
        let account = user_token_account(owner, &token.mint);
        BigInt::from(decode_token_amount(source.account_data(&account)))
    });

    ProcessedToken {
        mint: token.mint,
        symbol,
        decimals: history.map(|h| h.decimals),
        vault_balance,
        price_record,
        is_delisted: ProcessedToken::is_delisted_target(&target_dominance_raw),
        target_dominance_raw,
        user_balance,
    }
}

/// Absent accounts are routine; corrupt ones are worth a warning
fn optional<T>(result: Result<T, DecodeError>, mint: &Pubkey) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_missing() => {
            debug!("{} for token {}", e, mint);
            None
        }
        Err(e) => {
            warn!("{} for token {}", e, mint);
            None
        }
    }
}

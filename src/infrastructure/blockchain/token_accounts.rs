//! SPL token account and mint readers
//!
//! Absent token accounts are normal (a wallet that never held the token), so these
//! readers return zero instead of an error.

use spl_token::solana_program::program_pack::Pack;
use spl_token::state::{Account as TokenAccount, Mint};
use tracing::debug;

use super::layout::{ensure_len, read_u64_le};
use crate::shared::errors::RecordKind;

/// Offset of `amount` in an SPL token account (after mint and owner keys)
pub const TOKEN_ACCOUNT_AMOUNT_OFFSET: usize = 64;
/// Offset of `supply` in an SPL mint (after the optional mint authority)
pub const MINT_SUPPLY_OFFSET: usize = 36;
/// Offset of `decimals` in an SPL mint
pub const MINT_DECIMALS_OFFSET: usize = 44;

/// Supply and decimals of a mint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintInfo {
    pub supply: u64,
    pub decimals: u8,
}

/// Token balance held by a token account, zero when absent or malformed
pub fn decode_token_amount(data: Option<&[u8]>) -> u64 {
    let Some(data) = data else {
        return 0;
    };
    if let Err(e) = ensure_len(RecordKind::TokenAccount, data, TokenAccount::LEN) {
        debug!("{}, treating balance as zero", e);
        return 0;
    }
    read_u64_le(data, TOKEN_ACCOUNT_AMOUNT_OFFSET).unwrap_or(0)
}

/// Supply of a mint, zero when absent or malformed
pub fn decode_mint_supply(data: Option<&[u8]>) -> u64 {
    decode_mint_info(data).map(|mint| mint.supply).unwrap_or(0)
}

pub fn decode_mint_info(data: Option<&[u8]>) -> Option<MintInfo> {
    let data = data?;
    if let Err(e) = ensure_len(RecordKind::Mint, data, Mint::LEN) {
        debug!("{}", e);
        return None;
    }
    Some(MintInfo {
        supply: read_u64_le(data, MINT_SUPPLY_OFFSET)?,
        decimals: *data.get(MINT_DECIMALS_OFFSET)?,
    })
}

//! Valuation domain - token and pool values on the USD scale

mod pool_valuation;

pub use pool_valuation::{value_pool, PoolValuation, TokenValuation};

use num_bigint::BigInt;
use num_traits::Signed;

use crate::domain::pool::ProcessedToken;
use crate::math::{pow10, scale_to_usd};
use crate::shared::types::{PriceRecord, UsdValue};

/// USD value of `vault_balance` native units; zero without a price
pub fn token_value_usd(vault_balance: &BigInt, decimals: u8, price_record: Option<&PriceRecord>) -> UsdValue {
    match price_record {
        Some(price) => scale_to_usd(vault_balance, decimals, price),
        None => UsdValue::zero(),
    }
}

/// USD value of a processed token, `None` when decimals or price are missing
pub fn processed_token_value(token: &ProcessedToken) -> Option<UsdValue> {
    let decimals = token.decimals?;
    let price = token.price_record.as_ref()?;
    Some(token_value_usd(&token.vault_balance, decimals, Some(price)))
}

/// Sum of token values over the tokens with complete data. Incomplete tokens are skipped.
pub fn total_pool_value(tokens: &[ProcessedToken]) -> UsdValue {
    tokens.iter().filter_map(processed_token_value).sum()
}

/// USD value of one whole share token (wLQI), zero when no shares are issued
pub fn pool_share_unit_value(total_pool_value: &UsdValue, share_supply: Option<&BigInt>, share_decimals: u8) -> UsdValue {
    match share_supply {
        Some(supply) if supply.is_positive() => {
            UsdValue::new(total_pool_value.value() * pow10(share_decimals as u32) / supply)
        }
        _ => UsdValue::zero(),
    }
}

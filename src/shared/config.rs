//! Pool configuration file

use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::domain::fees::FeeParams;
use crate::domain::pool::{PoolLayout, SupportedTokenConfig};
use crate::shared::errors::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCfg {
    pub oracle_aggregator: String,
    pub share_mint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCfg {
    pub mint: String,
    pub vault: String,
    pub price_feed: String,
    pub history: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub pool: PoolCfg,
    #[serde(default)]
    pub tokens: Vec<TokenCfg>,
    #[serde(default)]
    pub fees: FeeParams,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        let cfg = Self::from_toml_str(&s).context("parse pool config")?;
        Ok(cfg)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.fees.validate()?;
        Ok(cfg)
    }

    /// Parsed account addresses for the pool
    pub fn pool_layout(&self) -> Result<PoolLayout, ConfigError> {
        let tokens = self
            .tokens
            .iter()
            .enumerate()
            .map(|(i, token)| {
                Ok(SupportedTokenConfig {
                    mint: parse_address(&format!("tokens[{}].mint", i), &token.mint)?,
                    vault: parse_address(&format!("tokens[{}].vault", i), &token.vault)?,
                    price_feed: parse_address(&format!("tokens[{}].price_feed", i), &token.price_feed)?,
                    history: parse_address(&format!("tokens[{}].history", i), &token.history)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(PoolLayout {
            oracle_aggregator: parse_address("pool.oracle_aggregator", &self.pool.oracle_aggregator)?,
            share_mint: parse_address("pool.share_mint", &self.pool.share_mint)?,
            tokens,
        })
    }
}

pub fn parse_address(field: &str, value: &str) -> Result<Pubkey, ConfigError> {
    Pubkey::from_str(value.trim()).map_err(|_| ConfigError::InvalidAddress {
        field: field.to_string(),
        value: value.to_string(),
    })
}

//! Captured account snapshots stored as JSON (`{"accounts": {"<base58>": "<hex>"}}`)

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use tracing::info;

use crate::shared::errors::AppError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Slot the accounts were read at, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<u64>,
    pub accounts: BTreeMap<String, String>,
}

impl AccountSnapshot {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).with_context(|| format!("read snapshot {}", path.display()))?;
        let snapshot: Self = serde_json::from_str(&s).context("parse snapshot JSON")?;
        info!("Loaded {} accounts from {}", snapshot.accounts.len(), path.display());
        Ok(snapshot)
    }

    pub fn insert(&mut self, address: &Pubkey, data: &[u8]) {
        self.accounts.insert(address.to_string(), hex::encode(data));
    }

    /// Decode addresses and hex payloads into an account map
    pub fn to_account_map(&self) -> Result<HashMap<Pubkey, Vec<u8>>, AppError> {
        self.accounts
            .iter()
            .map(|(address, data)| {
                let key = Pubkey::from_str(address)
                    .map_err(|e| AppError::SnapshotError(format!("invalid address {}: {}", address, e)))?;
                let bytes = hex::decode(data.trim_start_matches("0x"))
                    .map_err(|e| AppError::SnapshotError(format!("invalid hex for {}: {}", address, e)))?;
                Ok((key, bytes))
            })
            .collect()
    }
}

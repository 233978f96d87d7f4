//! Error handling for the engine

use std::fmt;
use thiserror::Error;

/// Account record layouts the decoder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    PriceFeed,
    OracleAggregator,
    HistoricalToken,
    TokenAccount,
    Mint,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::PriceFeed => "price feed",
            RecordKind::OracleAggregator => "oracle aggregator",
            RecordKind::HistoricalToken => "historical token",
            RecordKind::TokenAccount => "token account",
            RecordKind::Mint => "mint",
        };
        f.write_str(name)
    }
}

/// Account decoding failures. Absent and corrupt accounts are both routine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{kind} account not found")]
    Missing { kind: RecordKind },

    #[error("{kind} account too short: need {needed} bytes, got {actual}")]
    TooShort {
        kind: RecordKind,
        needed: usize,
        actual: usize,
    },

    #[error("{kind} account is corrupt: {reason}")]
    Corrupt { kind: RecordKind, reason: String },
}

impl DecodeError {
    pub fn kind(&self) -> RecordKind {
        match self {
            DecodeError::Missing { kind }
            | DecodeError::TooShort { kind, .. }
            | DecodeError::Corrupt { kind, .. } => *kind,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, DecodeError::Missing { .. })
    }
}

/// Pool-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Oracle aggregator unavailable: {0}")]
    OracleUnavailable(#[from] DecodeError),

    #[error("Token {0} is not part of the pool")]
    UnknownToken(String),

    #[error("Pool state has not been loaded")]
    NotLoaded,
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid address for {field}: {value}")]
    InvalidAddress { field: String, value: String },

    #[error("Invalid fee parameters: {0}")]
    InvalidFees(String),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Pool error: {0}")]
    PoolError(String),

    #[error("Snapshot error: {0}")]
    SnapshotError(String),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<DecodeError> for AppError {
    fn from(err: DecodeError) -> Self {
        AppError::DecodeError(err.to_string())
    }
}

impl From<PoolError> for AppError {
    fn from(err: PoolError) -> Self {
        AppError::PoolError(err.to_string())
    }
}

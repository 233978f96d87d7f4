//! Account layouts and decoders for the pool's on-chain records

pub mod account_parser;
pub mod history_structures;
pub mod layout;
pub mod oracle_structures;
pub mod price_structures;
pub mod token_accounts;

pub use account_parser::{build_snapshot, user_token_account, AccountSource};
pub use history_structures::{decode_historical_record, HistoricalTokenRecord};
pub use oracle_structures::{decode_oracle_aggregator, OracleAggregator, OracleTokenEntry};
pub use price_structures::decode_price_record;
pub use token_accounts::{decode_mint_info, decode_mint_supply, decode_token_amount, MintInfo};

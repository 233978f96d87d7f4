//! LQI pool valuation and dynamic-fee engine
//! Decodes pool account snapshots, values the pool and estimates deposit/withdraw fees

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod math;
pub mod report;
pub mod shared;

// Re-export main types for convenience
pub use application::{PoolService, PoolState};
pub use domain::fees::{FeeEstimate, FeeParams, TradeAmount};
pub use domain::valuation::PoolValuation;
pub use infrastructure::blockchain::AccountSource;
pub use shared::config::Config;

//! Domain layer - pool valuation, dominance and fee logic

pub mod conversion;
pub mod dominance;
pub mod fees;
pub mod pool;
pub mod valuation;

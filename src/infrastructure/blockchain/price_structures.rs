//! Price feed account structures

use borsh::{BorshDeserialize, BorshSerialize};
use tracing::debug;

use super::layout::{ensure_len, read_prefix, require, ACCOUNT_HEADER_LEN};
use crate::shared::errors::{DecodeError, RecordKind};
use crate::shared::types::PriceRecord;

/// Header + i64 price + i32 exponent
pub const PRICE_FEED_ACCOUNT_LEN: usize = ACCOUNT_HEADER_LEN + 8 + 4;

/// Price feed account structure
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct PriceFeedAccount {
    /// Account discriminator
    pub discriminator: [u8; 8],
    /// Price mantissa
    pub price: i64,
    /// Power of ten applied to the mantissa
    pub exponent: i32,
}

impl PriceFeedAccount {
    /// Try to deserialize account data into PriceFeedAccount. Trailing bytes are not read.
    pub fn try_deserialize(data: &[u8]) -> Result<Self, DecodeError> {
        ensure_len(RecordKind::PriceFeed, data, PRICE_FEED_ACCOUNT_LEN)?;
        read_prefix(RecordKind::PriceFeed, data)
    }

    pub fn to_price_record(&self) -> PriceRecord {
        PriceRecord::new(self.price, self.exponent)
    }
}

/// Decode a price feed account into a [`PriceRecord`]
pub fn decode_price_record(data: Option<&[u8]>) -> Result<PriceRecord, DecodeError> {
    let data = require(RecordKind::PriceFeed, data)?;
    let account = PriceFeedAccount::try_deserialize(data)?;
    debug!("Decoded price feed: {} x 10^{}", account.price, account.exponent);
    Ok(account.to_price_record())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn price_bytes(price: i64, exponent: i32) -> Vec<u8> {
        PriceFeedAccount {
            discriminator: [7; 8],
            price,
            exponent,
        }
        .try_to_vec()
        .unwrap()
    }

    fn sample_account() -> PriceFeedAccount {
        PriceFeedAccount {
            discriminator: [7, 1, 2, 3, 4, 5, 6, 7],
            price: 150_000_000,
            exponent: -8,
        }
    }

    #[test]
    fn test_price_feed_round_trip() {
        let account = sample_account();
        let bytes = account.try_to_vec().unwrap();
        assert_eq!(bytes.len(), PRICE_FEED_ACCOUNT_LEN);

        let decoded = PriceFeedAccount::try_deserialize(&bytes).unwrap();
        assert_eq!(decoded, account);
        assert_eq!(decoded.try_to_vec().unwrap(), bytes);

        let record = decode_price_record(Some(&bytes)).unwrap();
        assert_eq!(record, PriceRecord::new(150_000_000i64, -8));
    }

    #[test]
    fn test_price_feed_layout_offsets() {
        let mut bytes = vec![0u8; PRICE_FEED_ACCOUNT_LEN];
        bytes[8..16].copy_from_slice(&(-42i64).to_le_bytes());
        bytes[16..20].copy_from_slice(&(-6i32).to_le_bytes());

        let record = decode_price_record(Some(&bytes)).unwrap();
        assert_eq!(record, PriceRecord::new(-42i64, -6));
    }

    #[test]
    fn test_price_feed_ignores_trailing_bytes() {
        let mut bytes = sample_account().try_to_vec().unwrap();
        bytes.extend_from_slice(&[0xff; 64]);
        assert_eq!(
            decode_price_record(Some(&bytes)).unwrap(),
            sample_account().to_price_record()
        );
    }

    #[test]
    fn test_price_feed_truncated_or_missing() {
        let bytes = sample_account().try_to_vec().unwrap();
        assert_eq!(
            decode_price_record(Some(&bytes[..bytes.len() - 1])),
            Err(DecodeError::TooShort {
                kind: RecordKind::PriceFeed,
                needed: PRICE_FEED_ACCOUNT_LEN,
                actual: PRICE_FEED_ACCOUNT_LEN - 1,
            })
        );
        assert!(decode_price_record(None).unwrap_err().is_missing());
    }
}

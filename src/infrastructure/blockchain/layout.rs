//! Byte-level helpers shared by the account decoders

use borsh::BorshDeserialize;
use tracing::warn;

use crate::shared::errors::{DecodeError, RecordKind};

/// Length of the account discriminator every program-owned record starts with
pub const ACCOUNT_HEADER_LEN: usize = 8;

/// Unwrap an optional buffer, treating an absent account as a decode failure
pub fn require(kind: RecordKind, data: Option<&[u8]>) -> Result<&[u8], DecodeError> {
    data.ok_or(DecodeError::Missing { kind })
}

pub fn ensure_len(kind: RecordKind, data: &[u8], needed: usize) -> Result<(), DecodeError> {
    if data.len() < needed {
        return Err(DecodeError::TooShort {
            kind,
            needed,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Deserialize a fixed layout from the start of `data`.
///
/// Accounts are allocated larger than the record they hold, so trailing bytes are
/// ignored instead of rejected (`try_from_slice` would reject them).
pub fn read_prefix<T: BorshDeserialize>(kind: RecordKind, data: &[u8]) -> Result<T, DecodeError> {
    let mut cursor = data;
    T::deserialize(&mut cursor).map_err(|e| {
        warn!("Failed to deserialize {} account: {}", kind, e);
        DecodeError::Corrupt {
            kind,
            reason: e.to_string(),
        }
    })
}

/// Read a little-endian `u64` at `offset`
pub fn read_u64_le(data: &[u8], offset: usize) -> Option<u64> {
    let end = offset.checked_add(8)?;
    let bytes: [u8; 8] = data.get(offset..end)?.try_into().ok()?;
    Some(u64::from_le_bytes(bytes))
}

/// Read a NUL-padded text field: bytes up to the first NUL, or the whole field
pub fn fixed_str(field: &[u8]) -> String {
    let end = field.iter().position(|b| *b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

/// Write `text` into a NUL-padded field, truncating if it does not fit
pub fn pad_str<const N: usize>(text: &str) -> [u8; N] {
    let mut field = [0u8; N];
    let bytes = text.as_bytes();
    let len = bytes.len().min(N);
    field[..len].copy_from_slice(&bytes[..len]);
    field
}

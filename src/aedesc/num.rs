//! Signed 32-bit integer payload codec.

use crate::error::OsaError;

/// Encodes a signed integer as 4 little-endian payload bytes,
/// reinterpreting the two's-complement bit pattern as unsigned.
///
/// Fails with `OutOfRange` outside `[-2^31, 2^31 - 1]`.
pub fn encode_i32(value: i64) -> Result<[u8; 4], OsaError> {
    let narrow = i32::try_from(value).map_err(|_| OsaError::OutOfRange(value))?;
    Ok((narrow as u32).to_le_bytes())
}

/// Decodes 4 little-endian payload bytes into a signed integer.
///
/// The unsigned wire value folds into the signed range by subtracting 2^32
/// when it exceeds `2^31 - 1`; with exactly 4 bytes this cannot fail.
pub fn decode_i32(data: &[u8; 4]) -> i64 {
    i64::from(u32::from_le_bytes(*data) as i32)
}

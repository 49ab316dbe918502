//! UTF-16 text payload codec.
//!
//! Encoding always emits little-endian units without a byte-order mark.
//! Decoding honours a leading mark when present and assumes little-endian
//! otherwise; the mark never survives into the decoded string.

use bytes::{BufMut, Bytes, BytesMut};

/// Encodes text as UTF-16LE payload bytes, no byte-order mark.
pub fn encode_utf16le(text: &str) -> Bytes {
    let mut buf = BytesMut::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        buf.put_u16_le(unit);
    }
    buf.freeze()
}

/// Decodes a UTF-16 payload, detecting endianness from an optional
/// byte-order mark.
///
/// Odd-length payloads and invalid surrogate sequences are rejected with a
/// static reason the caller folds into its own error type.
pub fn decode_utf16(data: &[u8]) -> Result<String, &'static str> {
    if data.len() % 2 != 0 {
        return Err("odd-length UTF-16 payload");
    }
    let (big_endian, body) = match data {
        [0xFE, 0xFF, rest @ ..] => (true, rest),
        [0xFF, 0xFE, rest @ ..] => (false, rest),
        _ => (false, data),
    };
    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| {
            let raw = [pair[0], pair[1]];
            if big_endian { u16::from_be_bytes(raw) } else { u16::from_le_bytes(raw) }
        })
        .collect();
    String::from_utf16(&units).map_err(|_| "invalid UTF-16 payload")
}

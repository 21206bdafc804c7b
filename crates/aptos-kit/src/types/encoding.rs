//! Wire encoding primitives.
//!
//! Compound values are encoded with [`bcs`] through their `serde::Serialize`
//! impls. The helpers here cover the primitive layer those impls rely on:
//! ULEB128 integers and length-prefixed byte strings.

use serde::Serialize;

use crate::error::{DecodeError, Error};

/// Maximum encoded length of a `u64` in ULEB128.
const MAX_ULEB128_LEN: usize = 10;

/// Append the ULEB128 encoding of `value` to `out`.
///
/// Seven value bits per byte, least significant group first, high bit set on
/// every byte except the last.
pub fn write_uleb128(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// ULEB128 encoding of `value`.
///
/// ```
/// use aptos_kit::encoding::encode_uleb128;
///
/// assert_eq!(encode_uleb128(0), vec![0x00]);
/// assert_eq!(encode_uleb128(300), vec![0xac, 0x02]);
/// ```
pub fn encode_uleb128(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_ULEB128_LEN);
    write_uleb128(&mut out, value);
    out
}

/// Decode a ULEB128 integer from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed. Over-long encodings
/// (a trailing zero group) are rejected so that decoding is the exact inverse
/// of [`encode_uleb128`].
pub fn decode_uleb128(bytes: &[u8]) -> Result<(u64, usize), DecodeError> {
    let mut value: u64 = 0;
    for (i, byte) in bytes.iter().take(MAX_ULEB128_LEN).enumerate() {
        let group = u64::from(byte & 0x7f);
        let shift = 7 * i as u32;
        if shift == 63 && group > 1 {
            return Err(DecodeError::Overflow);
        }
        value |= group << shift;

        if byte & 0x80 == 0 {
            if i > 0 && *byte == 0 {
                return Err(DecodeError::NonCanonical);
            }
            return Ok((value, i + 1));
        }
    }

    if bytes.len() >= MAX_ULEB128_LEN {
        Err(DecodeError::Overflow)
    } else {
        Err(DecodeError::UnexpectedEnd)
    }
}

/// Length-prefixed byte string: ULEB128 length followed by the bytes.
pub fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + MAX_ULEB128_LEN);
    write_uleb128(&mut out, bytes.len() as u64);
    out.extend_from_slice(bytes);
    out
}

/// Encode any wire type with BCS.
pub fn to_bcs<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, Error> {
    Ok(bcs::to_bytes(value)?)
}

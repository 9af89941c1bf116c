//! QUIC variable-length integer codec (RFC 9000 Section 16).
//!
//! Both fields of a frame header (type and payload length) use this
//! encoding: the two most significant bits of the first byte select a
//! 1, 2, 4, or 8 byte encoding, and the remaining bits hold the value
//! big-endian.

use crate::error::ParseError;

/// Largest value representable as a variable-length integer (2^62 - 1).
pub const MAX_VARINT: u64 = (1 << 62) - 1;

/// Encode a variable-length integer into `buf`.
///
/// Values 0..2^6 use 1 byte, 2^6..2^14 use 2, 2^14..2^30 use 4,
/// 2^30..2^62 use 8.
pub fn encode_varint(buf: &mut Vec<u8>, value: u64) {
    debug_assert!(value <= MAX_VARINT, "varint value too large");
    if value < (1 << 6) {
        buf.push(value as u8);
    } else if value < (1 << 14) {
        buf.push(0x40 | (value >> 8) as u8);
        buf.push(value as u8);
    } else if value < (1 << 30) {
        buf.push(0x80 | (value >> 24) as u8);
        buf.push((value >> 16) as u8);
        buf.push((value >> 8) as u8);
        buf.push(value as u8);
    } else {
        buf.push(0xc0 | (value >> 56) as u8);
        buf.push((value >> 48) as u8);
        buf.push((value >> 40) as u8);
        buf.push((value >> 32) as u8);
        buf.push((value >> 24) as u8);
        buf.push((value >> 16) as u8);
        buf.push((value >> 8) as u8);
        buf.push(value as u8);
    }
}

/// Decode a variable-length integer from the start of `buf`.
///
/// Returns `(value, bytes_consumed)`, or [`ParseError::Incomplete`] if the
/// buffer ends before the encoding does.
pub fn decode_varint(buf: &[u8]) -> Result<(u64, usize), ParseError> {
    let first = *buf.first().ok_or(ParseError::Incomplete)?;
    let len = 1usize << (first >> 6);
    if buf.len() < len {
        return Err(ParseError::Incomplete);
    }
    let mut value = u64::from(first & 0x3f);
    for &b in &buf[1..len] {
        value = (value << 8) | u64::from(b);
    }
    Ok((value, len))
}

/// Returns the encoded byte length for a value (1, 2, 4, or 8).
pub fn varint_len(value: u64) -> usize {
    if value < (1 << 6) {
        1
    } else if value < (1 << 14) {
        2
    } else if value < (1 << 30) {
        4
    } else {
        8
    }
}

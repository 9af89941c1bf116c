//! Frame scanning and fixed-format frame extraction.
//!
//! Every frame on an HTTP-over-QUIC stream starts with a type varint and a
//! payload-length varint, followed by exactly `length` payload bytes. The
//! scanner ([`parse_frames`]) locates one complete frame at the start of a
//! buffer; the per-frame extractors pull typed contents out of it. All
//! extractors borrow the caller's buffer and perform no hidden buffering;
//! an [`Incomplete`](ParseError::Incomplete) result means "feed me a longer
//! buffer from the same stream offset".

use crate::error::ParseError;
use crate::settings::Settings;
use crate::varint::{decode_varint, encode_varint, varint_len};

// ── Frame type identifiers ──────────────────────────────────────────

pub const FRAME_DATA: u64 = 0x00;
pub const FRAME_HEADERS: u64 = 0x01;
pub const FRAME_PRIORITY: u64 = 0x02;
pub const FRAME_CANCEL_PUSH: u64 = 0x03;
pub const FRAME_SETTINGS: u64 = 0x04;
pub const FRAME_PUSH_PROMISE: u64 = 0x05;
pub const FRAME_GOAWAY: u64 = 0x07;
pub const FRAME_MAX_PUSH_ID: u64 = 0x0d;

/// Kind of an HTTP-over-QUIC frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    /// DATA frame (0x00): request or response body bytes.
    Data,
    /// HEADERS frame (0x01): compressed header block.
    Headers,
    /// PRIORITY frame (0x02): stream dependency and weight.
    Priority,
    /// CANCEL_PUSH frame (0x03): abandon a promised push.
    CancelPush,
    /// SETTINGS frame (0x04): configuration parameters.
    Settings,
    /// PUSH_PROMISE frame (0x05): push id plus compressed header block.
    PushPromise,
    /// GOAWAY frame (0x07): graceful shutdown with last accepted id.
    GoAway,
    /// MAX_PUSH_ID frame (0x0d): largest push id the peer may use.
    MaxPushId,
    /// A type identifier outside the known set. The caller must skip the
    /// payload without interpreting it.
    Unknown(u64),
}

impl FrameType {
    /// Map a decoded type identifier to a frame kind.
    pub fn from_id(id: u64) -> Self {
        match id {
            FRAME_DATA => FrameType::Data,
            FRAME_HEADERS => FrameType::Headers,
            FRAME_PRIORITY => FrameType::Priority,
            FRAME_CANCEL_PUSH => FrameType::CancelPush,
            FRAME_SETTINGS => FrameType::Settings,
            FRAME_PUSH_PROMISE => FrameType::PushPromise,
            FRAME_GOAWAY => FrameType::GoAway,
            FRAME_MAX_PUSH_ID => FrameType::MaxPushId,
            other => FrameType::Unknown(other),
        }
    }

    /// The on-wire type identifier.
    pub fn id(&self) -> u64 {
        match self {
            FrameType::Data => FRAME_DATA,
            FrameType::Headers => FRAME_HEADERS,
            FrameType::Priority => FRAME_PRIORITY,
            FrameType::CancelPush => FRAME_CANCEL_PUSH,
            FrameType::Settings => FRAME_SETTINGS,
            FrameType::PushPromise => FRAME_PUSH_PROMISE,
            FrameType::GoAway => FRAME_GOAWAY,
            FrameType::MaxPushId => FRAME_MAX_PUSH_ID,
            FrameType::Unknown(id) => *id,
        }
    }
}

// ── Frame scanner ───────────────────────────────────────────────────

/// Locate one complete frame at the start of `buf`.
///
/// Returns the frame kind and the total span in bytes (header + payload)
/// of exactly one frame. If the buffer holds more than one frame, the
/// caller re-invokes the scanner at the next offset; the scanner never
/// loops itself.
///
/// Unknown type identifiers are reported as [`FrameType::Unknown`] with a
/// correct span so the caller can skip them. The span is validated against
/// the buffer for unknown frames exactly as for known ones: a returned
/// span never extends past the bytes actually present.
///
/// Fails [`ParseError::Incomplete`] when the buffer is too short for the
/// frame header or the declared payload. That is a recoverable
/// need-more-data condition, not a protocol violation.
pub fn parse_frames(buf: &[u8]) -> Result<(FrameType, usize), ParseError> {
    let (type_id, type_len) = decode_varint(buf)?;
    let (payload_len, len_len) = decode_varint(&buf[type_len..])?;
    let total = type_len + len_len + payload_len as usize;
    if buf.len() < total {
        return Err(ParseError::Incomplete);
    }
    Ok((FrameType::from_id(type_id), total))
}

/// Decode the frame header of an `expected` frame whose payload must be
/// fully present, returning the payload slice.
pub(crate) fn expect_frame(buf: &[u8], expected: FrameType) -> Result<&[u8], ParseError> {
    let (type_id, type_len) = decode_varint(buf)?;
    let found = FrameType::from_id(type_id);
    if found != expected {
        return Err(ParseError::UnexpectedFrame { expected, found });
    }
    let (payload_len, len_len) = decode_varint(&buf[type_len..])?;
    let header_len = type_len + len_len;
    let payload_len = payload_len as usize;
    if buf.len() < header_len + payload_len {
        return Err(ParseError::Incomplete);
    }
    Ok(&buf[header_len..header_len + payload_len])
}

// ── DATA ────────────────────────────────────────────────────────────

/// Zero-copy view of a DATA frame's payload.
///
/// `payload` points into the buffer the frame was parsed from and is valid
/// only as long as that buffer. A caller that will free or reuse the
/// buffer before consuming the view must copy the bytes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataFrame<'a> {
    /// Payload bytes present in the buffer.
    pub payload: &'a [u8],
    /// Declared payload bytes not yet present. 0 means the frame is
    /// fully contained in the buffer.
    pub remaining: usize,
}

/// Extract the body of a DATA frame at the start of `buf` without copying.
///
/// The payload need not be complete: the view covers whatever declared
/// payload bytes the buffer holds, and [`DataFrame::remaining`] counts the
/// rest. Fails [`ParseError::UnexpectedFrame`] if a different frame kind
/// starts at offset 0, or [`ParseError::Incomplete`] if the frame header
/// itself is truncated.
pub fn parse_data_frame(buf: &[u8]) -> Result<DataFrame<'_>, ParseError> {
    let (type_id, type_len) = decode_varint(buf)?;
    let found = FrameType::from_id(type_id);
    if found != FrameType::Data {
        return Err(ParseError::UnexpectedFrame {
            expected: FrameType::Data,
            found,
        });
    }
    let (payload_len, len_len) = decode_varint(&buf[type_len..])?;
    let payload_len = payload_len as usize;
    let header_len = type_len + len_len;
    let available = payload_len.min(buf.len() - header_len);
    Ok(DataFrame {
        payload: &buf[header_len..header_len + available],
        remaining: payload_len - available,
    })
}

// ── PRIORITY ────────────────────────────────────────────────────────

/// The prioritized element is a pushed response rather than a request.
pub const PRIORITY_FLAG_PUSH_PRIORITY: u8 = 0x04;
/// The dependency is on a pushed response rather than a request.
pub const PRIORITY_FLAG_PUSH_DEPENDENT: u8 = 0x02;
/// Exclusive dependency.
pub const PRIORITY_FLAG_EXCLUSIVE: u8 = 0x01;

/// Contents of a PRIORITY frame.
///
/// Field values are passed through as received; whether a flag combination
/// is meaningful is a policy concern above this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priority {
    /// Flag bits (`PRIORITY_FLAG_*`).
    pub flags: u8,
    /// Id of the prioritized request or push.
    pub request_id: u64,
    /// Id of the request or push this one depends on.
    pub dependency_id: u64,
    /// Priority weight, 0-255.
    pub weight: u8,
}

/// Extract a PRIORITY frame at the start of `buf`.
///
/// Layout after the frame header: flags byte, prioritized id varint,
/// dependency id varint, weight byte, filling the payload exactly.
pub fn parse_priority_frame(buf: &[u8]) -> Result<Priority, ParseError> {
    let payload = expect_frame(buf, FrameType::Priority)?;
    let (&flags, rest) = payload
        .split_first()
        .ok_or(ParseError::MalformedFrame("empty priority payload"))?;
    let (request_id, id_len) =
        decode_varint(rest).map_err(|_| ParseError::MalformedFrame("truncated priority field"))?;
    let rest = &rest[id_len..];
    let (dependency_id, dep_len) =
        decode_varint(rest).map_err(|_| ParseError::MalformedFrame("truncated priority field"))?;
    let rest = &rest[dep_len..];
    let (&weight, rest) = rest
        .split_first()
        .ok_or(ParseError::MalformedFrame("truncated priority field"))?;
    if !rest.is_empty() {
        return Err(ParseError::MalformedFrame(
            "trailing bytes in priority payload",
        ));
    }
    Ok(Priority {
        flags,
        request_id,
        dependency_id,
        weight,
    })
}

// ── Single-varint frames (CANCEL_PUSH, GOAWAY, MAX_PUSH_ID) ─────────

/// Decode a frame whose payload is exactly one varint.
fn parse_varint_frame(buf: &[u8], expected: FrameType) -> Result<u64, ParseError> {
    let payload = expect_frame(buf, expected)?;
    let (value, len) =
        decode_varint(payload).map_err(|_| ParseError::MalformedFrame("truncated id payload"))?;
    if len != payload.len() {
        return Err(ParseError::MalformedFrame("trailing bytes in id payload"));
    }
    Ok(value)
}

/// Extract the cancelled push id from a CANCEL_PUSH frame.
///
/// Purely syntactic: no check is made that the push id was ever promised.
pub fn parse_cancel_push_frame(buf: &[u8]) -> Result<u64, ParseError> {
    parse_varint_frame(buf, FrameType::CancelPush)
}

/// Extract the last accepted id from a GOAWAY frame.
pub fn parse_goaway_frame(buf: &[u8]) -> Result<u64, ParseError> {
    parse_varint_frame(buf, FrameType::GoAway)
}

/// Extract the maximum permitted push id from a MAX_PUSH_ID frame.
pub fn parse_max_push_id_frame(buf: &[u8]) -> Result<u64, ParseError> {
    parse_varint_frame(buf, FrameType::MaxPushId)
}

// ── Frame writers ───────────────────────────────────────────────────

/// Write a frame header (type + length varints) into `buf`.
pub fn write_frame_header(buf: &mut Vec<u8>, frame_type: u64, payload_len: u64) {
    encode_varint(buf, frame_type);
    encode_varint(buf, payload_len);
}

/// Write a DATA frame carrying `payload`.
pub fn write_data_frame(buf: &mut Vec<u8>, payload: &[u8]) {
    write_frame_header(buf, FRAME_DATA, payload.len() as u64);
    buf.extend_from_slice(payload);
}

/// Write a HEADERS frame carrying an already-compressed header block.
pub fn write_headers_frame(buf: &mut Vec<u8>, block: &[u8]) {
    write_frame_header(buf, FRAME_HEADERS, block.len() as u64);
    buf.extend_from_slice(block);
}

/// Write a PRIORITY frame.
pub fn write_priority_frame(buf: &mut Vec<u8>, priority: &Priority) {
    let payload_len = 2 + varint_len(priority.request_id) + varint_len(priority.dependency_id);
    write_frame_header(buf, FRAME_PRIORITY, payload_len as u64);
    buf.push(priority.flags);
    encode_varint(buf, priority.request_id);
    encode_varint(buf, priority.dependency_id);
    buf.push(priority.weight);
}

/// Write a CANCEL_PUSH frame.
pub fn write_cancel_push_frame(buf: &mut Vec<u8>, push_id: u64) {
    write_varint_frame(buf, FRAME_CANCEL_PUSH, push_id);
}

/// Write a SETTINGS frame.
pub fn write_settings_frame(buf: &mut Vec<u8>, settings: &Settings) {
    write_frame_header(buf, FRAME_SETTINGS, settings.encoded_len() as u64);
    settings.encode(buf);
}

/// Write a PUSH_PROMISE frame: push id varint followed by an
/// already-compressed header block.
pub fn write_push_promise_frame(buf: &mut Vec<u8>, push_id: u64, block: &[u8]) {
    let payload_len = varint_len(push_id) + block.len();
    write_frame_header(buf, FRAME_PUSH_PROMISE, payload_len as u64);
    encode_varint(buf, push_id);
    buf.extend_from_slice(block);
}

/// Write a GOAWAY frame.
pub fn write_goaway_frame(buf: &mut Vec<u8>, last_id: u64) {
    write_varint_frame(buf, FRAME_GOAWAY, last_id);
}

/// Write a MAX_PUSH_ID frame.
pub fn write_max_push_id_frame(buf: &mut Vec<u8>, max_push_id: u64) {
    write_varint_frame(buf, FRAME_MAX_PUSH_ID, max_push_id);
}

fn write_varint_frame(buf: &mut Vec<u8>, frame_type: u64, value: u64) {
    write_frame_header(buf, frame_type, varint_len(value) as u64);
    encode_varint(buf, value);
}

//! Frame codec for the HTTP-over-QUIC framing layer.
//!
//! This crate recognizes, validates, and extracts the contents of the
//! frames carried inside a QUIC stream's byte stream, and drives a
//! header-compression engine to turn compressed header blocks into
//! name/value pairs. It is sans-IO: it never reads from a socket, never
//! decides when more bytes should arrive, and never owns the input
//! buffer. Feed it bytes, get typed frames or a "need more data" signal
//! back.
//!
//! - **Scanning**: [`parse_frames`] locates one complete frame per call;
//!   re-invoke it at the next offset to walk a buffer holding several.
//! - **Extraction**: one `parse_*_frame` function per frame kind, each
//!   borrowing the caller's buffer. DATA extraction is zero-copy.
//! - **Header blocks**: [`parse_headers_frame`] and
//!   [`parse_push_promise_frame`] feed block bytes incrementally into a
//!   [`HeaderCompression`] engine held by a per-stream [`HeaderContext`].
//! - **Writing**: `write_*_frame` builders produce wire-correct frames.
//!
//! # Example - walking a buffer
//!
//! ```
//! use protocol_hq::{parse_data_frame, parse_frames, write_data_frame, write_goaway_frame, FrameType};
//!
//! let mut buf = Vec::new();
//! write_data_frame(&mut buf, b"hello");
//! write_goaway_frame(&mut buf, 42);
//!
//! // First frame: DATA, extracted without copying.
//! let (frame_type, span) = parse_frames(&buf).unwrap();
//! assert_eq!(frame_type, FrameType::Data);
//! let data = parse_data_frame(&buf).unwrap();
//! assert_eq!(data.payload, b"hello");
//! assert_eq!(data.remaining, 0);
//!
//! // Second frame starts where the first ended.
//! let (frame_type, _) = parse_frames(&buf[span..]).unwrap();
//! assert_eq!(frame_type, FrameType::GoAway);
//! ```
//!
//! # Example - decompressing a header block
//!
//! ```
//! use protocol_hq::{
//!     parse_headers_frame, write_headers_frame, Header, HeaderBlock, HeaderCompression,
//!     HeaderContext, StaticTableEngine,
//! };
//!
//! // A peer compresses headers and frames the block.
//! let headers = vec![Header::new(b":method", b"GET"), Header::new(b":path", b"/")];
//! let mut block = Vec::new();
//! StaticTableEngine::new().compress(&headers, &mut block).unwrap();
//! let mut frame = Vec::new();
//! write_headers_frame(&mut frame, &block);
//!
//! // One context per logical header-encoding stream.
//! let mut ctx = HeaderContext::new(StaticTableEngine::new());
//! match parse_headers_frame(&mut ctx, &frame).unwrap() {
//!     HeaderBlock::Complete(decoded) => assert_eq!(decoded, headers),
//!     HeaderBlock::Partial(owed) => panic!("{owed} block bytes still owed"),
//! }
//! ```
//!
//! # Buffering model
//!
//! [`ParseError::Incomplete`] always means the frame is split across
//! reads: buffer more bytes from the stream and retry the same call. No
//! extractor leaves partial effects behind in that case, with one
//! documented exception - the header-block drivers intentionally carry
//! partial decompression state in the [`HeaderContext`] so a block split
//! across frames or reads is fed to the engine exactly once.

mod error;
mod frame;
mod headers;
mod qpack;
mod settings;
mod varint;

pub use error::{EngineError, ParseError};
pub use frame::{
    parse_cancel_push_frame, parse_data_frame, parse_frames, parse_goaway_frame,
    parse_max_push_id_frame, parse_priority_frame, write_cancel_push_frame, write_data_frame,
    write_frame_header, write_goaway_frame, write_headers_frame, write_max_push_id_frame,
    write_priority_frame, write_push_promise_frame, write_settings_frame, DataFrame, FrameType,
    Priority, FRAME_CANCEL_PUSH, FRAME_DATA, FRAME_GOAWAY, FRAME_HEADERS, FRAME_MAX_PUSH_ID,
    FRAME_PRIORITY, FRAME_PUSH_PROMISE, FRAME_SETTINGS, PRIORITY_FLAG_EXCLUSIVE,
    PRIORITY_FLAG_PUSH_DEPENDENT, PRIORITY_FLAG_PUSH_PRIORITY,
};
pub use headers::{
    parse_headers_frame, parse_push_promise_frame, Header, HeaderBlock, HeaderCompression,
    HeaderContext,
};
pub use qpack::StaticTableEngine;
pub use settings::{
    parse_settings_frame, parse_settings_frame_into, Settings, DEFAULT_HEADER_TABLE_SIZE,
    SETTINGS_HEADER_TABLE_SIZE, SETTINGS_MAX_HEADER_LIST_SIZE,
};
pub use varint::{decode_varint, encode_varint, varint_len, MAX_VARINT};

//! Header-block decompression driver for HEADERS and PUSH_PROMISE frames.
//!
//! Both frame kinds carry a compressed header block; PUSH_PROMISE prefixes
//! it with a push id varint. The block may span several reads, so the
//! driver feeds whatever payload bytes are available into a
//! [`HeaderCompression`] engine and reports how many block bytes are still
//! owed. The caller keeps supplying bytes for the *same* logical block
//! until the driver returns [`HeaderBlock::Complete`].
//!
//! The engine behind [`HeaderCompression`] is an external collaborator:
//! this module never looks inside it, it only feeds byte ranges in arrival
//! order and interprets the result. A [`StaticTableEngine`](crate::StaticTableEngine)
//! is provided, but any implementation can be injected.

use crate::error::{EngineError, ParseError};
use crate::frame::FrameType;
use crate::varint::decode_varint;

/// A single header name-value pair.
///
/// Both fields are byte sequences and are not required to be valid text.
/// Order within a decoded list is significant and preserved exactly as
/// decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
}

impl Header {
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A header-compression engine.
///
/// Implementations own the compression state (static/dynamic tables,
/// partially decoded block). State mutations must be applied in the exact
/// byte order the driver feeds them, so one engine instance must never be
/// shared across logical header-encoding streams.
pub trait HeaderCompression {
    /// Feed the next bytes of a header block to the decoder.
    ///
    /// `end_of_block` is true when `input` contains the final bytes of the
    /// block. The decoded, ordered header list is returned exactly then;
    /// earlier calls return `Ok(None)`.
    fn decompress(
        &mut self,
        input: &[u8],
        end_of_block: bool,
    ) -> Result<Option<Vec<Header>>, EngineError>;

    /// Compress `headers` into `out` as one complete header block.
    fn compress(&mut self, headers: &[Header], out: &mut Vec<u8>) -> Result<(), EngineError>;
}

/// Progress of a header block through the decompression driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderBlock {
    /// The block is fully decoded. The caller owns the header list.
    Complete(Vec<Header>),
    /// This many block bytes are still owed before the headers exist.
    /// Supply them with further calls on the same context.
    Partial(usize),
}

/// Bookkeeping for a block that did not arrive complete.
#[derive(Debug)]
struct PartialBlock {
    /// Frame kind that opened the block.
    kind: FrameType,
    /// Push id decoded ahead of the block (PUSH_PROMISE only).
    push_id: Option<u64>,
    /// Block bytes still expected.
    remaining: usize,
}

/// Per-stream header-compression context.
///
/// One instance is shared by all HEADERS and PUSH_PROMISE frames on a
/// logical header-encoding stream; it is the only state the codec carries
/// between calls. Exclusive access for the duration of each call is
/// required (`&mut self`), which also rules out interleaving two streams'
/// blocks through one context.
///
/// After a decompression failure the context is poisoned: every later
/// driver call fails with the same error class without touching the
/// engine, since its table state must be assumed desynchronized.
#[derive(Debug)]
pub struct HeaderContext<E> {
    engine: E,
    partial: Option<PartialBlock>,
    poisoned: bool,
}

impl<E: HeaderCompression> HeaderContext<E> {
    /// Wrap an engine for use on one logical header-encoding stream.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            partial: None,
            poisoned: false,
        }
    }

    /// True once a decompression failure has made the context unusable.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// True while a header block is waiting for more bytes.
    pub fn has_partial_block(&self) -> bool {
        self.partial.is_some()
    }

    fn check_usable(&self) -> Result<(), ParseError> {
        if self.poisoned {
            Err(ParseError::HeaderCompression("context poisoned"))
        } else {
            Ok(())
        }
    }

    fn fail(&mut self, e: EngineError) -> ParseError {
        self.poisoned = true;
        ParseError::from(e)
    }

    /// Feed `block_len` declared block bytes, of which `input` is the
    /// available prefix, recording a partial block under `kind` if the
    /// buffer ran out first.
    fn drive(
        &mut self,
        kind: FrameType,
        push_id: Option<u64>,
        block_len: usize,
        input: &[u8],
    ) -> Result<HeaderBlock, ParseError> {
        let available = block_len.min(input.len());
        let end_of_block = available == block_len;
        let decoded = match self.engine.decompress(&input[..available], end_of_block) {
            Ok(d) => d,
            Err(e) => return Err(self.fail(e)),
        };
        if end_of_block {
            self.partial = None;
            match decoded {
                Some(headers) => Ok(HeaderBlock::Complete(headers)),
                None => Err(self.fail(EngineError::Failed("no field list at end of block"))),
            }
        } else {
            let remaining = block_len - available;
            self.partial = Some(PartialBlock {
                kind,
                push_id,
                remaining,
            });
            Ok(HeaderBlock::Partial(remaining))
        }
    }
}

/// Decompress the header block of a HEADERS frame at the start of `buf`.
///
/// On the first call the buffer must start with the HEADERS frame header;
/// once [`HeaderBlock::Partial`] has been returned, subsequent calls take
/// raw continuation bytes of the same block (no frame header) and consume
/// at most the owed count, so the buffer may already contain the start of
/// the next frame.
///
/// Errors: [`ParseError::UnexpectedFrame`] when a different frame kind
/// starts the buffer, [`ParseError::Incomplete`] when the frame header is
/// truncated, [`ParseError::HeaderCompression`] when the engine rejects
/// the block (fatal: the context is poisoned), [`ParseError::OutOfMemory`]
/// when output allocation fails.
pub fn parse_headers_frame<E: HeaderCompression>(
    ctx: &mut HeaderContext<E>,
    buf: &[u8],
) -> Result<HeaderBlock, ParseError> {
    ctx.check_usable()?;

    if let Some(partial) = &ctx.partial {
        if partial.kind != FrameType::Headers {
            return Err(ParseError::MalformedFrame(
                "continuation for a different frame kind",
            ));
        }
        let remaining = partial.remaining;
        return ctx.drive(FrameType::Headers, None, remaining, buf);
    }

    let (type_id, type_len) = decode_varint(buf)?;
    let found = FrameType::from_id(type_id);
    if found != FrameType::Headers {
        return Err(ParseError::UnexpectedFrame {
            expected: FrameType::Headers,
            found,
        });
    }
    let (block_len, len_len) = decode_varint(&buf[type_len..])?;
    let payload = &buf[type_len + len_len..];
    ctx.drive(FrameType::Headers, None, block_len as usize, payload)
}

/// Decompress a PUSH_PROMISE frame at the start of `buf`.
///
/// Decodes the leading push id, then drives the header block exactly like
/// [`parse_headers_frame`]. The push id is returned with every call for
/// the same block, including continuations.
pub fn parse_push_promise_frame<E: HeaderCompression>(
    ctx: &mut HeaderContext<E>,
    buf: &[u8],
) -> Result<(u64, HeaderBlock), ParseError> {
    ctx.check_usable()?;

    if let Some(partial) = &ctx.partial {
        if partial.kind != FrameType::PushPromise {
            return Err(ParseError::MalformedFrame(
                "continuation for a different frame kind",
            ));
        }
        let push_id = partial.push_id.unwrap_or(0);
        let remaining = partial.remaining;
        let block = ctx.drive(FrameType::PushPromise, Some(push_id), remaining, buf)?;
        return Ok((push_id, block));
    }

    let (type_id, type_len) = decode_varint(buf)?;
    let found = FrameType::from_id(type_id);
    if found != FrameType::PushPromise {
        return Err(ParseError::UnexpectedFrame {
            expected: FrameType::PushPromise,
            found,
        });
    }
    let (payload_len, len_len) = decode_varint(&buf[type_len..])?;
    let payload = &buf[type_len + len_len..];

    // The push id must be complete before any block byte is consumed;
    // no state is recorded on this path, so the caller retries with a
    // longer buffer.
    let (push_id, id_len) = decode_varint(payload)?;
    let payload_len = payload_len as usize;
    if id_len > payload_len {
        return Err(ParseError::MalformedFrame(
            "push id extends past declared payload",
        ));
    }
    let block_len = payload_len - id_len;
    let block = ctx.drive(
        FrameType::PushPromise,
        Some(push_id),
        block_len,
        &payload[id_len..],
    )?;
    Ok((push_id, block))
}

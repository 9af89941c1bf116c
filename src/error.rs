//! Error types for HTTP-over-QUIC frame parsing.

use crate::frame::FrameType;

/// Error type for frame parsing operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Need more data to complete parsing.
    /// This is not a fatal error - the caller should buffer more data and retry.
    #[error("incomplete data")]
    Incomplete,

    /// The frame at the start of the buffer is not the kind the extractor
    /// was asked for.
    #[error("expected {expected:?} frame, found {found:?}")]
    UnexpectedFrame {
        /// The frame kind the extractor expected.
        expected: FrameType,
        /// The frame kind actually present.
        found: FrameType,
    },

    /// Structural protocol violation inside a fully-present frame
    /// (duplicate settings identifier, trailing payload bytes, etc.).
    #[error("malformed frame: {0}")]
    MalformedFrame(&'static str),

    /// A settings identifier outside the recognized set.
    ///
    /// Distinguished from [`ParseError::MalformedFrame`] so that policy
    /// above this layer may tolerate forward-compatible peers.
    #[error("settings identifier not recognized: {0:#04x}")]
    UnrecognizedSetting(u64),

    /// Header decompression failed.
    ///
    /// The compression context is desynchronized and must not be used for
    /// further HEADERS or PUSH_PROMISE frames on the same stream.
    #[error("header compression failure: {0}")]
    HeaderCompression(&'static str),

    /// Failed to allocate memory for parser output.
    #[error("out of memory")]
    OutOfMemory,
}

impl ParseError {
    /// Returns true if this error indicates more data is needed.
    #[inline]
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ParseError::Incomplete)
    }
}

/// Failure reported by a header-compression engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The header block is malformed; engine state must be considered
    /// desynchronized.
    #[error("header compression failure: {0}")]
    Failed(&'static str),

    /// Allocation for the decoded output failed.
    #[error("out of memory")]
    OutOfMemory,
}

impl From<EngineError> for ParseError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Failed(reason) => ParseError::HeaderCompression(reason),
            EngineError::OutOfMemory => ParseError::OutOfMemory,
        }
    }
}

//! SETTINGS frame parsing and the settings table.
//!
//! A SETTINGS payload is a sequence of (identifier, value) varint pairs
//! filling the payload exactly. Each identifier may occur at most once per
//! frame, and identifiers outside the recognized set are surfaced as a
//! distinct condition so policy above this layer can decide whether to
//! tolerate a forward-compatible peer.

use crate::error::ParseError;
use crate::frame::{expect_frame, FrameType};
use crate::varint::{decode_varint, encode_varint, varint_len};

/// Identifier for the header-compression table size setting.
pub const SETTINGS_HEADER_TABLE_SIZE: u64 = 0x01;
/// Identifier for the maximum header list size setting.
pub const SETTINGS_MAX_HEADER_LIST_SIZE: u64 = 0x06;

/// Default header-compression table size.
pub const DEFAULT_HEADER_TABLE_SIZE: u64 = 4096;

/// Settings advertised by a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Maximum size of the header-compression dynamic table.
    pub header_table_size: u64,
    /// Maximum size of a decoded header list. Default unlimited.
    pub max_header_list_size: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            header_table_size: DEFAULT_HEADER_TABLE_SIZE,
            max_header_list_size: u64::MAX,
        }
    }
}

impl Settings {
    /// Encode the settings as (identifier, value) varint pairs.
    ///
    /// Only non-default values are written.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        if self.header_table_size != DEFAULT_HEADER_TABLE_SIZE {
            encode_varint(buf, SETTINGS_HEADER_TABLE_SIZE);
            encode_varint(buf, self.header_table_size);
        }
        if self.max_header_list_size != u64::MAX {
            encode_varint(buf, SETTINGS_MAX_HEADER_LIST_SIZE);
            encode_varint(buf, self.max_header_list_size);
        }
    }

    /// Byte length when encoded.
    pub fn encoded_len(&self) -> usize {
        let mut len = 0;
        if self.header_table_size != DEFAULT_HEADER_TABLE_SIZE {
            len += varint_len(SETTINGS_HEADER_TABLE_SIZE) + varint_len(self.header_table_size);
        }
        if self.max_header_list_size != u64::MAX {
            len += varint_len(SETTINGS_MAX_HEADER_LIST_SIZE) + varint_len(self.max_header_list_size);
        }
        len
    }
}

/// Parse a SETTINGS frame at the start of `buf` into a new [`Settings`].
///
/// See [`parse_settings_frame_into`] for the variant that fills a
/// caller-owned value.
pub fn parse_settings_frame(buf: &[u8]) -> Result<Settings, ParseError> {
    let mut settings = Settings::default();
    parse_settings_frame_into(buf, &mut settings)?;
    Ok(settings)
}

/// Parse a SETTINGS frame at the start of `buf`, filling `settings`.
///
/// On any error the output is left untouched; a frame carrying a
/// duplicate identifier contributes neither of its values.
///
/// Errors: [`ParseError::MalformedFrame`] for a duplicate identifier or a
/// payload not filled exactly by (identifier, value) pairs;
/// [`ParseError::UnrecognizedSetting`] for an identifier outside the
/// recognized set; [`ParseError::UnexpectedFrame`] when no SETTINGS frame
/// starts the buffer; [`ParseError::Incomplete`] when the frame is not yet
/// fully buffered.
pub fn parse_settings_frame_into(buf: &[u8], settings: &mut Settings) -> Result<(), ParseError> {
    let mut payload = expect_frame(buf, FrameType::Settings)?;

    let mut parsed = Settings::default();
    let mut seen_header_table_size = false;
    let mut seen_max_header_list_size = false;

    while !payload.is_empty() {
        let (id, n) = decode_varint(payload)
            .map_err(|_| ParseError::MalformedFrame("truncated settings identifier"))?;
        payload = &payload[n..];
        let (value, n) = decode_varint(payload)
            .map_err(|_| ParseError::MalformedFrame("truncated settings value"))?;
        payload = &payload[n..];

        match id {
            SETTINGS_HEADER_TABLE_SIZE => {
                if seen_header_table_size {
                    return Err(ParseError::MalformedFrame("duplicate settings identifier"));
                }
                seen_header_table_size = true;
                parsed.header_table_size = value;
            }
            SETTINGS_MAX_HEADER_LIST_SIZE => {
                if seen_max_header_list_size {
                    return Err(ParseError::MalformedFrame("duplicate settings identifier"));
                }
                seen_max_header_list_size = true;
                parsed.max_header_list_size = value;
            }
            other => return Err(ParseError::UnrecognizedSetting(other)),
        }
    }

    *settings = parsed;
    Ok(())
}

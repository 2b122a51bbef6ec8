//! Literal pool and symbol table entries of an irep record.
//!
//! # Pool entry
//!
//! | Size | Field |
//! |---|---|
//! | 1 | type tag: 0 = string, 1 = integer, 2 = float |
//! | 2 | length |
//! | length | payload |
//!
//! Integer and float payloads are ASCII decimal text, not binary numerics. Unknown type tags are
//! not rejected; their payload is kept verbatim.
//!
//! # Symbol entry
//!
//! | Size | Field |
//! |---|---|
//! | 2 | length, or `0xFFFF` for the anonymous symbol |
//! | length | name |
//! | 1 | terminator, not counted in length and not stored |
//!
//! The anonymous symbol consumes only its length field.

use std::fmt;

use strum::{Display, FromRepr};

use crate::{file::parser::Parser, Result};

/// Length value marking an anonymous symbol
pub const NULL_SYMBOL_LENGTH: u16 = 0xFFFF;

/// Type tag of a pool entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, FromRepr)]
#[repr(u8)]
pub enum PoolKind {
    /// Raw string literal
    #[strum(serialize = "string")]
    String = 0,
    /// Integer literal, encoded as decimal text
    #[strum(serialize = "integer")]
    Integer = 1,
    /// Floating point literal, encoded as decimal text
    #[strum(serialize = "float")]
    Float = 2,
}

/// One literal of an irep record's constant pool.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolValue {
    /// String literal bytes, not necessarily valid UTF-8
    Str(Vec<u8>),
    /// Integer literal
    Integer(i64),
    /// Floating point literal
    Float(f64),
    /// Entry with an unrecognized type tag, preserved as-is
    Unknown {
        /// The type tag that was found
        tag: u8,
        /// Raw payload
        bytes: Vec<u8>,
    },
}

impl PoolValue {
    /// Read one pool entry at the parser position.
    ///
    /// # Errors
    /// - [`crate::Error::TruncatedInput`] if the entry runs past the buffer
    /// - [`crate::Error::Malformed`] if an integer or float payload is not valid decimal text
    pub fn read(parser: &mut Parser) -> Result<PoolValue> {
        let tag = parser.read_be::<u8>()?;
        let len = parser.read_be::<u16>()?;
        let payload_offset = parser.pos();
        let payload = parser.read_bytes(usize::from(len))?;

        let value = match PoolKind::from_repr(tag) {
            Some(PoolKind::String) => PoolValue::Str(payload.to_vec()),
            Some(PoolKind::Integer) => {
                let text = ascii_payload(payload, payload_offset)?;
                let value = text.trim().parse::<i64>().map_err(|error| {
                    malformed_error!(
                        "Invalid integer literal {:?} at offset {:#x} - {}",
                        text,
                        payload_offset,
                        error
                    )
                })?;
                PoolValue::Integer(value)
            }
            Some(PoolKind::Float) => {
                let text = ascii_payload(payload, payload_offset)?;
                let value = text.trim().parse::<f64>().map_err(|error| {
                    malformed_error!(
                        "Invalid float literal {:?} at offset {:#x} - {}",
                        text,
                        payload_offset,
                        error
                    )
                })?;
                PoolValue::Float(value)
            }
            None => {
                log::debug!("Preserving pool entry with unknown tag {tag} at {payload_offset:#x}");
                PoolValue::Unknown {
                    tag,
                    bytes: payload.to_vec(),
                }
            }
        };

        Ok(value)
    }

    /// The type tag of this entry, `None` for unknown tags
    #[must_use]
    pub fn kind(&self) -> Option<PoolKind> {
        match self {
            PoolValue::Str(_) => Some(PoolKind::String),
            PoolValue::Integer(_) => Some(PoolKind::Integer),
            PoolValue::Float(_) => Some(PoolKind::Float),
            PoolValue::Unknown { .. } => None,
        }
    }
}

impl fmt::Display for PoolValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolValue::Str(bytes) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
            PoolValue::Integer(value) => write!(f, "{value}"),
            PoolValue::Float(value) => write!(f, "{value:?}"),
            PoolValue::Unknown { tag, bytes } => write!(f, "<tag {tag}, {} bytes>", bytes.len()),
        }
    }
}

fn ascii_payload(payload: &[u8], offset: usize) -> Result<&str> {
    std::str::from_utf8(payload)
        .map_err(|_| malformed_error!("Numeric pool literal at offset {:#x} is not text", offset))
}

/// Read one symbol table entry at the parser position.
///
/// Anonymous symbols decode to the empty string. Names that are not valid UTF-8 are converted
/// lossily.
///
/// # Errors
/// Returns [`crate::Error::TruncatedInput`] if the entry runs past the buffer.
pub fn read_symbol(parser: &mut Parser) -> Result<String> {
    let len = parser.read_be::<u16>()?;
    if len == NULL_SYMBOL_LENGTH {
        return Ok(String::new());
    }

    let name = parser.read_bytes(usize::from(len))?;
    parser.advance_by(1)?;

    Ok(String::from_utf8_lossy(name).into_owned())
}

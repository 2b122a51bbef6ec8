//! Low-level cursor for RITE image decoding.
//!
//! This module provides the [`crate::file::parser::Parser`] type, a cursor-based binary data parser
//! over an immutable byte slice. Every component of the image decoder, from the header to the
//! nested irep and debug records, is expressed in terms of its reads.
//!
//! # Key Components
//!
//! ## Navigation Methods
//! - [`crate::file::parser::Parser::seek`] - Move to specific position
//! - [`crate::file::parser::Parser::advance_by`] - Move forward by specified bytes
//! - [`crate::file::parser::Parser::pos`] - Get current position
//! - [`crate::file::parser::Parser::padding`] - Distance to the next alignment boundary
//! - [`crate::file::parser::Parser::align`] - Align to byte boundaries
//!
//! ## Data Access Methods
//! - [`crate::file::parser::Parser::read_be`] - Read primitive types (big-endian)
//! - [`crate::file::parser::Parser::read_bytes`] - Read a fixed-length byte slice
//! - [`crate::file::parser::Parser::read_tag`] - Read a 4-byte identifier
//!
//! # Bounds
//!
//! No operation assumes the buffer is long enough. Any read, skip or alignment that would leave
//! the buffer fails with [`crate::Error::TruncatedInput`] and leaves the position unchanged.
//!
//! # Examples
//!
//! ```rust
//! use ritescope::Parser;
//!
//! let data = [0x00, 0x02, b'h', b'i', 0x00, 0x00, 0x00, 0x2A];
//! let mut parser = Parser::new(&data);
//!
//! let len = parser.read_be::<u16>()?;
//! assert_eq!(parser.read_bytes(usize::from(len))?, b"hi");
//!
//! parser.align(4)?;
//! assert_eq!(parser.read_be::<u32>()?, 42);
//! # Ok::<(), ritescope::Error>(())
//! ```

use crate::{
    file::io::{read_be_at, RiteIO},
    Result,
};

/// A cursor over an immutable byte buffer with bounds-checked big-endian reads.
///
/// The position is an absolute offset into the buffer handed to [`Parser::new`], so alignment
/// computed by [`Parser::padding`] is relative to the start of that buffer.
///
/// # Examples
///
/// ```rust
/// use ritescope::Parser;
///
/// let data = [b'I', b'R', b'E', b'P', 0x00, 0x00, 0x00, 0x10];
/// let mut parser = Parser::new(&data);
///
/// assert_eq!(&parser.read_tag()?, b"IREP");
/// assert_eq!(parser.read_be::<u32>()?, 16);
/// assert!(!parser.has_more_data());
/// # Ok::<(), ritescope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`Parser`] positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Number of bytes between the current position and the end of the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Move the current position to the specified index.
    ///
    /// Seeking to exactly the end of the buffer is allowed; the next read will then fail.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if `pos` is beyond the data length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ritescope::Parser;
    /// let data = [0x01, 0x02, 0x03, 0x04];
    /// let mut parser = Parser::new(&data);
    ///
    /// parser.seek(2)?;
    /// assert_eq!(parser.read_be::<u8>()?, 0x03);
    /// assert!(parser.seek(5).is_err());
    /// # Ok::<(), ritescope::Error>(())
    /// ```
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(truncated_error!(
                self.position,
                pos.saturating_sub(self.position),
                self.remaining()
            ));
        }

        self.position = pos;
        Ok(())
    }

    /// Move the position forward by the specified number of bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if advancing by step would exceed the data length.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        if step > self.remaining() {
            return Err(truncated_error!(self.position, step, self.remaining()));
        }

        self.position += step;
        Ok(())
    }

    /// Get the current position of the parser within the data buffer.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Get access to the underlying data buffer.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Number of padding bytes needed to bring the position to a multiple of `alignment`.
    ///
    /// For an alignment of 4 this is `(-pos) mod 4`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ritescope::Parser;
    /// let data = [0u8; 8];
    /// let mut parser = Parser::new(&data);
    ///
    /// assert_eq!(parser.padding(4), 0);
    /// parser.advance_by(1)?;
    /// assert_eq!(parser.padding(4), 3);
    /// parser.advance_by(2)?;
    /// assert_eq!(parser.padding(4), 1);
    /// # Ok::<(), ritescope::Error>(())
    /// ```
    #[must_use]
    pub fn padding(&self, alignment: usize) -> usize {
        (alignment - (self.position % alignment)) % alignment
    }

    /// Align the position to the next multiple of `alignment`.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if the padding would exceed the data length.
    pub fn align(&mut self, alignment: usize) -> Result<()> {
        self.advance_by(self.padding(alignment))
    }

    /// Read a type `T` from the current position in big-endian format and advance the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if reading would exceed the data length.
    pub fn read_be<T: RiteIO>(&mut self) -> Result<T> {
        read_be_at::<T>(self.data, &mut self.position)
    }

    /// Read `len` raw bytes and advance past them.
    ///
    /// The returned slice borrows from the underlying buffer.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(truncated_error!(self.position, len, self.remaining()));
        }

        let bytes = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    /// Read a 4-byte identifier such as a magic, version or section tag.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedInput`] if fewer than 4 bytes remain.
    pub fn read_tag(&mut self) -> Result<[u8; 4]> {
        let bytes = self.read_bytes(4)?;
        let mut tag = [0_u8; 4];
        tag.copy_from_slice(bytes);
        Ok(tag)
    }
}

//! Byte-buffer providers and low-level reading for RITE images.
//!
//! This module abstracts over where the raw image comes from (a file on disk or a buffer already
//! in memory) and provides the bounds-checked primitives every decoder in [`crate::rite`] is
//! built on.
//!
//! # Key Components
//!
//! - [`crate::file::File`] - Owned handle on the raw image bytes
//! - [`crate::file::Backend`] - Trait for the different data sources
//! - [`crate::file::parser::Parser`] - Cursor used by all decoders
//! - [`crate::file::io`] - Big-endian primitive reads
//!
//! ## Backend Implementations
//! - [`crate::file::physical::Physical`] - Memory-mapped file backend for disk access
//! - [`crate::file::memory::Memory`] - In-memory buffer backend
//!
//! # Examples
//!
//! ```rust,no_run
//! use ritescope::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("script.mrb"))?;
//! println!("Loaded {} bytes", file.len());
//! # Ok::<(), ritescope::Error>(())
//! ```

pub mod io;
pub mod parser;

mod memory;
mod physical;

use std::path::Path;

use memory::Memory;
use physical::Physical;

use crate::{Error::Empty, Result};

/// Backend trait for the sources a RITE image can be read from.
///
/// Implementations provide read-only access to the complete image. The decoder only ever needs
/// an addressable, length-bounded byte sequence.
pub trait Backend: Send + Sync {
    /// Returns a slice of the data at the given offset and length.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TruncatedInput`] if the requested range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let data = self.data();
        let available = data.len().saturating_sub(offset);
        let Some(offset_end) = offset.checked_add(len) else {
            return Err(truncated_error!(offset, len, available));
        };

        if offset_end > data.len() {
            return Err(truncated_error!(offset, len, available));
        }

        Ok(&data[offset..offset_end])
    }

    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize {
        self.data().len()
    }
}

/// A loaded, not yet decoded, RITE image.
///
/// `File` only owns the bytes. Decoding them into a tree is done by
/// [`crate::BinaryImage::parse`], which the convenience constructors
/// [`crate::BinaryImage::from_file`] and [`crate::BinaryImage::from_mem`] call for you.
pub struct File {
    /// The underlying data source (memory or file).
    data: Box<dyn Backend>,
}

impl File {
    /// Loads an image from the given path. The file is memory-mapped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or mapped, or if it is empty.
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Wraps an image that is already in memory.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Empty`] if the buffer is empty.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        Ok(File {
            data: Box::new(data),
        })
    }

    /// Returns the total size of the loaded image in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the image has a length of zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the complete image.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data.data()
    }

    /// Returns `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TruncatedInput`] if the range is out of bounds.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.data.data_slice(offset, len)
    }
}

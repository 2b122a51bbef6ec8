//! RITE binary header.
//!
//! Every image starts with a fixed 22-byte header identifying the format, the bytecode version,
//! the producing compiler, and carrying a checksum over the rest of the image.
//!
//! | Offset | Size | Field |
//! |---|---|---|
//! | 0 | 4 | magic (`"RITE"`) |
//! | 4 | 4 | version (`"0003"`) |
//! | 8 | 2 | checksum |
//! | 10 | 4 | declared size |
//! | 14 | 4 | compiler name |
//! | 18 | 4 | compiler version |
//!
//! The checksum covers `declared size` bytes starting at offset 10, i.e. right after the checksum
//! field itself. That region normally spans the size field, the compiler identity, every section
//! and the end marker.

use crate::{file::parser::Parser, rite::crc::checksum, Error, Result};

/// Magic identifier at the start of every image
pub const RITE_MAGIC: [u8; 4] = *b"RITE";
/// The single bytecode version this decoder accepts
pub const RITE_VERSION: [u8; 4] = *b"0003";
/// Size of the binary header in bytes
pub const HEADER_SIZE: usize = 22;
/// Offset at which the checksummed region starts
pub const CHECKSUM_START: usize = 10;

/// The decoded binary header of a RITE image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryHeader {
    /// Format identifier, normally `"RITE"`
    pub magic: [u8; 4],
    /// Bytecode version, always [`RITE_VERSION`] once decoded
    pub version: [u8; 4],
    /// Declared check value over the content region
    pub checksum: u16,
    /// Number of bytes covered by the checksum, counted from offset 10
    pub size: u32,
    /// Identifier of the producing compiler
    pub compiler_name: [u8; 4],
    /// Version of the producing compiler
    pub compiler_version: [u8; 4],
}

impl BinaryHeader {
    /// Decode the header at the start of `data`, enforcing version and checksum.
    ///
    /// Returns the header together with the offset of the first section.
    ///
    /// The version is checked before the checksum, so an image with a foreign version is reported
    /// as [`Error::UnsupportedVersion`] whether or not its checksum is intact.
    ///
    /// # Errors
    /// - [`Error::TruncatedInput`] if `data` ends inside the header
    /// - [`Error::UnsupportedVersion`] if the version is not `"0003"`
    /// - [`Error::ChecksumMismatch`] if the declared checksum does not match the content, including
    ///   when the image is shorter than its declared size
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ritescope::{BinaryHeader, Error};
    ///
    /// let mut data = b"RITE0002".to_vec();
    /// data.resize(22, 0);
    /// assert!(matches!(
    ///     BinaryHeader::decode(&data),
    ///     Err(Error::UnsupportedVersion { .. })
    /// ));
    /// ```
    pub fn decode(data: &[u8]) -> Result<(BinaryHeader, usize)> {
        let mut parser = Parser::new(data);

        let magic = parser.read_tag()?;
        let version = parser.read_tag()?;
        if version != RITE_VERSION {
            return Err(Error::UnsupportedVersion {
                expected: RITE_VERSION,
                found: version,
            });
        }

        let declared = parser.read_be::<u16>()?;
        let size = parser.read_be::<u32>()?;

        // A region cut short by the end of the buffer is checksummed as far as it goes
        let region_end = CHECKSUM_START
            .saturating_add(size as usize)
            .min(data.len());
        let computed = checksum(&data[CHECKSUM_START..region_end], 0);
        if computed != declared {
            return Err(Error::ChecksumMismatch { declared, computed });
        }

        let compiler_name = parser.read_tag()?;
        let compiler_version = parser.read_tag()?;

        log::trace!(
            "RITE header: compiler {} {}, {} content bytes",
            String::from_utf8_lossy(&compiler_name),
            String::from_utf8_lossy(&compiler_version),
            size
        );

        Ok((
            BinaryHeader {
                magic,
                version,
                checksum: declared,
                size,
                compiler_name,
                compiler_version,
            },
            parser.pos(),
        ))
    }

    /// Returns `true` if the magic identifier reads `"RITE"`.
    #[must_use]
    pub fn has_rite_magic(&self) -> bool {
        self.magic == RITE_MAGIC
    }

    /// The magic identifier as text
    #[must_use]
    pub fn magic_str(&self) -> String {
        String::from_utf8_lossy(&self.magic).into_owned()
    }

    /// The version as text
    #[must_use]
    pub fn version_str(&self) -> String {
        String::from_utf8_lossy(&self.version).into_owned()
    }

    /// The compiler name as text
    #[must_use]
    pub fn compiler_name_str(&self) -> String {
        String::from_utf8_lossy(&self.compiler_name).into_owned()
    }

    /// The compiler version as text
    #[must_use]
    pub fn compiler_version_str(&self) -> String {
        String::from_utf8_lossy(&self.compiler_version).into_owned()
    }
}

/// Decode the header at the start of `data`, see [`BinaryHeader::decode`].
///
/// # Errors
/// See [`BinaryHeader::decode`].
pub fn decode_header(data: &[u8]) -> Result<(BinaryHeader, usize)> {
    BinaryHeader::decode(data)
}

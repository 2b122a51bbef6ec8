//! Bounds-checked big-endian reading primitives for RITE image decoding.
//!
//! Every multi-byte integer in a RITE image is stored big-endian, without exception. This module
//! provides the [`crate::file::io::RiteIO`] trait, implemented for the unsigned widths the format
//! uses, and the free function [`crate::file::io::read_be_at`] that the
//! [`crate::file::parser::Parser`] is built on.
//!
//! # Error Handling
//!
//! Reading functions never wrap, zero-fill or slice past the buffer: any read that would need
//! more bytes than remain returns [`crate::Error::TruncatedInput`] carrying the offset, the
//! number of bytes needed and the number available.
//!
//! # Examples
//!
//! ```rust,ignore
//! use ritescope::file::io::read_be_at;
//!
//! let data = [0x00, 0x01, 0x00, 0x00, 0x00, 0x02];
//! let mut offset = 0;
//!
//! let first: u16 = read_be_at(&data, &mut offset)?;  // offset: 0 -> 2
//! let second: u32 = read_be_at(&data, &mut offset)?; // offset: 2 -> 6
//!
//! assert_eq!(first, 1);
//! assert_eq!(second, 2);
//! # Ok::<(), ritescope::Error>(())
//! ```

use crate::Result;

/// Trait for type-specific, safe, big-endian binary reading.
///
/// Each implementation defines a `Bytes` associated type, the fixed-size byte array holding the
/// encoded value (e.g. `[u8; 4]` for `u32`), and the conversion from that array.
pub trait RiteIO: Sized {
    /// Fixed-size byte array backing this type
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Decode a big-endian byte array into `Self`
    fn from_be_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_rite_io {
    ($($ty:ty => $n:literal),* $(,)?) => {
        $(
            impl RiteIO for $ty {
                type Bytes = [u8; $n];

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }
            }
        )*
    };
}

impl_rite_io! {
    u8 => 1,
    u16 => 2,
    u32 => 4,
}

/// Read a `T` at `offset` in big-endian format, and advance `offset` past it.
///
/// The offset is left untouched when the read fails.
///
/// # Errors
/// Returns [`crate::Error::TruncatedInput`] if fewer than `size_of::<T>()` bytes remain at
/// `offset`.
pub fn read_be_at<T: RiteIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let available = data.len().saturating_sub(*offset);
    if type_len > available {
        return Err(truncated_error!(*offset, type_len, available));
    }

    let Ok(read) = <T::Bytes as TryFrom<&[u8]>>::try_from(&data[*offset..*offset + type_len]) else {
        return Err(truncated_error!(*offset, type_len, available));
    };

    *offset += type_len;
    Ok(T::from_be_bytes(read))
}

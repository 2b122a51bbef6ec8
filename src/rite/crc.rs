//! Checksum engine for the RITE header.
//!
//! The image header stores a 16-bit check value over everything following the checksum field.
//! The arrangement is derived from CRC-16/CCITT but feeds each byte into the low end of a 32-bit
//! work register and never flushes the last two bytes through the polynomial, so it is not
//! interchangeable with a textbook CRC-16 routine: over `"123456789"` it yields `0xBEEF`, where
//! CRC-16/XMODEM yields `0x31C3`.

/// CRC-16/CCITT generator polynomial
const CRC_16_CCITT: u32 = 0x11021;
/// Polynomial aligned with the carry bit of the work register
const CRC_XOR_PATTERN: u32 = CRC_16_CCITT << 8;
/// Bit 24 of the work register
const CRC_CARRY_BIT: u32 = 0x0100_0000;

/// Compute the image check value of `bytes`, starting from `seed`.
///
/// The header checksum is `checksum(content, 0)` where `content` is the declared region
/// following the checksum field.
///
/// # Examples
///
/// ```rust
/// use ritescope::checksum;
///
/// assert_eq!(checksum(b"", 0), 0x0000);
/// assert_eq!(checksum(b"123456789", 0), 0xBEEF);
/// ```
#[must_use]
pub fn checksum(bytes: &[u8], seed: u16) -> u16 {
    let mut crcwk = u32::from(seed) << 8;

    for &byte in bytes {
        crcwk |= u32::from(byte);
        for _ in 0..8 {
            crcwk <<= 1;
            if crcwk & CRC_CARRY_BIT != 0 {
                crcwk ^= CRC_XOR_PATTERN;
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    let result = ((crcwk >> 8) & 0xFFFF) as u16;
    result
}

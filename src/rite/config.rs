//! Parse configuration for image decoding
//!
//! Several size fields in a RITE image are advisory: the reference toolchain writes them but
//! never checks them when loading. By default they are read and kept but not enforced, so every
//! image the reference loader accepts is accepted here too. The strict preset cross-checks them.

/// Configuration for decoding a RITE image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    /// Cross-check advisory irep/debug record sizes and known-section sizes against the bytes
    /// actually consumed, failing with [`crate::Error::Malformed`] on mismatch
    pub check_record_sizes: bool,

    /// Require the header magic to read `"RITE"`
    pub check_magic: bool,

    /// Maximum nesting depth of the irep tree (default: 128)
    pub max_depth: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            check_record_sizes: false,
            check_magic: false,
            max_depth: 128,
        }
    }
}

impl ParseConfig {
    /// Accepts everything the reference loader accepts
    #[must_use]
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Enforces magic and every advisory size field
    #[must_use]
    pub fn strict() -> Self {
        Self {
            check_record_sizes: true,
            check_magic: true,
            ..Self::default()
        }
    }

    /// Override the maximum irep nesting depth
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

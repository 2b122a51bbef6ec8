use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! truncated_error {
    ($offset:expr, $needed:expr, $available:expr) => {
        crate::Error::TruncatedInput {
            offset: $offset,
            needed: $needed,
            available: $available,
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every failure aborts the decode of the whole image. There is no partial tree: symbol tables,
/// nested irep records and debug cross-links are not independently consumable, so a malformed
/// region anywhere invalidates the result.
///
/// # Error Categories
///
/// ## Header Errors
/// - [`Error::UnsupportedVersion`] - The header carries a bytecode version other than `"0003"`
/// - [`Error::ChecksumMismatch`] - The declared checksum disagrees with the computed one
///
/// ## Structure Errors
/// - [`Error::TruncatedInput`] - A read would run past the end of the buffer
/// - [`Error::InvalidLineEncoding`] - Unknown debug line-table encoding tag
/// - [`Error::TreeShapeMismatch`] - A debug section without an irep tree to mirror
/// - [`Error::InvalidFilenameIndex`] - A debug file record names a missing dictionary slot
/// - [`Error::Malformed`] - Any other structural violation
/// - [`Error::RecursionLimit`] - Irep nesting deeper than the configured limit
///
/// ## Input Errors
/// - [`Error::Empty`] - Empty input provided
/// - [`Error::FileError`] - Filesystem I/O errors
///
/// # Examples
///
/// ```rust,no_run
/// use ritescope::{BinaryImage, Error};
/// use std::path::Path;
///
/// match BinaryImage::from_file(Path::new("script.mrb")) {
///     Ok(image) => println!("{} sections", image.sections().len()),
///     Err(Error::ChecksumMismatch { declared, computed }) => {
///         eprintln!("corrupt image: {declared:#06x} != {computed:#06x}");
///     }
///     Err(Error::TruncatedInput { offset, .. }) => eprintln!("truncated at {offset}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The header's version field is not the single supported literal.
    ///
    /// Older and newer bytecode versions are rejected outright, no best-effort decode is tried.
    #[error("Unsupported bytecode version - expected {:?}, found {:?}", String::from_utf8_lossy(.expected), String::from_utf8_lossy(.found))]
    UnsupportedVersion {
        /// The version literal this decoder understands
        expected: [u8; 4],
        /// The version literal found in the header
        found: [u8; 4],
    },

    /// The header checksum does not match the checksum computed over the declared region.
    ///
    /// Signals corruption, or truncation of the region covered by the declared size.
    #[error("Checksum mismatch - header declares {declared:#06x}, content computes to {computed:#06x}")]
    ChecksumMismatch {
        /// The value stored in the header
        declared: u16,
        /// The value computed over the image content
        computed: u16,
    },

    /// A debug file record uses a line-table encoding tag other than array (0) or map (1).
    #[error("Invalid line encoding tag {tag} at offset {offset:#x}")]
    InvalidLineEncoding {
        /// The encoding tag that was found
        tag: u8,
        /// Offset of the tag byte within the image
        offset: usize,
    },

    /// A debug section appeared before any irep section it could mirror.
    #[error("Debug section at offset {offset:#x} has no preceding irep tree to mirror")]
    TreeShapeMismatch {
        /// Offset of the debug section within the image
        offset: usize,
    },

    /// A read would have exceeded the bounds of the input buffer.
    #[error("Truncated input - needed {needed} bytes at offset {offset:#x}, only {available} available")]
    TruncatedInput {
        /// Offset at which the read was attempted
        offset: usize,
        /// Number of bytes the read required
        needed: usize,
        /// Number of bytes remaining at that offset
        available: usize,
    },

    /// A debug file record references a filename slot outside the section's dictionary.
    #[error("Filename index {index} out of range ({count} entries) at offset {offset:#x}")]
    InvalidFilenameIndex {
        /// The referenced dictionary index
        index: u16,
        /// Number of entries in the dictionary
        count: usize,
        /// Offset of the index field within the image
        offset: usize,
    },

    /// The image is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Recursion limit reached.
    ///
    /// The irep tree is nested deeper than [`crate::ParseConfig::max_depth`] allows.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Generic error for miscellaneous failures, such as a failed memory mapping.
    #[error("{0}")]
    Error(String),
}

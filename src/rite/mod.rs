//! Decoding of RITE compiled-bytecode images.
//!
//! A RITE image is a 22-byte header followed by tagged sections and an end marker:
//!
//! ```text
//! +--------+------------------+------------------+-----+-----------+
//! | header | IREP section     | DBG\0 section    | ... | END\0 (8) |
//! | (22)   | tag size ver irep| tag size names   |     |           |
//! +--------+------------------+------------------+-----+-----------+
//! ```
//!
//! All integers are big-endian. The decoder is a single synchronous pass over an immutable
//! buffer; it fails on the first invalid byte pattern and never returns a partial tree.
//!
//! # Key Components
//!
//! - [`crate::rite::crc`] - Checksum engine
//! - [`crate::rite::header`] - [`BinaryHeader`] decoding, version and checksum enforcement
//! - [`crate::rite::irep`] - Recursive [`IrepRecord`] tree and the [`IrepSection`] wrapper
//! - [`crate::rite::pool`] - Literal pool values and symbol names
//! - [`crate::rite::debug`] - Debug tree decoded in lock-step with an irep tree
//! - [`crate::rite::section`] - Section dispatch, opaque sections, end marker
//! - [`crate::rite::image`] - [`BinaryImage`], the assembled result
//! - [`crate::rite::config`] - [`ParseConfig`] strictness settings
//!
//! # Examples
//!
//! ```rust,no_run
//! use ritescope::{BinaryImage, Section};
//!
//! let data = std::fs::read("script.mrb")?;
//! let image = BinaryImage::parse(&data)?;
//!
//! for section in image.sections() {
//!     println!("{:<5} at {:#x}, {} bytes", section.tag_str(), section.offset(), section.size());
//!     if let Section::Irep(irep) = section {
//!         println!("  {} records", irep.root.count_records());
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod crc;
pub mod debug;
pub mod header;
pub mod image;
pub mod irep;
pub mod pool;
pub mod section;

pub use config::ParseConfig;
pub use crc::checksum;
pub use debug::{
    parse_debug_record, DebugIrepRecord, DebugSection, FileRecord, LineEncoding, LineInfo,
    LineMapEntry, LineTable,
};
pub use header::{decode_header, BinaryHeader, HEADER_SIZE, RITE_MAGIC, RITE_VERSION};
pub use image::BinaryImage;
pub use irep::{parse_irep_record, IrepRecord, IrepSection};
pub use pool::{PoolKind, PoolValue};
pub use section::{OpaqueSection, Section, SectionKind};

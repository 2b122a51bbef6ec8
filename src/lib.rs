// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # ritescope
//!
//! A fast, bounds-checked decoder for RITE compiled-bytecode images, the container format
//! produced by the mruby bytecode compiler. `ritescope` turns an image into a tree of
//! instruction blocks ("ireps") with their literal pools and symbol tables, plus the source
//! file and line information of the debug section, without running the compiler or a VM.
//!
//! ## Features
//!
//! - **Bit-exact header validation** - Version check and the format's own checksum arrangement
//! - **Complete irep trees** - Opcode words, typed literal pools, symbol tables, nested blocks
//! - **Debug line tables** - Both array and sparse-map encodings, with instruction lookups
//! - **Opaque sections** - Unknown sections are located and reported, never silently dropped
//! - **Memory safe** - Every read is bounds-checked; corrupt input is an error, never a panic
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ritescope::prelude::*;
//!
//! let image = BinaryImage::from_file("script.mrb".as_ref())?;
//! println!("compiled by {}", image.header().compiler_name_str());
//!
//! if let Some(irep) = image.irep() {
//!     println!("{} code blocks", irep.root.count_records());
//! }
//! # Ok::<(), ritescope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`rite`] - Header, sections, irep and debug trees
//! - [`file`] - Byte-buffer providers and the [`Parser`] cursor
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result). A malformed region anywhere in an image
//! invalidates the whole decode:
//!
//! ```rust,no_run
//! use ritescope::{BinaryImage, Error};
//!
//! match BinaryImage::from_file(std::path::Path::new("script.mrb")) {
//!     Ok(image) => println!("{} sections", image.sections().len()),
//!     Err(Error::UnsupportedVersion { found, .. }) => println!("version {found:?}"),
//!     Err(Error::Malformed { message, .. }) => println!("Malformed: {message}"),
//!     Err(e) => println!("Error: {e}"),
//! }
//! ```
//!
//! ## Logging
//!
//! Decoding events are emitted through the [`log`] facade at `debug` and `trace` level. Nothing
//! is printed unless the application installs a logger.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Byte-buffer providers and bounds-checked primitive reading.
pub mod file;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust,no_run
/// use ritescope::prelude::*;
///
/// let image = BinaryImage::from_file("script.mrb".as_ref())?;
/// for section in image.sections() {
///     println!("{}", section.tag_str());
/// }
/// # Ok::<(), ritescope::Error>(())
/// ```
pub mod prelude;

/// RITE image decoding: header, section dispatch, irep and debug trees.
pub mod rite;

/// `ritescope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `ritescope` Error type
pub use error::Error;

/// Main entry point for decoding images.
pub use rite::BinaryImage;

/// Decoding configuration.
pub use rite::ParseConfig;

/// Image structure types.
pub use rite::{
    checksum, BinaryHeader, DebugIrepRecord, DebugSection, IrepRecord, IrepSection, PoolValue,
    Section,
};

/// Provides access to low-level file and memory parsing utilities.
///
/// # Example
///
/// ```rust
/// use ritescope::Parser;
/// let data = [0x00, 0x2A];
/// let mut parser = Parser::new(&data);
/// assert_eq!(parser.read_be::<u16>()?, 42);
/// # Ok::<(), ritescope::Error>(())
/// ```
pub use file::{parser::Parser, File};

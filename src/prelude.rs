//! # ritescope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types from the
//! ritescope library. Import this module to get quick access to the essential types for
//! RITE image inspection.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all ritescope operations
pub use crate::Error;

/// The result type used throughout ritescope
pub use crate::Result;

/// Configuration for image decoding
pub use crate::ParseConfig;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Main entry point for image decoding
pub use crate::BinaryImage;

/// Low-level file parsing utilities
pub use crate::{File, Parser};

// ================================================================================================
// Image Structure
// ================================================================================================

/// Header and sections
pub use crate::rite::{BinaryHeader, OpaqueSection, Section, SectionKind};

/// Instruction tree
pub use crate::rite::{IrepRecord, IrepSection, PoolKind, PoolValue};

/// Debug information
pub use crate::rite::{
    DebugIrepRecord, DebugSection, FileRecord, LineEncoding, LineInfo, LineMapEntry, LineTable,
};

//! Debug information: per-block source file and line tables.
//!
//! The DBG section maps instruction offsets of every irep record to source filenames and line
//! numbers. Its record tree has exactly the shape of the irep tree it describes, but the debug
//! stream does not store child counts of its own: the count for each node is taken from the
//! matching, already parsed [`IrepRecord`]. Parsing therefore walks both trees in lock-step and
//! can never be done standalone.
//!
//! # Section layout
//!
//! | Size | Field |
//! |---|---|
//! | 4 | tag `"DBG\0"` |
//! | 4 | section size |
//! | 2 | filename count |
//! | 2 + n | per filename: length, bytes (no terminator) |
//! | ... | root debug record |
//!
//! # Record layout
//!
//! | Size | Field |
//! |---|---|
//! | 4 | record size (advisory) |
//! | 2 | file record count |
//! | ... | file records |
//! | ... | one child record per child of the matching irep record |
//!
//! # File record layout
//!
//! | Size | Field |
//! |---|---|
//! | 4 | start instruction offset |
//! | 2 | filename index |
//! | 4 | line entry count |
//! | 1 | encoding: 0 = array of 2-byte lines, 1 = map of (4-byte offset, 2-byte line) |
//! | ... | entries |

use strum::{Display, FromRepr};

use crate::{
    file::parser::Parser,
    rite::{config::ParseConfig, irep::IrepRecord},
    Error, Result,
};

/// Encoding of a file record's line table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, FromRepr)]
#[repr(u8)]
pub enum LineEncoding {
    /// One line number per instruction, by position
    #[strum(serialize = "array")]
    Array = 0,
    /// Sparse instruction offset to line number pairs
    #[strum(serialize = "map")]
    Map = 1,
}

/// One entry of a sparse line map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMapEntry {
    /// Instruction offset the line applies from
    pub offset: u32,
    /// Source line number
    pub line: u16,
}

/// Line table of a file record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineTable {
    /// Line of the n-th instruction, counted from the file record's start offset
    Array(Vec<u16>),
    /// Sparse map, ordered as stored
    Map(Vec<LineMapEntry>),
}

impl LineTable {
    /// The encoding this table was stored in
    #[must_use]
    pub fn encoding(&self) -> LineEncoding {
        match self {
            LineTable::Array(_) => LineEncoding::Array,
            LineTable::Map(_) => LineEncoding::Map,
        }
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            LineTable::Array(lines) => lines.len(),
            LineTable::Map(entries) => entries.len(),
        }
    }

    /// Returns `true` if the table has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Line information for a range of instructions from one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// First instruction offset covered by this record
    pub start_pos: u32,
    /// Index into the section's filename dictionary
    pub filename_index: u16,
    /// The resolved filename
    pub filename: String,
    /// The line table
    pub lines: LineTable,
}

impl FileRecord {
    /// Read one file record, resolving its filename against `filenames`.
    ///
    /// # Errors
    /// - [`Error::TruncatedInput`] if the record runs past the buffer
    /// - [`Error::InvalidFilenameIndex`] if the filename index is outside the dictionary
    /// - [`Error::InvalidLineEncoding`] if the encoding tag is neither 0 nor 1
    pub fn read(parser: &mut Parser, filenames: &[String]) -> Result<FileRecord> {
        let start_pos = parser.read_be::<u32>()?;

        let index_offset = parser.pos();
        let filename_index = parser.read_be::<u16>()?;
        let Some(filename) = filenames.get(usize::from(filename_index)) else {
            return Err(Error::InvalidFilenameIndex {
                index: filename_index,
                count: filenames.len(),
                offset: index_offset,
            });
        };

        let count = parser.read_be::<u32>()? as usize;

        let tag_offset = parser.pos();
        let tag = parser.read_be::<u8>()?;
        let lines = match LineEncoding::from_repr(tag) {
            Some(LineEncoding::Array) => {
                let mut lines = Vec::with_capacity(count.min(parser.remaining() / 2));
                for _ in 0..count {
                    lines.push(parser.read_be::<u16>()?);
                }
                LineTable::Array(lines)
            }
            Some(LineEncoding::Map) => {
                let mut entries = Vec::with_capacity(count.min(parser.remaining() / 6));
                for _ in 0..count {
                    let offset = parser.read_be::<u32>()?;
                    let line = parser.read_be::<u16>()?;
                    entries.push(LineMapEntry { offset, line });
                }
                LineTable::Map(entries)
            }
            None => {
                return Err(Error::InvalidLineEncoding {
                    tag,
                    offset: tag_offset,
                })
            }
        };

        Ok(FileRecord {
            start_pos,
            filename_index,
            filename: filename.clone(),
            lines,
        })
    }

    /// The source line of instruction `pc`, if this record's table covers it.
    #[must_use]
    pub fn line_for(&self, pc: u32) -> Option<u16> {
        let relative = pc.checked_sub(self.start_pos)?;
        match &self.lines {
            LineTable::Array(lines) => lines.get(relative as usize).copied(),
            LineTable::Map(entries) => {
                let after = entries.partition_point(|entry| entry.offset <= pc);
                after.checked_sub(1).map(|index| entries[index].line)
            }
        }
    }
}

/// Source location of an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInfo<'a> {
    /// Source filename
    pub filename: &'a str,
    /// Source line number
    pub line: u16,
}

/// Debug information of one irep record, mirroring its place in the irep tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugIrepRecord {
    /// Offset of the record within the image
    pub offset: usize,
    /// Declared record size, not enforced unless [`ParseConfig::check_record_sizes`] is set
    pub record_size: u32,
    /// File records, in stored order
    pub files: Vec<FileRecord>,
    /// One record per child of the matching irep record, in the same order
    pub children: Vec<DebugIrepRecord>,
}

impl DebugIrepRecord {
    /// Read a debug record tree shaped after `irep`.
    ///
    /// The number of child records read at every level is `irep.children.len()` at that level;
    /// the debug stream itself is never consulted for it.
    ///
    /// # Errors
    /// See [`FileRecord::read`]; in strict mode also [`Error::Malformed`] if the declared record
    /// size does not match the content.
    pub fn read(
        parser: &mut Parser,
        filenames: &[String],
        irep: &IrepRecord,
        config: &ParseConfig,
    ) -> Result<DebugIrepRecord> {
        let offset = parser.pos();
        let record_size = parser.read_be::<u32>()?;
        let file_count = parser.read_be::<u16>()?;

        let mut files = Vec::with_capacity(usize::from(file_count));
        for _ in 0..file_count {
            files.push(FileRecord::read(parser, filenames)?);
        }

        if config.check_record_sizes {
            let consumed = parser.pos() - offset;
            if consumed != record_size as usize {
                return Err(malformed_error!(
                    "Debug record at {:#x} declares {} bytes, contains {}",
                    offset,
                    record_size,
                    consumed
                ));
            }
        }

        let mut children = Vec::with_capacity(irep.children.len());
        for child in &irep.children {
            children.push(DebugIrepRecord::read(parser, filenames, child, config)?);
        }

        Ok(DebugIrepRecord {
            offset,
            record_size,
            files,
            children,
        })
    }

    /// Source location of instruction `pc` within this record.
    ///
    /// Uses the last file record starting at or before `pc`.
    #[must_use]
    pub fn lookup(&self, pc: u32) -> Option<LineInfo<'_>> {
        let file = self.files.iter().rev().find(|file| file.start_pos <= pc)?;
        let line = file.line_for(pc)?;
        Some(LineInfo {
            filename: &file.filename,
            line,
        })
    }
}

/// Parse the debug record starting at `cursor` in `data`, shaped after `matching_irep`, with the
/// default configuration.
///
/// Returns the record and the offset right after its last descendant.
///
/// # Errors
/// See [`DebugIrepRecord::read`].
pub fn parse_debug_record(
    data: &[u8],
    cursor: usize,
    filenames: &[String],
    matching_irep: &IrepRecord,
) -> Result<(DebugIrepRecord, usize)> {
    let mut parser = Parser::new(data);
    parser.seek(cursor)?;
    let record =
        DebugIrepRecord::read(&mut parser, filenames, matching_irep, &ParseConfig::default())?;
    Ok((record, parser.pos()))
}

/// Read a filename dictionary: count(2), then length(2) + bytes per entry.
///
/// # Errors
/// Returns [`Error::TruncatedInput`] if the dictionary runs past the buffer.
pub fn read_filenames(parser: &mut Parser) -> Result<Vec<String>> {
    let count = parser.read_be::<u16>()?;
    let mut filenames = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        let len = parser.read_be::<u16>()?;
        let name = parser.read_bytes(usize::from(len))?;
        filenames.push(String::from_utf8_lossy(name).into_owned());
    }
    Ok(filenames)
}

/// The DBG section: filename dictionary plus a debug tree mirroring an irep tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugSection {
    /// Offset of the section tag within the image
    pub offset: usize,
    /// Declared section size, counted from the tag
    pub size: u32,
    /// Filename dictionary shared by every file record of the section
    pub filenames: Vec<String>,
    /// Root of the debug tree
    pub root: DebugIrepRecord,
    /// Index into [`crate::BinaryImage::sections`] of the irep section this tree mirrors
    pub irep: usize,
}

impl DebugSection {
    /// Read a DBG section, the parser positioned at its tag.
    ///
    /// `irep` is the most recently parsed irep section, as its index in the section list and
    /// its root record; `None` if no irep section precedes this one.
    ///
    /// # Errors
    /// - [`Error::TreeShapeMismatch`] if `irep` is `None`
    /// - see [`DebugIrepRecord::read`] and [`read_filenames`]
    pub fn read(
        parser: &mut Parser,
        config: &ParseConfig,
        irep: Option<(usize, &IrepRecord)>,
    ) -> Result<DebugSection> {
        let offset = parser.pos();
        let Some((irep_index, irep_root)) = irep else {
            return Err(Error::TreeShapeMismatch { offset });
        };

        let _tag = parser.read_tag()?;
        let size = parser.read_be::<u32>()?;
        let filenames = read_filenames(parser)?;
        let root = DebugIrepRecord::read(parser, &filenames, irep_root, config)?;

        if config.check_record_sizes && parser.pos() - offset != size as usize {
            return Err(malformed_error!(
                "DBG section at {:#x} declares {} bytes, contains {}",
                offset,
                size,
                parser.pos() - offset
            ));
        }

        Ok(DebugSection {
            offset,
            size,
            filenames,
            root,
            irep: irep_index,
        })
    }
}

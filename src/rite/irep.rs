//! Instruction representation ("irep") records and the IREP section.
//!
//! An irep record is one compiled code block: its instruction words, literal pool, symbol table
//! and the nested blocks (inner methods, blocks, closures) it owns. Records are laid out
//! depth-first, each immediately followed by its children.
//!
//! # Record layout
//!
//! | Size | Field |
//! |---|---|
//! | 4 | record size (advisory) |
//! | 2 | local variable count |
//! | 2 | register count |
//! | 2 | child count |
//! | 4 | opcode count |
//! | 0-3 | padding to a 4-byte boundary of the image |
//! | 4 * n | opcode words |
//! | 4 | pool count, followed by pool entries |
//! | 4 | symbol count, followed by symbol entries |
//! | ... | `child count` child records |
//!
//! Each record is self-delimiting: the parser returns where it stopped and never needs a length
//! from its parent.

use crate::{
    file::parser::Parser,
    rite::{
        config::ParseConfig,
        pool::{read_symbol, PoolValue},
    },
    Error, Result,
};

/// Smallest possible encoding of a pool entry (tag + length)
const MIN_POOL_ENTRY: usize = 3;
/// Smallest possible encoding of a symbol entry (anonymous symbol)
const MIN_SYMBOL_ENTRY: usize = 2;

/// One compiled code block and, recursively, the blocks nested in it.
#[derive(Debug, Clone, PartialEq)]
pub struct IrepRecord {
    /// Offset of the record within the image
    pub offset: usize,
    /// Declared record size, not enforced unless [`ParseConfig::check_record_sizes`] is set
    pub record_size: u32,
    /// Number of local variables
    pub nlocals: u16,
    /// Number of registers
    pub nregs: u16,
    /// Instruction words, opaque to this decoder
    pub opcodes: Vec<u32>,
    /// Literal pool
    pub pool: Vec<PoolValue>,
    /// Symbol table, anonymous entries are empty strings
    pub symbols: Vec<String>,
    /// Nested records, in file order
    pub children: Vec<IrepRecord>,
}

impl IrepRecord {
    /// Read one record and all of its descendants at the parser position.
    ///
    /// `depth` is the nesting level of this record, 0 for the root.
    ///
    /// # Errors
    /// - [`Error::TruncatedInput`] if any field runs past the buffer
    /// - [`Error::RecursionLimit`] if nesting exceeds [`ParseConfig::max_depth`]
    /// - [`Error::Malformed`] for invalid pool literals, or a record size mismatch in strict mode
    pub fn read(parser: &mut Parser, config: &ParseConfig, depth: usize) -> Result<IrepRecord> {
        if depth > config.max_depth {
            return Err(Error::RecursionLimit(config.max_depth));
        }

        let offset = parser.pos();
        let record_size = parser.read_be::<u32>()?;
        let nlocals = parser.read_be::<u16>()?;
        let nregs = parser.read_be::<u16>()?;
        let child_count = parser.read_be::<u16>()?;

        let opcode_count = parser.read_be::<u32>()? as usize;
        parser.align(4)?;
        let mut opcodes = Vec::with_capacity(opcode_count.min(parser.remaining() / 4));
        for _ in 0..opcode_count {
            opcodes.push(parser.read_be::<u32>()?);
        }

        let pool_count = parser.read_be::<u32>()? as usize;
        let mut pool = Vec::with_capacity(pool_count.min(parser.remaining() / MIN_POOL_ENTRY));
        for _ in 0..pool_count {
            pool.push(PoolValue::read(parser)?);
        }

        let symbol_count = parser.read_be::<u32>()? as usize;
        let mut symbols =
            Vec::with_capacity(symbol_count.min(parser.remaining() / MIN_SYMBOL_ENTRY));
        for _ in 0..symbol_count {
            symbols.push(read_symbol(parser)?);
        }

        if config.check_record_sizes {
            let consumed = parser.pos() - offset;
            if consumed != record_size as usize {
                return Err(malformed_error!(
                    "Irep record at {:#x} declares {} bytes, contains {}",
                    offset,
                    record_size,
                    consumed
                ));
            }
        }

        log::trace!(
            "irep at {offset:#x}: {opcode_count} opcodes, {pool_count} literals, {symbol_count} symbols, {child_count} children"
        );

        let mut children = Vec::with_capacity(usize::from(child_count));
        for _ in 0..child_count {
            children.push(IrepRecord::read(parser, config, depth + 1)?);
        }

        Ok(IrepRecord {
            offset,
            record_size,
            nlocals,
            nregs,
            opcodes,
            pool,
            symbols,
            children,
        })
    }

    /// Total number of records in this subtree, including `self`.
    #[must_use]
    pub fn count_records(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(IrepRecord::count_records)
            .sum::<usize>()
    }

    /// Iterate over this subtree depth-first, parents before children, in file order.
    #[must_use]
    pub fn iter(&self) -> IrepIter<'_> {
        IrepIter { stack: vec![self] }
    }
}

/// Depth-first pre-order iterator over an irep subtree, see [`IrepRecord::iter`]
pub struct IrepIter<'a> {
    stack: Vec<&'a IrepRecord>,
}

impl<'a> Iterator for IrepIter<'a> {
    type Item = &'a IrepRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.stack.pop()?;
        self.stack.extend(record.children.iter().rev());
        Some(record)
    }
}

/// Parse the irep record starting at `cursor` in `data`, with the default configuration.
///
/// Returns the record and the offset right after its last descendant.
///
/// # Errors
/// See [`IrepRecord::read`].
pub fn parse_irep_record(data: &[u8], cursor: usize) -> Result<(IrepRecord, usize)> {
    let mut parser = Parser::new(data);
    parser.seek(cursor)?;
    let record = IrepRecord::read(&mut parser, &ParseConfig::default(), 0)?;
    Ok((record, parser.pos()))
}

/// The IREP section: the image's instruction tree.
///
/// Layout: tag `"IREP"`(4), section size(4), format version stamp(4), root record.
#[derive(Debug, Clone, PartialEq)]
pub struct IrepSection {
    /// Offset of the section tag within the image
    pub offset: usize,
    /// Declared section size, counted from the tag
    pub size: u32,
    /// Format version stamp of the section
    pub rite_version: [u8; 4],
    /// Root of the instruction tree
    pub root: IrepRecord,
    /// Index into [`crate::BinaryImage::sections`] of the debug section mirroring this tree.
    ///
    /// Set when a debug section is matched to this irep section. The debug tree has the exact
    /// shape of [`IrepSection::root`], so the debug node for any irep node is found at the same
    /// path.
    pub debug: Option<usize>,
}

impl IrepSection {
    /// Read an IREP section, the parser positioned at its tag.
    ///
    /// On return the parser sits right after the root record; the dispatcher moves on from the
    /// declared section size.
    ///
    /// # Errors
    /// See [`IrepRecord::read`]; in strict mode also [`Error::Malformed`] if the declared section
    /// size does not match the content.
    pub fn read(parser: &mut Parser, config: &ParseConfig) -> Result<IrepSection> {
        let offset = parser.pos();
        let _tag = parser.read_tag()?;
        let size = parser.read_be::<u32>()?;
        let rite_version = parser.read_tag()?;
        let root = IrepRecord::read(parser, config, 0)?;

        if config.check_record_sizes && parser.pos() - offset != size as usize {
            return Err(malformed_error!(
                "IREP section at {:#x} declares {} bytes, contains {}",
                offset,
                size,
                parser.pos() - offset
            ));
        }

        Ok(IrepSection {
            offset,
            size,
            rite_version,
            root,
            debug: None,
        })
    }

    /// The version stamp as text
    #[must_use]
    pub fn rite_version_str(&self) -> String {
        String::from_utf8_lossy(&self.rite_version).into_owned()
    }
}

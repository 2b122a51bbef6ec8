//! Section dispatch.
//!
//! After the header, an image is a sequence of tagged sections closed by an end marker. Every
//! section starts with a 4-byte tag and a 4-byte size counted from the tag. `IREP` and `DBG\0`
//! sections are decoded; every other tag (including `LINE` and `LVAR`) is recorded as an
//! [`OpaqueSection`] and its body skipped unexamined.

use std::ops::Range;

use strum::Display;

use crate::{
    file::parser::Parser,
    rite::{config::ParseConfig, debug::DebugSection, irep::IrepSection},
    Result,
};

/// Tag of the instruction tree section
pub const IREP_TAG: [u8; 4] = *b"IREP";
/// Tag of the debug information section
pub const DEBUG_TAG: [u8; 4] = *b"DBG\0";
/// Tag of the line number section, skipped as opaque
pub const LINENO_TAG: [u8; 4] = *b"LINE";
/// Tag of the local variable section, skipped as opaque
pub const LVAR_TAG: [u8; 4] = *b"LVAR";
/// Tag of the end marker
pub const END_TAG: [u8; 4] = *b"END\0";
/// Size of the end marker: tag plus 4 unused bytes
pub const END_MARKER_SIZE: usize = 8;
/// Size of the tag and size fields every section starts with
pub const SECTION_HEADER_SIZE: usize = 8;

/// Coarse classification of a [`Section`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SectionKind {
    /// Instruction tree
    #[strum(serialize = "irep")]
    Irep,
    /// Debug information
    #[strum(serialize = "debug")]
    Debug,
    /// Located but not interpreted
    #[strum(serialize = "opaque")]
    Opaque,
}

/// A section whose body is not interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueSection {
    /// The section tag
    pub tag: [u8; 4],
    /// Offset of the tag within the image
    pub offset: usize,
    /// Declared size, counted from the tag
    pub size: u32,
}

impl OpaqueSection {
    /// Byte range of the whole section within the image
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.size as usize
    }
}

/// One top-level section of an image, in file order.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// Decoded `IREP` section
    Irep(IrepSection),
    /// Decoded `DBG\0` section
    Debug(DebugSection),
    /// Any other section
    Opaque(OpaqueSection),
}

impl Section {
    /// The 4-byte tag of this section
    #[must_use]
    pub fn tag(&self) -> [u8; 4] {
        match self {
            Section::Irep(_) => IREP_TAG,
            Section::Debug(_) => DEBUG_TAG,
            Section::Opaque(opaque) => opaque.tag,
        }
    }

    /// The tag as printable text, with NUL bytes dropped
    #[must_use]
    pub fn tag_str(&self) -> String {
        String::from_utf8_lossy(&self.tag())
            .trim_end_matches('\0')
            .to_string()
    }

    /// Offset of the section within the image
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            Section::Irep(irep) => irep.offset,
            Section::Debug(debug) => debug.offset,
            Section::Opaque(opaque) => opaque.offset,
        }
    }

    /// Declared size of the section, counted from its tag
    #[must_use]
    pub fn size(&self) -> u32 {
        match self {
            Section::Irep(irep) => irep.size,
            Section::Debug(debug) => debug.size,
            Section::Opaque(opaque) => opaque.size,
        }
    }

    /// Coarse classification
    #[must_use]
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Irep(_) => SectionKind::Irep,
            Section::Debug(_) => SectionKind::Debug,
            Section::Opaque(_) => SectionKind::Opaque,
        }
    }
}

/// Decode the section sequence starting at `start` up to and including the end marker.
///
/// The end marker is consumed but not returned. A debug section is matched to the most recently
/// decoded irep section, whose [`IrepSection::debug`] is then set to the debug section's index.
///
/// # Errors
/// - [`crate::Error::TruncatedInput`] if a section, or the missing end marker, runs past the buffer
/// - [`crate::Error::TreeShapeMismatch`] if a debug section precedes every irep section
/// - [`crate::Error::Malformed`] if a section declares a size smaller than its own header or content
/// - any error of the irep and debug decoders
pub fn parse_sections(data: &[u8], start: usize, config: &ParseConfig) -> Result<Vec<Section>> {
    let mut parser = Parser::new(data);
    parser.seek(start)?;

    let mut sections = Vec::new();
    let mut last_irep: Option<usize> = None;

    loop {
        let section_start = parser.pos();
        let tag = parser.read_tag()?;

        match tag {
            END_TAG => {
                parser.advance_by(END_MARKER_SIZE - 4)?;
                log::debug!("End marker at {section_start:#x}");
                break;
            }
            IREP_TAG => {
                parser.seek(section_start)?;
                let section = IrepSection::read(&mut parser, config)?;
                let end = known_section_end(section_start, section.size, parser.pos())?;

                log::debug!(
                    "IREP section at {section_start:#x}: {} records",
                    section.root.count_records()
                );
                last_irep = Some(sections.len());
                sections.push(Section::Irep(section));
                parser.seek(end)?;
            }
            DEBUG_TAG => {
                parser.seek(section_start)?;
                let irep = last_irep.and_then(|index| match &sections[index] {
                    Section::Irep(irep) => Some((index, &irep.root)),
                    _ => None,
                });
                let section = DebugSection::read(&mut parser, config, irep)?;
                let end = known_section_end(section_start, section.size, parser.pos())?;

                let index = sections.len();
                if let Some(Section::Irep(irep)) = sections.get_mut(section.irep) {
                    log::debug!(
                        "DBG section at {section_start:#x} linked to IREP section at {:#x}",
                        irep.offset
                    );
                    irep.debug = Some(index);
                }
                sections.push(Section::Debug(section));
                parser.seek(end)?;
            }
            _ => {
                let size = parser.read_be::<u32>()?;
                if (size as usize) < SECTION_HEADER_SIZE {
                    return Err(malformed_error!(
                        "Section {:?} at {:#x} declares size {} smaller than its header",
                        String::from_utf8_lossy(&tag),
                        section_start,
                        size
                    ));
                }

                log::debug!(
                    "Skipping opaque section {:?} at {section_start:#x}, {size} bytes",
                    String::from_utf8_lossy(&tag)
                );
                parser.seek(section_start)?;
                parser.advance_by(size as usize)?;
                sections.push(Section::Opaque(OpaqueSection {
                    tag,
                    offset: section_start,
                    size,
                }));
            }
        }
    }

    Ok(sections)
}

/// Where the dispatcher continues after a decoded section: its declared end, which must not lie
/// inside the content just decoded.
fn known_section_end(section_start: usize, size: u32, content_end: usize) -> Result<usize> {
    let declared_end = section_start.saturating_add(size as usize);
    if declared_end < content_end {
        return Err(malformed_error!(
            "Section at {:#x} declares {} bytes but its content runs to {:#x}",
            section_start,
            size,
            content_end
        ));
    }
    Ok(declared_end)
}

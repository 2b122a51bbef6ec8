//! The decoded image: header plus sections.

use std::path::Path;

use crate::{
    file::File,
    rite::{
        config::ParseConfig,
        debug::{DebugIrepRecord, DebugSection},
        header::BinaryHeader,
        irep::{IrepRecord, IrepSection},
        section::{parse_sections, Section},
    },
    Result,
};

/// A fully decoded RITE image.
///
/// Built in one pass by [`BinaryImage::parse`]; owns the whole irep and debug trees. Decoding is
/// pure: parsing the same bytes twice yields equal values.
///
/// # Examples
///
/// ```rust,no_run
/// use ritescope::BinaryImage;
/// use std::path::Path;
///
/// let image = BinaryImage::from_file(Path::new("script.mrb"))?;
/// if let Some(irep) = image.irep() {
///     image.walk(irep, |record, debug, depth| {
///         let line = debug.and_then(|d| d.lookup(0)).map(|info| info.line);
///         println!("{:indent$}{} opcodes, first line {:?}", "", record.opcodes.len(), line, indent = depth * 2);
///     });
/// }
/// # Ok::<(), ritescope::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryImage {
    header: BinaryHeader,
    sections: Vec<Section>,
}

impl BinaryImage {
    /// Decode an image held in memory with the default configuration.
    ///
    /// # Errors
    /// Fails on the first invalid byte pattern, see [`crate::Error`].
    pub fn parse(data: &[u8]) -> Result<BinaryImage> {
        Self::parse_with(data, &ParseConfig::default())
    }

    /// Decode an image held in memory.
    ///
    /// # Errors
    /// Fails on the first invalid byte pattern, see [`crate::Error`]. With
    /// [`ParseConfig::check_magic`] set, a header magic other than `"RITE"` is
    /// [`crate::Error::Malformed`].
    pub fn parse_with(data: &[u8], config: &ParseConfig) -> Result<BinaryImage> {
        let (header, cursor) = BinaryHeader::decode(data)?;
        if config.check_magic && !header.has_rite_magic() {
            return Err(malformed_error!(
                "Invalid magic {:?}",
                String::from_utf8_lossy(&header.magic)
            ));
        }

        let sections = parse_sections(data, cursor, config)?;

        Ok(BinaryImage { header, sections })
    }

    /// Decode an image from a memory buffer.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] for an empty buffer, otherwise see [`BinaryImage::parse`].
    pub fn from_mem(data: Vec<u8>) -> Result<BinaryImage> {
        Self::from_mem_with(data, &ParseConfig::default())
    }

    /// Decode an image from a memory buffer with the given configuration.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] for an empty buffer, otherwise see [`BinaryImage::parse_with`].
    pub fn from_mem_with(data: Vec<u8>, config: &ParseConfig) -> Result<BinaryImage> {
        let file = File::from_mem(data)?;
        Self::parse_with(file.data(), config)
    }

    /// Decode an image file from disk.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is empty, otherwise see
    /// [`BinaryImage::parse`].
    pub fn from_file(path: &Path) -> Result<BinaryImage> {
        Self::from_file_with(path, &ParseConfig::default())
    }

    /// Decode an image file from disk with the given configuration.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is empty, otherwise see
    /// [`BinaryImage::parse_with`].
    pub fn from_file_with(path: &Path, config: &ParseConfig) -> Result<BinaryImage> {
        let file = File::from_file(path)?;
        Self::parse_with(file.data(), config)
    }

    /// The binary header
    #[must_use]
    pub fn header(&self) -> &BinaryHeader {
        &self.header
    }

    /// All sections in file order, the end marker excluded
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// All irep sections in file order
    pub fn irep_sections(&self) -> impl Iterator<Item = &IrepSection> {
        self.sections.iter().filter_map(|section| match section {
            Section::Irep(irep) => Some(irep),
            _ => None,
        })
    }

    /// All debug sections in file order
    pub fn debug_sections(&self) -> impl Iterator<Item = &DebugSection> {
        self.sections.iter().filter_map(|section| match section {
            Section::Debug(debug) => Some(debug),
            _ => None,
        })
    }

    /// The last irep section of the image, normally its only one
    #[must_use]
    pub fn irep(&self) -> Option<&IrepSection> {
        self.irep_sections().last()
    }

    /// The debug section matched to `irep`, if any
    #[must_use]
    pub fn debug_for(&self, irep: &IrepSection) -> Option<&DebugSection> {
        match self.sections.get(irep.debug?)? {
            Section::Debug(debug) => Some(debug),
            _ => None,
        }
    }

    /// The irep section `debug` mirrors
    #[must_use]
    pub fn irep_for(&self, debug: &DebugSection) -> Option<&IrepSection> {
        match self.sections.get(debug.irep)? {
            Section::Irep(irep) => Some(irep),
            _ => None,
        }
    }

    /// Visit every record of `irep` depth-first, parents before children, together with the
    /// mirrored debug record (if a debug section was matched) and its nesting depth.
    pub fn walk<F>(&self, irep: &IrepSection, mut visitor: F)
    where
        F: FnMut(&IrepRecord, Option<&DebugIrepRecord>, usize),
    {
        let debug = self.debug_for(irep).map(|debug| &debug.root);
        walk_record(&irep.root, debug, 0, &mut visitor);
    }

    /// Split into header and sections
    #[must_use]
    pub fn into_parts(self) -> (BinaryHeader, Vec<Section>) {
        (self.header, self.sections)
    }
}

fn walk_record<F>(
    record: &IrepRecord,
    debug: Option<&DebugIrepRecord>,
    depth: usize,
    visitor: &mut F,
) where
    F: FnMut(&IrepRecord, Option<&DebugIrepRecord>, usize),
{
    visitor(record, debug, depth);
    for (index, child) in record.children.iter().enumerate() {
        let child_debug = debug.and_then(|debug| debug.children.get(index));
        walk_record(child, child_debug, depth + 1, visitor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        rite::{pool::PoolValue, section::SectionKind},
        test::{DebugBuilder, FileBuilder, ImageBuilder, IrepBuilder, SectionBuilder},
        Error,
    };

    fn sample() -> Vec<u8> {
        ImageBuilder::new()
            .section(SectionBuilder::irep(
                IrepBuilder::new(1, 3)
                    .opcodes(&[0x0000_0001, 0x0000_0002])
                    .literal_str("hello")
                    .symbol("puts")
                    .child(IrepBuilder::new(2, 4).opcodes(&[0x0000_0003]).literal_int("12"))
                    .child(IrepBuilder::new(0, 2).null_symbol()),
            ))
            .section(SectionBuilder::opaque(b"LVAR", &[1, 2, 3, 4]))
            .section(SectionBuilder::debug(
                &["main.rb", "util.rb"],
                DebugBuilder::new()
                    .file(FileBuilder::array(0, 0, &[1, 2]))
                    .child(DebugBuilder::new().file(FileBuilder::map(0, 1, &[(0, 5)])))
                    .child(DebugBuilder::new()),
            ))
            .build()
    }

    #[test]
    fn assembled() {
        let image = BinaryImage::parse(&sample()).unwrap();

        assert_eq!(image.header().version_str(), "0003");
        let kinds: Vec<SectionKind> = image.sections().iter().map(Section::kind).collect();
        assert_eq!(
            kinds,
            vec![SectionKind::Irep, SectionKind::Opaque, SectionKind::Debug]
        );

        let irep = image.irep().unwrap();
        assert_eq!(irep.root.pool, vec![PoolValue::Str(b"hello".to_vec())]);
        assert_eq!(irep.root.children[0].pool, vec![PoolValue::Integer(12)]);
        assert_eq!(irep.root.children[1].symbols, vec![String::new()]);

        let debug = image.debug_for(irep).unwrap();
        assert_eq!(debug.filenames, vec!["main.rb", "util.rb"]);
        assert_eq!(image.irep_for(debug), Some(irep));
        assert_eq!(image.debug_sections().count(), 1);
    }

    #[test]
    fn strict_accepts_builder_output() {
        assert!(BinaryImage::parse_with(&sample(), &ParseConfig::strict()).is_ok());
    }

    #[test]
    fn walk_pairs_records() {
        let image = BinaryImage::parse(&sample()).unwrap();
        let irep = image.irep().unwrap();

        let mut visited = Vec::new();
        image.walk(irep, |record, debug, depth| {
            let location = debug
                .and_then(|d| d.lookup(0))
                .map(|info| (info.filename.to_string(), info.line));
            visited.push((record.nregs, depth, location));
        });

        assert_eq!(
            visited,
            vec![
                (3, 0, Some(("main.rb".to_string(), 1))),
                (4, 1, Some(("util.rb".to_string(), 5))),
                (2, 1, None),
            ]
        );
    }

    #[test]
    fn walk_without_debug() {
        let data = ImageBuilder::new()
            .section(SectionBuilder::irep(
                IrepBuilder::new(0, 1).child(IrepBuilder::new(0, 1)),
            ))
            .build();
        let image = BinaryImage::parse(&data).unwrap();

        let mut count = 0;
        image.walk(image.irep().unwrap(), |_, debug, _| {
            assert!(debug.is_none());
            count += 1;
        });
        assert_eq!(count, 2);
    }

    #[test]
    fn pure() {
        let data = sample();
        assert_eq!(
            BinaryImage::parse(&data).unwrap(),
            BinaryImage::parse(&data).unwrap()
        );
    }

    #[test]
    fn check_magic() {
        let data = ImageBuilder::new()
            .magic(b"ETIR")
            .section(SectionBuilder::irep(IrepBuilder::new(0, 1)))
            .build();

        assert!(BinaryImage::parse(&data).is_ok());
        assert!(matches!(
            BinaryImage::parse_with(&data, &ParseConfig::strict()),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn debug_before_irep() {
        let data = ImageBuilder::new()
            .section(SectionBuilder::debug(&["a.rb"], DebugBuilder::new()))
            .section(SectionBuilder::irep(IrepBuilder::new(0, 1)))
            .build();

        assert!(matches!(
            BinaryImage::parse(&data),
            Err(Error::TreeShapeMismatch { offset: 22 })
        ));
    }

    #[test]
    fn unsupported_version() {
        let data = ImageBuilder::new()
            .version(b"0002")
            .section(SectionBuilder::irep(IrepBuilder::new(0, 1)))
            .build();

        assert!(matches!(
            BinaryImage::parse(&data),
            Err(Error::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn truncated_anywhere_fails() {
        let data = sample();
        for len in [0, 10, 21, 30, data.len() / 2, data.len() - 1] {
            assert!(
                BinaryImage::parse(&data[..len]).is_err(),
                "prefix of {len} bytes decoded"
            );
        }
    }

    #[test]
    fn empty_buffer() {
        assert!(matches!(BinaryImage::from_mem(Vec::new()), Err(Error::Empty)));
    }

    #[test]
    fn into_parts() {
        let (header, sections) = BinaryImage::from_mem(sample()).unwrap().into_parts();
        assert!(header.has_rite_magic());
        assert_eq!(sections.len(), 3);
    }
}

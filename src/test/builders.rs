use crate::rite::{
    crc::checksum,
    header::{CHECKSUM_START, RITE_MAGIC, RITE_VERSION},
    section::{DEBUG_TAG, END_TAG, IREP_TAG},
};

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn len_u16(len: usize) -> u16 {
    u16::try_from(len).expect("test data too large")
}

fn len_u32(len: usize) -> u32 {
    u32::try_from(len).expect("test data too large")
}

fn patch_u32(out: &mut [u8], at: usize, value: u32) {
    out[at..at + 4].copy_from_slice(&value.to_be_bytes());
}

/// Builds one irep record and its children.
#[derive(Debug, Clone)]
pub struct IrepBuilder {
    nlocals: u16,
    nregs: u16,
    opcodes: Vec<u32>,
    pool: Vec<(u8, Vec<u8>)>,
    symbols: Vec<Option<String>>,
    children: Vec<IrepBuilder>,
    record_size: Option<u32>,
}

impl IrepBuilder {
    pub fn new(nlocals: u16, nregs: u16) -> Self {
        IrepBuilder {
            nlocals,
            nregs,
            opcodes: Vec::new(),
            pool: Vec::new(),
            symbols: Vec::new(),
            children: Vec::new(),
            record_size: None,
        }
    }

    pub fn opcodes(mut self, opcodes: &[u32]) -> Self {
        self.opcodes.extend_from_slice(opcodes);
        self
    }

    pub fn literal_raw(mut self, tag: u8, bytes: &[u8]) -> Self {
        self.pool.push((tag, bytes.to_vec()));
        self
    }

    pub fn literal_str(self, value: &str) -> Self {
        self.literal_raw(0, value.as_bytes())
    }

    pub fn literal_int(self, text: &str) -> Self {
        self.literal_raw(1, text.as_bytes())
    }

    pub fn literal_float(self, text: &str) -> Self {
        self.literal_raw(2, text.as_bytes())
    }

    pub fn symbol(mut self, name: &str) -> Self {
        self.symbols.push(Some(name.to_string()));
        self
    }

    pub fn null_symbol(mut self) -> Self {
        self.symbols.push(None);
        self
    }

    pub fn child(mut self, child: IrepBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Override the declared record size
    pub fn record_size(mut self, size: u32) -> Self {
        self.record_size = Some(size);
        self
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        let start = out.len();
        push_u32(out, 0);
        push_u16(out, self.nlocals);
        push_u16(out, self.nregs);
        push_u16(out, len_u16(self.children.len()));
        push_u32(out, len_u32(self.opcodes.len()));
        while out.len() % 4 != 0 {
            out.push(0);
        }
        for opcode in &self.opcodes {
            push_u32(out, *opcode);
        }

        push_u32(out, len_u32(self.pool.len()));
        for (tag, bytes) in &self.pool {
            out.push(*tag);
            push_u16(out, len_u16(bytes.len()));
            out.extend_from_slice(bytes);
        }

        push_u32(out, len_u32(self.symbols.len()));
        for symbol in &self.symbols {
            match symbol {
                Some(name) => {
                    push_u16(out, len_u16(name.len()));
                    out.extend_from_slice(name.as_bytes());
                    out.push(0);
                }
                None => push_u16(out, 0xFFFF),
            }
        }

        let size = self
            .record_size
            .unwrap_or_else(|| len_u32(out.len() - start));
        patch_u32(out, start, size);

        for child in &self.children {
            child.write(out);
        }
    }
}

#[derive(Debug, Clone)]
enum Lines {
    Array(Vec<u16>),
    Map(Vec<(u32, u16)>),
}

/// Builds one debug file record.
#[derive(Debug, Clone)]
pub struct FileBuilder {
    start_pos: u32,
    filename_index: u16,
    lines: Lines,
}

impl FileBuilder {
    pub fn array(start_pos: u32, filename_index: u16, lines: &[u16]) -> Self {
        FileBuilder {
            start_pos,
            filename_index,
            lines: Lines::Array(lines.to_vec()),
        }
    }

    pub fn map(start_pos: u32, filename_index: u16, entries: &[(u32, u16)]) -> Self {
        FileBuilder {
            start_pos,
            filename_index,
            lines: Lines::Map(entries.to_vec()),
        }
    }

    fn write(&self, out: &mut Vec<u8>) {
        push_u32(out, self.start_pos);
        push_u16(out, self.filename_index);
        match &self.lines {
            Lines::Array(lines) => {
                push_u32(out, len_u32(lines.len()));
                out.push(0);
                for line in lines {
                    push_u16(out, *line);
                }
            }
            Lines::Map(entries) => {
                push_u32(out, len_u32(entries.len()));
                out.push(1);
                for (offset, line) in entries {
                    push_u32(out, *offset);
                    push_u16(out, *line);
                }
            }
        }
    }
}

/// Builds one debug record and its children.
#[derive(Debug, Clone, Default)]
pub struct DebugBuilder {
    files: Vec<FileBuilder>,
    children: Vec<DebugBuilder>,
    record_size: Option<u32>,
}

impl DebugBuilder {
    pub fn new() -> Self {
        DebugBuilder::default()
    }

    pub fn file(mut self, file: FileBuilder) -> Self {
        self.files.push(file);
        self
    }

    pub fn child(mut self, child: DebugBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Override the declared record size
    pub fn record_size(mut self, size: u32) -> Self {
        self.record_size = Some(size);
        self
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        let start = out.len();
        push_u32(out, 0);
        push_u16(out, len_u16(self.files.len()));
        for file in &self.files {
            file.write(out);
        }

        let size = self
            .record_size
            .unwrap_or_else(|| len_u32(out.len() - start));
        patch_u32(out, start, size);

        for child in &self.children {
            child.write(out);
        }
    }
}

#[derive(Debug, Clone)]
enum Body {
    Irep(IrepBuilder),
    Debug(Vec<String>, DebugBuilder),
    Opaque([u8; 4], Vec<u8>),
}

/// Builds one top-level section.
#[derive(Debug, Clone)]
pub struct SectionBuilder {
    body: Body,
    size: Option<u32>,
    trailing: Vec<u8>,
}

impl SectionBuilder {
    fn with_body(body: Body) -> Self {
        SectionBuilder {
            body,
            size: None,
            trailing: Vec::new(),
        }
    }

    pub fn irep(root: IrepBuilder) -> Self {
        Self::with_body(Body::Irep(root))
    }

    pub fn debug(filenames: &[&str], root: DebugBuilder) -> Self {
        let filenames = filenames.iter().map(|name| (*name).to_string()).collect();
        Self::with_body(Body::Debug(filenames, root))
    }

    pub fn opaque(tag: &[u8; 4], body: &[u8]) -> Self {
        Self::with_body(Body::Opaque(*tag, body.to_vec()))
    }

    /// Override the declared section size
    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Extra bytes after the content, counted in the section size
    pub fn trailing(mut self, bytes: &[u8]) -> Self {
        self.trailing.extend_from_slice(bytes);
        self
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        let start = out.len();
        match &self.body {
            Body::Irep(root) => {
                out.extend_from_slice(&IREP_TAG);
                push_u32(out, 0);
                out.extend_from_slice(b"0000");
                root.write(out);
            }
            Body::Debug(filenames, root) => {
                out.extend_from_slice(&DEBUG_TAG);
                push_u32(out, 0);
                push_u16(out, len_u16(filenames.len()));
                for name in filenames {
                    push_u16(out, len_u16(name.len()));
                    out.extend_from_slice(name.as_bytes());
                }
                root.write(out);
            }
            Body::Opaque(tag, body) => {
                out.extend_from_slice(tag);
                push_u32(out, 0);
                out.extend_from_slice(body);
            }
        }
        out.extend_from_slice(&self.trailing);

        let size = self.size.unwrap_or_else(|| len_u32(out.len() - start));
        patch_u32(out, start + 4, size);
    }
}

/// Builds a complete image: header, sections, end marker, size and checksum.
#[derive(Debug, Clone)]
pub struct ImageBuilder {
    magic: [u8; 4],
    version: [u8; 4],
    sections: Vec<SectionBuilder>,
}

impl Default for ImageBuilder {
    fn default() -> Self {
        ImageBuilder {
            magic: RITE_MAGIC,
            version: RITE_VERSION,
            sections: Vec::new(),
        }
    }
}

impl ImageBuilder {
    pub fn new() -> Self {
        ImageBuilder::default()
    }

    pub fn magic(mut self, magic: &[u8; 4]) -> Self {
        self.magic = *magic;
        self
    }

    pub fn version(mut self, version: &[u8; 4]) -> Self {
        self.version = *version;
        self
    }

    pub fn section(mut self, section: SectionBuilder) -> Self {
        self.sections.push(section);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.magic);
        out.extend_from_slice(&self.version);
        push_u16(&mut out, 0);
        push_u32(&mut out, 0);
        out.extend_from_slice(b"MATZ");
        out.extend_from_slice(b"0000");

        for section in &self.sections {
            section.write(&mut out);
        }

        out.extend_from_slice(&END_TAG);
        push_u32(&mut out, 8);

        let size = len_u32(out.len() - CHECKSUM_START);
        patch_u32(&mut out, CHECKSUM_START, size);
        let crc = checksum(&out[CHECKSUM_START..], 0);
        out[8..10].copy_from_slice(&crc.to_be_bytes());
        out
    }
}

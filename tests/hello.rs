/*
def greet(list)
  list.each { |x| -7 }
end

puts "Hello, world", 42, 1.5
*/
// hello.mrb is a hand-assembled RITE0003 image shaped like the compiler output for the script
// above: a root irep with one child block, a DBG section naming two source files (array and map
// line tables), and LINE / LVAR sections that are located but not interpreted.

use std::path::PathBuf;

use ritescope::{
    prelude::*,
    rite::{parse_debug_record, parse_irep_record},
};

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/samples/hello.mrb")
}

#[test]
fn hello() {
    let image = BinaryImage::from_file(&sample_path()).unwrap();

    verify_header(&image);
    verify_sections(&image);
    verify_irep(&image);
    verify_debug(&image);
    verify_walk(&image);
}

#[test]
fn hello_strict() {
    let data = std::fs::read(sample_path()).unwrap();
    let lenient = BinaryImage::parse(&data).unwrap();
    let strict = BinaryImage::parse_with(&data, &ParseConfig::strict()).unwrap();
    assert_eq!(lenient, strict);
}

#[test]
fn hello_from_mem() {
    let data = std::fs::read(sample_path()).unwrap();
    let from_mem = BinaryImage::from_mem(data).unwrap();
    let from_file = BinaryImage::from_file(&sample_path()).unwrap();
    assert_eq!(from_mem, from_file);
}

#[test]
fn hello_record_entry_points() {
    let data = std::fs::read(sample_path()).unwrap();

    let (root, next) = parse_irep_record(&data, 0x22).unwrap();
    assert_eq!(root.count_records(), 2);
    assert_eq!(next, 0x9E);

    let (child, next) = parse_irep_record(&data, 0x71).unwrap();
    assert!(child.children.is_empty());
    assert_eq!(next, 0x9E);

    let filenames = vec!["hello.rb".to_string(), "greet.rb".to_string()];
    let (debug, next) = parse_debug_record(&data, 0xC8, &filenames, &root).unwrap();
    assert_eq!(debug.children.len(), 1);
    assert_eq!(next, 0xFE);
}

fn verify_header(image: &BinaryImage) {
    let header = image.header();
    assert!(header.has_rite_magic());
    assert_eq!(header.version_str(), "0003");
    assert_eq!(header.checksum, 0xD789);
    assert_eq!(header.size, 264);
    assert_eq!(header.compiler_name_str(), "MATZ");
    assert_eq!(header.compiler_version_str(), "0000");
}

fn verify_sections(image: &BinaryImage) {
    let layout: Vec<(String, SectionKind, usize, u32)> = image
        .sections()
        .iter()
        .map(|s| (s.tag_str(), s.kind(), s.offset(), s.size()))
        .collect();

    assert_eq!(
        layout,
        vec![
            ("IREP".to_string(), SectionKind::Irep, 0x16, 136),
            ("LINE".to_string(), SectionKind::Opaque, 0x9E, 12),
            ("DBG".to_string(), SectionKind::Debug, 0xAA, 84),
            ("LVAR".to_string(), SectionKind::Opaque, 0xFE, 12),
        ]
    );

    match &image.sections()[3] {
        Section::Opaque(lvar) => assert_eq!(lvar.range(), 0xFE..0x10A),
        other => panic!("expected opaque LVAR section, got {other:?}"),
    }
}

fn verify_irep(image: &BinaryImage) {
    let irep = image.irep().unwrap();
    assert_eq!(irep.rite_version_str(), "0300");
    assert_eq!(irep.debug, Some(2));

    let root = &irep.root;
    assert_eq!(root.offset, 0x22);
    assert_eq!(root.record_size, 79);
    assert_eq!(root.nlocals, 1);
    assert_eq!(root.nregs, 4);
    assert_eq!(
        root.opcodes,
        vec![0x0001_0000, 0x1002_0000, 0x2F01_0100, 0x4A00_0000]
    );
    assert_eq!(
        root.pool,
        vec![
            PoolValue::Str(b"Hello, world".to_vec()),
            PoolValue::Integer(42),
            PoolValue::Float(1.5),
        ]
    );
    assert_eq!(root.symbols, vec!["puts", "greet"]);
    assert_eq!(root.children.len(), 1);

    let child = &root.children[0];
    assert_eq!(child.offset, 0x71);
    assert_eq!(child.record_size, 45);
    assert_eq!(child.nlocals, 2);
    assert_eq!(child.nregs, 5);
    assert_eq!(child.opcodes, vec![0x0102_0300, 0x3700_0000]);
    assert_eq!(child.pool, vec![PoolValue::Integer(-7)]);
    assert_eq!(child.symbols, vec!["each", ""]);
    assert!(child.children.is_empty());

    let offsets: Vec<usize> = root.iter().map(|record| record.offset).collect();
    assert_eq!(offsets, vec![0x22, 0x71]);
}

fn verify_debug(image: &BinaryImage) {
    let irep = image.irep().unwrap();
    let debug = image.debug_for(irep).unwrap();

    assert_eq!(debug.irep, 0);
    assert_eq!(image.irep_for(debug), Some(irep));
    assert_eq!(debug.filenames, vec!["hello.rb", "greet.rb"]);

    let root = &debug.root;
    assert_eq!(root.offset, 0xC8);
    assert_eq!(root.files.len(), 1);
    assert_eq!(root.files[0].filename, "hello.rb");
    assert_eq!(root.files[0].lines, LineTable::Array(vec![1, 1, 2, 3]));

    assert_eq!(root.children.len(), 1);
    let child = &root.children[0];
    assert_eq!(child.offset, 0xE1);
    assert_eq!(child.files[0].filename_index, 1);
    assert_eq!(child.files[0].lines.encoding(), LineEncoding::Map);
    assert_eq!(
        child.files[0].lines,
        LineTable::Map(vec![
            LineMapEntry { offset: 0, line: 3 },
            LineMapEntry { offset: 1, line: 4 },
        ])
    );
    assert!(child.children.is_empty());

    assert_eq!(
        root.lookup(2),
        Some(LineInfo {
            filename: "hello.rb",
            line: 2
        })
    );
    assert_eq!(root.lookup(4), None);
    assert_eq!(child.lookup(5).map(|info| info.line), Some(4));
}

fn verify_walk(image: &BinaryImage) {
    let irep = image.irep().unwrap();

    let mut visited = Vec::new();
    image.walk(irep, |record, debug, depth| {
        let first = debug.and_then(|d| d.lookup(0)).map(|info| info.line);
        visited.push((record.offset, depth, first));
    });

    assert_eq!(visited, vec![(0x22, 0, Some(1)), (0x71, 1, Some(3))]);
}

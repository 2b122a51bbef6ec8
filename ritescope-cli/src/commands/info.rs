use std::path::Path;

use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{file_display_name, hex_offset, load_image},
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
pub struct ImageInfo {
    pub file: String,
    pub magic: String,
    pub version: String,
    pub checksum: String,
    pub size: u32,
    pub compiler: String,
    pub compiler_version: String,
    pub irep_records: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filenames: Vec<String>,
    pub sections: Vec<SectionInfo>,
}

#[derive(Debug, Serialize)]
pub struct SectionInfo {
    pub tag: String,
    pub kind: String,
    pub offset: String,
    pub size: u32,
}

pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let image = load_image(path, opts)?;
    let header = image.header();

    let sections = image
        .sections()
        .iter()
        .map(|section| SectionInfo {
            tag: section.tag_str(),
            kind: section.kind().to_string(),
            offset: hex_offset(section.offset()),
            size: section.size(),
        })
        .collect();

    let info = ImageInfo {
        file: file_display_name(path),
        magic: header.magic_str(),
        version: header.version_str(),
        checksum: format!("0x{:04X}", header.checksum),
        size: header.size,
        compiler: header.compiler_name_str(),
        compiler_version: header.compiler_version_str(),
        irep_records: image.irep().map_or(0, |irep| irep.root.count_records()),
        filenames: image
            .debug_sections()
            .flat_map(|debug| debug.filenames.iter().cloned())
            .collect(),
        sections,
    };

    print_output(&info, opts, |info| {
        println!("File:            {}", info.file);
        println!("Format:          {} {}", info.magic, info.version);
        println!(
            "Compiler:        {} {}",
            info.compiler, info.compiler_version
        );
        println!("Checksum:        {}", info.checksum);
        println!("Size:            {} bytes", info.size);
        println!("Irep records:    {}", info.irep_records);
        if !info.filenames.is_empty() {
            println!("Source files:    {}", info.filenames.join(", "));
        }

        println!();
        println!("Sections ({}):", info.sections.len());
        let mut table = TabWriter::new(vec![
            ("Tag", Align::Left),
            ("Kind", Align::Left),
            ("Offset", Align::Left),
            ("Size", Align::Right),
        ])
        .indent("  ");
        for section in &info.sections {
            table.row(vec![
                section.tag.clone(),
                section.kind.clone(),
                section.offset.clone(),
                section.size.to_string(),
            ]);
        }
        table.print();
    })
}

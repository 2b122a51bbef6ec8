use std::path::Path;

use anyhow::bail;
use ritescope::rite::LineTable;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{hex_offset, load_image},
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
pub struct RecordLines {
    pub index: usize,
    pub depth: usize,
    pub offset: String,
    pub files: Vec<FileLines>,
}

#[derive(Debug, Serialize)]
pub struct FileLines {
    pub filename: String,
    pub start_pos: u32,
    pub encoding: String,
    pub lines: Vec<LineEntry>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct LineEntry {
    pub pc: u64,
    pub line: u16,
}

/// Flatten a line table into (pc, line) pairs. Array positions count up from `start_pos` and are
/// widened so a table starting near `u32::MAX` cannot overflow.
fn line_entries(start_pos: u32, table: &LineTable) -> Vec<LineEntry> {
    match table {
        LineTable::Array(lines) => (u64::from(start_pos)..)
            .zip(lines)
            .map(|(pc, line)| LineEntry { pc, line: *line })
            .collect(),
        LineTable::Map(entries) => entries
            .iter()
            .map(|entry| LineEntry {
                pc: u64::from(entry.offset),
                line: entry.line,
            })
            .collect(),
    }
}

pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let image = load_image(path, opts)?;
    let Some(irep) = image.irep() else {
        bail!("{} contains no irep section", path.display());
    };
    if image.debug_for(irep).is_none() {
        bail!("{} carries no debug information", path.display());
    }

    let mut index = 0;
    let mut records = Vec::new();
    image.walk(irep, |_, debug, depth| {
        if let Some(debug) = debug {
            records.push(RecordLines {
                index,
                depth,
                offset: hex_offset(debug.offset),
                files: debug
                    .files
                    .iter()
                    .map(|file| FileLines {
                        filename: file.filename.clone(),
                        start_pos: file.start_pos,
                        encoding: file.lines.encoding().to_string(),
                        lines: line_entries(file.start_pos, &file.lines),
                    })
                    .collect(),
            });
        }
        index += 1;
    });

    print_output(&records, opts, |records| {
        for record in records {
            if record.files.is_empty() {
                continue;
            }

            println!("irep #{} ({})", record.index, record.offset);
            for file in &record.files {
                println!(
                    "  {} from pc {} ({}, {} entries)",
                    file.filename,
                    file.start_pos,
                    file.encoding,
                    file.lines.len()
                );
                let mut table = TabWriter::new(vec![("PC", Align::Right), ("Line", Align::Right)])
                    .indent("    ");
                for entry in &file.lines {
                    table.row(vec![entry.pc.to_string(), entry.line.to_string()]);
                }
                table.print();
            }
            println!();
        }
    })
}

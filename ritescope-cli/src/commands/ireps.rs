use std::path::Path;

use anyhow::bail;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{hex_offset, load_image},
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
pub struct IrepInfo {
    pub index: usize,
    pub depth: usize,
    pub offset: String,
    pub nlocals: u16,
    pub nregs: u16,
    pub opcode_count: usize,
    pub pool: Vec<String>,
    pub symbols: Vec<String>,
    pub children: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opcodes: Option<Vec<String>>,
}

pub fn run(path: &Path, show_opcodes: bool, opts: &GlobalOptions) -> anyhow::Result<()> {
    let image = load_image(path, opts)?;
    let Some(irep) = image.irep() else {
        bail!("{} contains no irep section", path.display());
    };

    let mut records = Vec::new();
    image.walk(irep, |record, _, depth| {
        let index = records.len();
        records.push(IrepInfo {
            index,
            depth,
            offset: hex_offset(record.offset),
            nlocals: record.nlocals,
            nregs: record.nregs,
            opcode_count: record.opcodes.len(),
            pool: record.pool.iter().map(ToString::to_string).collect(),
            symbols: record.symbols.clone(),
            children: record.children.len(),
            opcodes: show_opcodes.then(|| {
                record
                    .opcodes
                    .iter()
                    .map(|word| format!("{word:08X}"))
                    .collect()
            }),
        });
    });

    print_output(&records, opts, |records| {
        let mut table = TabWriter::new(vec![
            ("#", Align::Right),
            ("Irep", Align::Left),
            ("Offset", Align::Left),
            ("Locals", Align::Right),
            ("Regs", Align::Right),
            ("Opcodes", Align::Right),
            ("Pool", Align::Right),
            ("Symbols", Align::Right),
            ("Children", Align::Right),
        ]);
        for record in records {
            table.row(vec![
                record.index.to_string(),
                format!("{}irep", "  ".repeat(record.depth)),
                record.offset.clone(),
                record.nlocals.to_string(),
                record.nregs.to_string(),
                record.opcode_count.to_string(),
                record.pool.len().to_string(),
                record.symbols.len().to_string(),
                record.children.to_string(),
            ]);
        }
        table.print();

        for record in records {
            let has_detail = !record.pool.is_empty()
                || !record.symbols.is_empty()
                || record.opcodes.as_ref().is_some_and(|words| !words.is_empty());
            if !has_detail {
                continue;
            }

            println!();
            println!("irep #{} ({})", record.index, record.offset);
            for (index, literal) in record.pool.iter().enumerate() {
                println!("  pool[{index}]    {literal}");
            }
            for (index, symbol) in record.symbols.iter().enumerate() {
                println!("  sym[{index}]     {symbol}");
            }
            if let Some(words) = &record.opcodes {
                for chunk in words.chunks(8) {
                    println!("  code       {}", chunk.join(" "));
                }
            }
        }
    })
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ritescope - RITE bytecode image inspection
#[derive(Debug, Parser)]
#[command(name = "ritescope", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enforce declared record and section sizes and the "RITE" magic.
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Display the image header and the list of sections.
    Info {
        /// Path to the compiled .mrb image.
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Display the irep tree: locals, registers, pool, symbols, children.
    Ireps {
        /// Path to the compiled .mrb image.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Show the raw opcode words of every record.
        #[arg(long)]
        opcodes: bool,
    },

    /// Display file and line tables from the debug section.
    Lines {
        /// Path to the compiled .mrb image.
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

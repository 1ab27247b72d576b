//! Program output formats.

use std::fmt::Write as _;

use anyhow::{Result, bail};
use clap::ValueEnum;
use filter_gen::bytecode::FilterProgram;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Disassembly listing
    Asm,
    /// `sock_filter` initializers, one per line
    Hex,
    /// Little-endian `sock_filter` array
    Raw,
}

/// Pick the format for a run. Stdout defaults to a listing; program files
/// are always raw.
pub fn resolve(format: Option<Format>, to_files: bool) -> Result<Format> {
    match (format, to_files) {
        (None, false) => Ok(Format::Asm),
        (Some(format), false) => Ok(format),
        (None | Some(Format::Raw), true) => Ok(Format::Raw),
        (Some(format), true) => {
            bail!("--output writes raw programs, --format {format:?} is not supported")
        }
    }
}

/// Render `program` in `format`.
pub fn render(program: &FilterProgram, format: Format) -> Vec<u8> {
    match format {
        Format::Asm => program.to_string().into_bytes(),
        Format::Hex => hex_listing(program).into_bytes(),
        Format::Raw => program.to_bytes(),
    }
}

fn hex_listing(program: &FilterProgram) -> String {
    let mut out = String::new();
    for insn in program {
        let _ = writeln!(
            out,
            "{{ {:#06x}, {:3}, {:3}, {:#010x} }},",
            insn.code, insn.jt, insn.jf, insn.k
        );
    }
    out
}

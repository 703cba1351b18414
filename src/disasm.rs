use std::fmt;

use serde::Serialize;

use crate::decoder::{decode, Decoded};
use crate::diagnostic::Diagnostic;
use crate::listing::{parse_listing, ListingEntry};

/// Indent for lines that carry no label.
const LABEL_COLUMN: &str = "     ";

fn fmt_decoded(d: &Decoded) -> String {
    match d {
        Decoded::Register { opcode } => opcode.mnemonic.to_string(),
        Decoded::Memory { opcode, address, indirect: false } => format!("{} {:X}", opcode.mnemonic, address),
        Decoded::Memory { opcode, address, indirect: true } => format!("{} {:X} I", opcode.mnemonic, address),
        Decoded::Data { value } => format!("HEX {value:X}"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "line", rename_all = "snake_case")]
pub enum SourceLine {
    Org { address: u16 },
    Code { decoded: Decoded },
}

impl fmt::Display for SourceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLine::Org { address } => write!(f, "ORG {address:X}"),
            SourceLine::Code { decoded } => f.write_str(&fmt_decoded(decoded)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Disassembly {
    pub lines: Vec<SourceLine>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Disassembly {
    /// Source text with every line in the instruction column.
    pub fn render(&self) -> String {
        self.lines.iter().map(|l| format!("{LABEL_COLUMN}{l}\n")).collect()
    }
}

/// Turn already-parsed listing entries back into source lines, inserting an
/// `ORG` wherever an address does not follow its predecessor.
pub fn disassemble_entries(entries: &[ListingEntry]) -> Vec<SourceLine> {
    let mut lines = Vec::with_capacity(entries.len());
    let mut expected: Option<u16> = None;
    for e in entries {
        if expected != Some(e.address) {
            lines.push(SourceLine::Org { address: e.address });
        }
        lines.push(SourceLine::Code { decoded: decode(e.value) });
        expected = e.address.checked_add(1);
    }
    lines
}

pub fn disassemble(text: &str) -> Disassembly {
    let (entries, diagnostics) = parse_listing(text);
    tracing::debug!(entries = entries.len(), "disassembling");
    Disassembly { lines: disassemble_entries(&entries), diagnostics }
}

use std::fmt;

use serde::Serialize;

use crate::diagnostic::{Diagnostic, DiagnosticKind, Radix};

/// One assembled word at its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub address: u16,
    pub value: u16,
}

impl fmt::Display for ListingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03X}:   {:04X}", self.address, self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Listing {
    entries: Vec<ListingEntry>,
}

impl Listing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, address: u16, value: u16) {
        self.entries.push(ListingEntry { address, value });
    }

    pub fn iter(&self) -> impl Iterator<Item = &ListingEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> Vec<u16> {
        self.iter().map(|e| e.value).collect()
    }

    pub fn render(&self) -> String {
        self.iter().map(|e| format!("{e}\n")).collect()
    }
}

impl From<Vec<ListingEntry>> for Listing {
    fn from(entries: Vec<ListingEntry>) -> Self {
        Self { entries }
    }
}

fn parse_hex_field(token: &str) -> Result<u16, DiagnosticKind> {
    u16::from_str_radix(token, 16).map_err(|_| DiagnosticKind::InvalidNumber {
        token: token.to_string(),
        radix: Radix::Hex,
    })
}

/// Read `ADDR:VALUE` lines. Lines without a colon are not entries and are
/// skipped without comment; a colon line with bad hex yields a diagnostic.
pub fn parse_listing(text: &str) -> (Vec<ListingEntry>, Vec<Diagnostic>) {
    let mut entries = Vec::new();
    let mut diags = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let Some((addr, value)) = line.split_once(':') else { continue };
        let parsed = parse_hex_field(addr.trim())
            .and_then(|address| Ok(ListingEntry { address, value: parse_hex_field(value.trim())? }));
        match parsed {
            Ok(e) => entries.push(e),
            Err(kind) => diags.push(Diagnostic::new(idx + 1, kind)),
        }
    }
    (entries, diags)
}

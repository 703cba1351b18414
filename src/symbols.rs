use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub name: String,
    pub address: u16,
}

/// Label -> address map built in pass 1 and read in pass 2.
///
/// Every definition is kept in order for the report; the lookup index
/// holds the most recent address for each name.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SymbolTable {
    defs: Vec<Symbol>,
    #[serde(skip)]
    index: HashMap<String, u16>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: &str, address: u16) {
        if let Some(prev) = self.index.insert(name.to_string(), address) {
            tracing::debug!("label {name} redefined: {prev:X} -> {address:X}");
        } else {
            tracing::debug!("label {name} = {address:X}");
        }
        self.defs.push(Symbol { name: name.to_string(), address });
    }

    pub fn resolve(&self, name: &str) -> Option<u16> {
        self.index.get(name).copied()
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Definitions in source order, redefinitions included.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.defs.iter()
    }

    /// `LBL ADDR` per definition, address in unpadded uppercase hex.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for s in &self.defs {
            let _ = writeln!(out, "{} {:X}", s.name, s.address);
        }
        out
    }
}

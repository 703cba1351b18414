use serde::Serialize;

/// Low 12 bits of a memory-reference word: the operand address.
pub const OPERAND_MASK: u16 = 0x0FFF;
/// High nibble of a memory-reference word: the operation.
pub const OPCODE_MASK: u16 = 0xF000;
/// Bias added on top of opcode + operand to request indirect addressing.
pub const INDIRECT_BIT: u16 = 0x8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InstrClass {
    /// Opcode in bits 12..15, operand address in bits 0..11.
    MemoryRef,
    /// Full 16-bit constant with high nibble 0x7, no operand.
    RegisterRef,
    /// Full 16-bit constant with high nibble 0xF, no operand.
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpcodeEntry {
    pub mnemonic: &'static str,
    pub pattern: u16,
    pub class: InstrClass,
}

impl OpcodeEntry {
    pub fn takes_operand(&self) -> bool {
        self.class == InstrClass::MemoryRef
    }
}

const fn entry(mnemonic: &'static str, pattern: u16) -> OpcodeEntry {
    let class = if pattern & OPERAND_MASK == 0 {
        InstrClass::MemoryRef
    } else if pattern & OPCODE_MASK == OPCODE_MASK {
        InstrClass::Io
    } else {
        InstrClass::RegisterRef
    };
    OpcodeEntry { mnemonic, pattern, class }
}

pub const TABLE: &[OpcodeEntry] = &[
    // memory reference
    entry("AND", 0x0000),
    entry("ADD", 0x1000),
    entry("LDA", 0x2000),
    entry("STA", 0x3000),
    entry("BUN", 0x4000),
    entry("BSA", 0x5000),
    entry("ISZ", 0x6000),
    // register reference
    entry("CLA", 0x7800),
    entry("CLE", 0x7400),
    entry("CMA", 0x7200),
    entry("CME", 0x7100),
    entry("CIR", 0x7080),
    entry("CIL", 0x7040),
    entry("INC", 0x7020),
    entry("SPA", 0x7010),
    entry("SNA", 0x7008),
    entry("SZA", 0x7004),
    entry("SZE", 0x7002),
    entry("HLT", 0x7001),
    // input/output
    entry("INP", 0xF800),
    entry("OUT", 0xF400),
    entry("SKI", 0xF200),
    entry("SKO", 0xF100),
    entry("ION", 0xF080),
    entry("IOF", 0xF040),
];

/// Exact, case-sensitive mnemonic lookup.
pub fn lookup(mnemonic: &str) -> Option<&'static OpcodeEntry> {
    TABLE.iter().find(|e| e.mnemonic == mnemonic)
}

pub fn by_pattern(pattern: u16) -> Option<&'static OpcodeEntry> {
    TABLE.iter().find(|e| e.pattern == pattern)
}

/// Reverse lookup of an already-masked high nibble against memory-reference entries.
pub fn memory_ref(nibble: u16) -> Option<&'static OpcodeEntry> {
    TABLE
        .iter()
        .find(|e| e.class == InstrClass::MemoryRef && e.pattern == nibble)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_are_unique() {
        for (i, a) in TABLE.iter().enumerate() {
            for b in &TABLE[i + 1..] {
                assert_ne!(a.pattern, b.pattern, "{} vs {}", a.mnemonic, b.mnemonic);
            }
        }
        assert_eq!(TABLE.len(), 25);
    }

    #[test]
    fn classes_follow_bit_layout() {
        assert_eq!(lookup("LDA").unwrap().class, InstrClass::MemoryRef);
        assert_eq!(lookup("AND").unwrap().class, InstrClass::MemoryRef);
        assert_eq!(lookup("HLT").unwrap().class, InstrClass::RegisterRef);
        assert_eq!(lookup("IOF").unwrap().class, InstrClass::Io);
        assert!(lookup("ISZ").unwrap().takes_operand());
        assert!(!lookup("CLA").unwrap().takes_operand());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(lookup("lda").is_none());
        assert!(lookup("ORG").is_none());
        assert_eq!(lookup("STA").unwrap().pattern, 0x3000);
    }

    #[test]
    fn reverse_lookups() {
        assert_eq!(by_pattern(0x7001).unwrap().mnemonic, "HLT");
        assert_eq!(by_pattern(0xF080).unwrap().mnemonic, "ION");
        assert_eq!(memory_ref(0x5000).unwrap().mnemonic, "BSA");
        assert!(memory_ref(0x7000).is_none());
        assert!(memory_ref(0x7800).is_none());
    }
}

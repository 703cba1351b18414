use serde::Serialize;

use crate::instructions::{self, OpcodeEntry, INDIRECT_BIT, OPCODE_MASK, OPERAND_MASK};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum Decoded {
    /// Register-reference or I/O word, matched exactly.
    Register { opcode: &'static OpcodeEntry },
    Memory {
        opcode: &'static OpcodeEntry,
        address: u16,
        indirect: bool,
    },
    /// Nothing in the table matches; treat as raw data.
    Data { value: u16 },
}

impl Decoded {
    pub fn mnemonic(&self) -> Option<&'static str> {
        match self {
            Decoded::Register { opcode } | Decoded::Memory { opcode, .. } => Some(opcode.mnemonic),
            Decoded::Data { .. } => None,
        }
    }
}

/// Classify a 16-bit word. Exact register/IO matches win over the
/// memory-reference reading, which wins over the indirect reading.
pub fn decode(word: u16) -> Decoded {
    if word & OPERAND_MASK != 0 {
        if let Some(opcode) = instructions::by_pattern(word) {
            return Decoded::Register { opcode };
        }
    }
    let address = word & OPERAND_MASK;
    if let Some(opcode) = instructions::memory_ref(word & OPCODE_MASK) {
        return Decoded::Memory { opcode, address, indirect: false };
    }
    if let Some(opcode) = instructions::memory_ref(word.wrapping_sub(INDIRECT_BIT) & OPCODE_MASK) {
        return Decoded::Memory { opcode, address, indirect: true };
    }
    Decoded::Data { value: word }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_io_exact() {
        assert_eq!(decode(0x7001).mnemonic(), Some("HLT"));
        assert_eq!(decode(0xF800).mnemonic(), Some("INP"));
        assert!(matches!(decode(0x7800), Decoded::Register { .. }));
    }

    #[test]
    fn memory_direct_and_indirect() {
        match decode(0x20A5) {
            Decoded::Memory { opcode, address, indirect } => {
                assert_eq!(opcode.mnemonic, "LDA");
                assert_eq!(address, 0x0A5);
                assert!(!indirect);
            }
            other => panic!("unexpected {other:?}"),
        }
        match decode(0xB050) {
            Decoded::Memory { opcode, address, indirect } => {
                assert_eq!(opcode.mnemonic, "STA");
                assert_eq!(address, 0x050);
                assert!(indirect);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn zero_word_is_and_zero() {
        assert!(matches!(decode(0x0000), Decoded::Memory { address: 0, indirect: false, .. }));
        assert!(matches!(decode(0x8000), Decoded::Memory { address: 0, indirect: true, .. }));
    }

    #[test]
    fn undecodable_words_are_data() {
        for w in [0x7003u16, 0x7000, 0xF000, 0xF001, 0xFFFF, 0xE123 + 0x1000] {
            assert_eq!(decode(w), Decoded::Data { value: w }, "{w:#06x}");
        }
        // 0xE123 is ISZ 123 I
        assert!(matches!(decode(0xE123), Decoded::Memory { indirect: true, .. }));
    }
}

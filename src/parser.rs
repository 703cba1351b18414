use crate::instructions::{self, OpcodeEntry};

/// Length a label must have to enter the symbol table.
pub const LABEL_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Org(Option<String>),
    End,
    Dec(Option<String>),
    Hex(Option<String>),
}

/// One source line. Operands are kept as raw tokens; they are only
/// interpreted once the symbol table exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Blank,
    LabelOnly {
        label: String,
    },
    Directive {
        label: Option<String>,
        directive: Directive,
    },
    Instruction {
        label: Option<String>,
        opcode: &'static OpcodeEntry,
        operand: Option<String>,
        indirect: bool,
    },
    Unrecognized {
        label: Option<String>,
        mnemonic: String,
        operand: Option<String>,
    },
}

impl Line {
    pub fn label(&self) -> Option<&str> {
        match self {
            Line::Blank => None,
            Line::LabelOnly { label } => Some(label),
            Line::Directive { label, .. }
            | Line::Instruction { label, .. }
            | Line::Unrecognized { label, .. } => label.as_deref(),
        }
    }

    /// Raw operand token, before any symbol substitution.
    pub fn operand(&self) -> Option<&str> {
        match self {
            Line::Directive { directive: Directive::Org(op) | Directive::Dec(op) | Directive::Hex(op), .. }
            | Line::Instruction { operand: op, .. }
            | Line::Unrecognized { operand: op, .. } => op.as_deref(),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Line::Blank)
    }
}

/// Split a raw line into label / mnemonic / operand / indirect marker.
///
/// Layout is positional: `[LBL,] MNEMONIC [OPERAND [I]]`. Anything after the
/// label's comma in the same token is dropped, as are tokens past the `I` slot.
pub fn parse_line(raw: &str) -> Line {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let Some(&first) = tokens.first() else {
        return Line::Blank;
    };

    let (label, rest) = match first.split_once(',') {
        Some((name, _)) => (Some(name.chars().take(LABEL_LEN).collect::<String>()), &tokens[1..]),
        None => (None, &tokens[..]),
    };

    let Some((&mnemonic, args)) = rest.split_first() else {
        return match label {
            Some(label) => Line::LabelOnly { label },
            None => Line::Blank,
        };
    };
    let operand = args.first().map(|t| t.to_string());
    let indirect = args.get(1).is_some_and(|t| t.eq_ignore_ascii_case("I"));

    let directive = match mnemonic {
        "ORG" => Some(Directive::Org(operand.clone())),
        "END" => Some(Directive::End),
        "DEC" => Some(Directive::Dec(operand.clone())),
        "HEX" => Some(Directive::Hex(operand.clone())),
        _ => None,
    };
    if let Some(directive) = directive {
        return Line::Directive { label, directive };
    }

    match instructions::lookup(mnemonic) {
        Some(opcode) => Line::Instruction { label, opcode, operand, indirect },
        None => Line::Unrecognized { label, mnemonic: mnemonic.to_string(), operand },
    }
}

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Output was produced but may not be what the author meant.
    Warning,
    /// The line produced no output.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    #[error("unknown mnemonic `{mnemonic}`")]
    UnknownMnemonic { mnemonic: String },
    #[error("label `{label}` has no mnemonic")]
    MissingMnemonic { label: String },
    #[error("`{mnemonic}` needs an operand")]
    MissingOperand { mnemonic: String },
    #[error("`{token}` is not a valid {radix} number")]
    InvalidNumber { token: String, radix: Radix },
    #[error("symbol `{symbol}` stands for `{text}`, which is not a valid {radix} number")]
    SymbolNotNumeric { symbol: String, text: String, radix: Radix },
    #[error("ORG `{symbol}` moves to {address:X} only after labels were assigned")]
    OrgThroughSymbol { symbol: String, address: u16 },
    #[error("undefined symbol `{symbol}`")]
    UndefinedSymbol { symbol: String },
    #[error("label `{label}` must be exactly 3 characters")]
    InvalidLabel { label: String },
    #[error("operand {operand:#X} of `{mnemonic}` does not fit in 12 bits")]
    OperandOverflow { mnemonic: String, operand: u32 },
    #[error("`{mnemonic}` takes no operand, ignoring `{operand}`")]
    IgnoredOperand { mnemonic: String, operand: String },
    #[error("value {value} does not fit in a 16-bit word")]
    ValueOutOfRange { value: i64 },
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::OperandOverflow { .. }
            | DiagnosticKind::IgnoredOperand { .. }
            | DiagnosticKind::InvalidLabel { .. }
            | DiagnosticKind::MissingMnemonic { .. }
            | DiagnosticKind::OrgThroughSymbol { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Radix {
    Decimal,
    Hex,
}

impl Radix {
    pub fn base(self) -> u32 {
        match self {
            Radix::Decimal => 10,
            Radix::Hex => 16,
        }
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Radix::Decimal => f.write_str("decimal"),
            Radix::Hex => f.write_str("hexadecimal"),
        }
    }
}

/// A non-fatal problem tied to a 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(line: usize, kind: DiagnosticKind) -> Self {
        let severity = kind.severity();
        tracing::warn!(line, %severity, "{kind}");
        Self { line, severity, kind }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.severity, self.kind)
    }
}

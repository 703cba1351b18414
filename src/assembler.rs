use serde::{Deserialize, Serialize};

use crate::diagnostic::{Diagnostic, DiagnosticKind, Radix};
use crate::instructions::{OpcodeEntry, INDIRECT_BIT, OPERAND_MASK};
use crate::listing::Listing;
use crate::parser::{parse_line, Directive, Line, LABEL_LEN};
use crate::symbols::SymbolTable;

/// What a whitespace-only line does to the location counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlankLines {
    /// The blank line occupies an address, like any other non-ORG line.
    #[default]
    Advance,
    /// The blank line is ignored entirely.
    Skip,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AsmConfig {
    pub blank_lines: BlankLines,
}

/// Result of one assembly run.
#[derive(Debug, Clone, Serialize)]
pub struct Assembly {
    pub listing: Listing,
    pub symbols: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
}

impl Assembly {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Assembler {
    cfg: AsmConfig,
}

impl Assembler {
    pub fn new(cfg: AsmConfig) -> Self {
        Self { cfg }
    }

    /// Assemble `source` into a listing. Nothing is retained between calls.
    pub fn assemble(&self, source: &str) -> Assembly {
        let lines: Vec<Line> = source.lines().map(parse_line).collect();
        let mut run = Run::new(self.cfg);
        run.first_pass(&lines);
        tracing::debug!(symbols = run.symbols.len(), "pass 1 done");
        run.second_pass(&lines);
        tracing::debug!(words = run.listing.len(), "pass 2 done");
        run.finish()
    }
}

/// Assemble with the default configuration.
pub fn assemble(source: &str) -> Assembly {
    Assembler::default().assemble(source)
}

/// State owned by a single assembly; dropped when it ends.
struct Run {
    cfg: AsmConfig,
    symbols: SymbolTable,
    listing: Listing,
    diagnostics: Vec<Diagnostic>,
}

impl Run {
    fn new(cfg: AsmConfig) -> Self {
        Self {
            cfg,
            symbols: SymbolTable::new(),
            listing: Listing::new(),
            diagnostics: Vec::new(),
        }
    }

    fn report(&mut self, line: usize, kind: DiagnosticKind) {
        self.diagnostics.push(Diagnostic::new(line, kind));
    }

    fn advances(&self, line: &Line) -> bool {
        !(line.is_blank() && self.cfg.blank_lines == BlankLines::Skip)
    }

    /// Assign an address to every label. Runs over the whole file; END does
    /// not stop it. Symbols are not known yet, so only a literal ORG moves
    /// the counter here; anything else is left for pass 2 to report.
    fn first_pass(&mut self, lines: &[Line]) {
        let mut lc: u16 = 0;
        for (idx, line) in lines.iter().enumerate() {
            if let Line::Directive { directive: Directive::Org(operand), .. } = line {
                if let Some(addr) = operand.as_deref().and_then(org_literal) {
                    lc = addr;
                }
                continue;
            }
            if let Some(label) = line.label() {
                if label.chars().count() == LABEL_LEN {
                    self.symbols.define(label, lc);
                } else {
                    self.report(idx + 1, DiagnosticKind::InvalidLabel { label: label.to_string() });
                }
            }
            if self.advances(line) {
                lc = lc.wrapping_add(1);
            }
        }
    }

    fn second_pass(&mut self, lines: &[Line]) {
        let mut lc: u16 = 0;
        let mut warnings = Vec::new();
        for (idx, line) in lines.iter().enumerate() {
            let operand = line.operand().map(|token| Operand::substitute(&self.symbols, token));
            let encoded = match line {
                Line::Directive { directive: Directive::Org(_), .. } => {
                    match org_target(operand.as_ref()) {
                        Ok(addr) => {
                            if let Some(op) = operand.as_ref().filter(|op| op.is_symbol()) {
                                if org_literal(op.token) != Some(addr) {
                                    self.report(
                                        idx + 1,
                                        DiagnosticKind::OrgThroughSymbol { symbol: op.token.to_string(), address: addr },
                                    );
                                }
                            }
                            lc = addr;
                        }
                        Err(kind) => self.report(idx + 1, kind),
                    }
                    continue;
                }
                Line::Directive { directive: Directive::End, .. } => break,
                Line::Directive { directive: Directive::Dec(_), .. } => {
                    encode_data("DEC", operand.as_ref(), Radix::Decimal).map(Some)
                }
                Line::Directive { directive: Directive::Hex(_), .. } => {
                    encode_data("HEX", operand.as_ref(), Radix::Hex).map(Some)
                }
                Line::Instruction { opcode, indirect, .. } => {
                    encode_instruction(opcode, operand.as_ref(), *indirect, &mut warnings).map(Some)
                }
                Line::Unrecognized { mnemonic, .. } => {
                    Err(DiagnosticKind::UnknownMnemonic { mnemonic: mnemonic.clone() })
                }
                Line::LabelOnly { label } => Err(DiagnosticKind::MissingMnemonic { label: label.clone() }),
                Line::Blank => Ok(None),
            };

            for kind in warnings.drain(..) {
                self.report(idx + 1, kind);
            }
            match encoded {
                Ok(Some(value)) => self.listing.push(lc, value),
                Ok(None) => {}
                Err(kind) => self.report(idx + 1, kind),
            }
            if self.advances(line) {
                lc = lc.wrapping_add(1);
            }
        }
    }

    fn finish(mut self) -> Assembly {
        self.diagnostics.sort_by_key(|d| d.line);
        Assembly {
            listing: self.listing,
            symbols: self.symbols,
            diagnostics: self.diagnostics,
        }
    }
}

/// An operand token after symbol substitution. A token naming a symbol is
/// replaced by the symbol's address written as uppercase hex, and that text
/// is then parsed in whatever radix the mnemonic uses.
#[derive(Debug)]
struct Operand<'a> {
    token: &'a str,
    substituted: Option<String>,
}

impl<'a> Operand<'a> {
    fn substitute(symbols: &SymbolTable, token: &'a str) -> Self {
        Self { token, substituted: symbols.resolve(token).map(|addr| format!("{addr:X}")) }
    }

    fn is_symbol(&self) -> bool {
        self.substituted.is_some()
    }

    fn text(&self) -> &str {
        self.substituted.as_deref().unwrap_or(self.token)
    }

    fn invalid(&self, radix: Radix) -> DiagnosticKind {
        match &self.substituted {
            Some(text) => DiagnosticKind::SymbolNotNumeric {
                symbol: self.token.to_string(),
                text: text.clone(),
                radix,
            },
            None => unresolved(self.token, radix),
        }
    }
}

fn org_literal(token: &str) -> Option<u16> {
    u16::from_str_radix(token, 16).ok()
}

fn org_target(operand: Option<&Operand>) -> Result<u16, DiagnosticKind> {
    let op = operand.ok_or_else(|| DiagnosticKind::MissingOperand { mnemonic: "ORG".into() })?;
    u16::from_str_radix(op.text(), 16).map_err(|_| op.invalid(Radix::Hex))
}

fn unresolved(token: &str, radix: Radix) -> DiagnosticKind {
    if token.starts_with(|c: char| c.is_ascii_alphabetic()) {
        DiagnosticKind::UndefinedSymbol { symbol: token.to_string() }
    } else {
        DiagnosticKind::InvalidNumber { token: token.to_string(), radix }
    }
}

fn encode_instruction(
    opcode: &OpcodeEntry,
    operand: Option<&Operand>,
    indirect: bool,
    warnings: &mut Vec<DiagnosticKind>,
) -> Result<u16, DiagnosticKind> {
    if !opcode.takes_operand() {
        if let Some(op) = operand {
            warnings.push(DiagnosticKind::IgnoredOperand {
                mnemonic: opcode.mnemonic.to_string(),
                operand: op.token.to_string(),
            });
        }
        return Ok(opcode.pattern);
    }

    let op = operand.ok_or_else(|| DiagnosticKind::MissingOperand { mnemonic: opcode.mnemonic.to_string() })?;
    let addr = u32::from_str_radix(op.text(), 16).map_err(|_| op.invalid(Radix::Hex))?;
    if addr > u32::from(OPERAND_MASK) {
        warnings.push(DiagnosticKind::OperandOverflow { mnemonic: opcode.mnemonic.to_string(), operand: addr });
    }
    let bias = if indirect { u32::from(INDIRECT_BIT) } else { 0 };
    // keep the low 16 bits of the sum; overflow was reported above
    Ok((u32::from(opcode.pattern) + addr + bias) as u16)
}

fn encode_data(mnemonic: &str, operand: Option<&Operand>, radix: Radix) -> Result<u16, DiagnosticKind> {
    let op = operand.ok_or_else(|| DiagnosticKind::MissingOperand { mnemonic: mnemonic.to_string() })?;
    let value = i64::from_str_radix(op.text(), radix.base()).map_err(|_| op.invalid(radix))?;
    to_word(value)
}

/// Negative values become their 16-bit two's complement.
fn to_word(value: i64) -> Result<u16, DiagnosticKind> {
    match value {
        0..=0xFFFF => Ok(value as u16),
        -0x8000..=-1 => Ok(((1 << 16) + value) as u16),
        _ => Err(DiagnosticKind::ValueOutOfRange { value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twos_complement_words() {
        assert_eq!(to_word(-1), Ok(0xFFFF));
        assert_eq!(to_word(5), Ok(0x0005));
        assert_eq!(to_word(-32768), Ok(0x8000));
        assert_eq!(to_word(65535), Ok(0xFFFF));
        assert!(to_word(65536).is_err());
        assert!(to_word(-32769).is_err());
    }

    #[test]
    fn org_target_goes_through_symbols() {
        let mut symbols = SymbolTable::new();
        symbols.define("TOP", 0x2B0);
        let org = |token: &str| org_target(Some(&Operand::substitute(&symbols, token)));
        assert_eq!(org("1A0"), Ok(0x1A0));
        assert_eq!(org("TOP"), Ok(0x2B0));
        assert!(matches!(org_target(None), Err(DiagnosticKind::MissingOperand { .. })));
        assert!(matches!(org("XYZ"), Err(DiagnosticKind::UndefinedSymbol { .. })));
        assert!(matches!(org("1G"), Err(DiagnosticKind::InvalidNumber { .. })));
        assert_eq!(org_literal("TOP"), None);
    }

    #[test]
    fn symbol_address_is_reparsed_in_the_data_radix() {
        let mut symbols = SymbolTable::new();
        symbols.define("VAL", 0x100);
        symbols.define("ODD", 0x10A);
        let val = Operand::substitute(&symbols, "VAL");
        assert_eq!(val.text(), "100");
        assert_eq!(encode_data("DEC", Some(&val), Radix::Decimal), Ok(100));
        assert_eq!(encode_data("HEX", Some(&val), Radix::Hex), Ok(0x100));
        let odd = Operand::substitute(&symbols, "ODD");
        assert_eq!(
            encode_data("DEC", Some(&odd), Radix::Decimal),
            Err(DiagnosticKind::SymbolNotNumeric { symbol: "ODD".into(), text: "10A".into(), radix: Radix::Decimal })
        );
    }

    #[test]
    fn unresolved_tokens_are_classified() {
        assert!(matches!(unresolved("PTR", Radix::Hex), DiagnosticKind::UndefinedSymbol { .. }));
        assert!(matches!(unresolved("12G", Radix::Hex), DiagnosticKind::InvalidNumber { .. }));
    }

    #[test]
    fn register_instruction_ignores_operand_with_warning() {
        let mut warnings = Vec::new();
        let cla = crate::instructions::lookup("CLA").unwrap();
        let operand = Operand::substitute(&SymbolTable::new(), "123");
        let word = encode_instruction(cla, Some(&operand), false, &mut warnings);
        assert_eq!(word, Ok(0x7800));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn blank_line_policy() {
        let src = "ORG 10\nHLT\n\nHLT\n";
        let lenient = Assembler::default().assemble(src);
        let strict = Assembler::new(AsmConfig { blank_lines: BlankLines::Skip }).assemble(src);
        assert_eq!(lenient.listing.render(), "010:   7001\n012:   7001\n");
        assert_eq!(strict.listing.render(), "010:   7001\n011:   7001\n");
    }
}

pub mod assembler;
pub mod decoder;
pub mod diagnostic;
pub mod disasm;
pub mod instructions;
pub mod listing;
pub mod parser;
pub mod symbols;

pub use assembler::{assemble, AsmConfig, Assembler, Assembly, BlankLines};
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use disasm::{disassemble, Disassembly, SourceLine};
pub use listing::{Listing, ListingEntry};
pub use symbols::SymbolTable;

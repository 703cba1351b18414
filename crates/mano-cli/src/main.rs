use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use mano_asm::{disassemble, AsmConfig, Assembler, BlankLines, Diagnostic};
use mano_cli::files::{emit, load_text, output_path};

#[derive(Parser, Debug)]
#[command(author, version, about = "Mano basic computer assembler / disassembler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble source text into an `ADDR:   WORD` listing
    Assemble {
        /// Input assembly file
        #[arg(value_name = "SRCFILE")]
        input: PathBuf,
        /// Whether blank lines take up an address
        #[arg(long, value_enum)]
        blank_lines: Option<BlankLinesArg>,
        /// Assembler config (JSON); flags given on the command line win
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write the listing to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Write the symbol report to file
        #[arg(long, value_name = "FILE")]
        symbols_out: Option<PathBuf>,
        /// Write <stem>.mc and <stem>.sym in the working directory
        #[arg(long)]
        save: bool,
        /// Fail when any diagnostic was reported
        #[arg(long)]
        deny_warnings: bool,
    },
    /// Turn an `ADDR:WORD` listing back into source text
    Disassemble {
        /// Input listing file
        #[arg(value_name = "LISTFILE")]
        input: PathBuf,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write the source to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Write <stem>.asm in the working directory
        #[arg(long)]
        save: bool,
        /// Fail when any diagnostic was reported
        #[arg(long)]
        deny_warnings: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BlankLinesArg { Advance, Skip }

impl From<BlankLinesArg> for BlankLines {
    fn from(a: BlankLinesArg) -> Self {
        match a {
            BlankLinesArg::Advance => BlankLines::Advance,
            BlankLinesArg::Skip => BlankLines::Skip,
        }
    }
}

fn load_config(path: Option<&Path>, blank_lines: Option<BlankLinesArg>) -> Result<AsmConfig> {
    let mut cfg = match path {
        Some(p) => {
            let txt = std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            serde_json::from_str::<AsmConfig>(&txt).with_context(|| format!("parsing {}", p.display()))?
        }
        None => AsmConfig::default(),
    };
    if let Some(b) = blank_lines {
        cfg.blank_lines = b.into();
    }
    Ok(cfg)
}

fn report(diags: &[Diagnostic], deny: bool) -> Result<()> {
    for d in diags {
        eprintln!("{d}");
    }
    anyhow::ensure!(!deny || diags.is_empty(), "{} diagnostic(s) reported", diags.len());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Assemble { input, blank_lines, config, format, out, symbols_out, save, deny_warnings } => {
            let src = load_text(&input)?;
            let cfg = load_config(config.as_deref(), blank_lines)?;
            tracing::info!(file = %input.display(), ?cfg, "assembling");
            let asm = Assembler::new(cfg).assemble(&src.text);

            let (listing_out, symbols_out) = if save {
                (Some(output_path(&src.stem, "mc")), Some(output_path(&src.stem, "sym")))
            } else {
                (out, symbols_out)
            };
            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&asm)?;
                    emit(&format!("{json}\n"), listing_out.as_deref())?;
                }
                OutputFormat::Text => {
                    emit(&asm.listing.render(), listing_out.as_deref())?;
                    if let Some(path) = symbols_out {
                        emit(&asm.symbols.render(), Some(path.as_path()))?;
                    }
                }
            }
            report(&asm.diagnostics, deny_warnings)?;
        }
        Command::Disassemble { input, format, out, save, deny_warnings } => {
            let src = load_text(&input)?;
            tracing::info!(file = %input.display(), "disassembling");
            let dis = disassemble(&src.text);
            let out = if save { Some(output_path(&src.stem, "asm")) } else { out };
            match format {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&dis)?;
                    emit(&format!("{json}\n"), out.as_deref())?;
                }
                OutputFormat::Text => emit(&dis.render(), out.as_deref())?,
            }
            report(&dis.diagnostics, deny_warnings)?;
        }
    }

    Ok(())
}

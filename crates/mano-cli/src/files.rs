use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Stem used when the input has no usable file name.
pub const FALLBACK_STEM: &str = "untitled";

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub stem: String,
    pub text: String,
}

/// Everything before the first dot of the file name: `prog.v2.asm` -> `prog`.
pub fn stem_of(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_STEM)
        .to_string()
}

pub fn load_text(path: &Path) -> Result<SourceFile> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(SourceFile { stem: stem_of(path), text })
}

pub fn output_path(stem: &str, ext: &str) -> PathBuf {
    PathBuf::from(format!("{stem}.{ext}"))
}

/// Write to `path`, or to stdout when there is none.
pub fn emit(text: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => std::fs::write(p, text).with_context(|| format!("writing {}", p.display())),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

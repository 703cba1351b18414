pub mod files;

pub use files::{emit, load_text, output_path, stem_of, SourceFile};

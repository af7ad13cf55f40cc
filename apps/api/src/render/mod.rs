// Letter output: where a letter is written and the sink that writes it.
// Sinks do blocking I/O; async callers run `write_letter` inside spawn_blocking.

pub mod pdf;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::layout::PageConfig;
use crate::letter::LetterDocument;

pub use pdf::PdfSink;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(String),

    /// The line holds a character the output font has no code for.
    #[error("cannot draw {ch:?} in line {line:?}")]
    Unencodable { line: String, ch: char },
}

/// Persists a laid-out letter to `path`.
pub trait DocumentSink: Send + Sync {
    fn render(&self, letter: &LetterDocument, page: &PageConfig, path: &Path) -> Result<(), RenderError>;
}

/// First free `<position>.pdf`, `<position> (1).pdf`, `<position> (2).pdf`, …
/// under `dir`, creating `dir` if needed.
///
/// The scan and the later write are not atomic; two writers racing on the same
/// position can pick the same name.
pub fn unique_output_path(dir: &Path, position: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let mut candidate = dir.join(format!("{position}.pdf"));
    let mut counter = 1u32;
    while candidate.exists() {
        candidate = dir.join(format!("{position} ({counter}).pdf"));
        counter += 1;
    }
    Ok(candidate)
}

/// Resolves a free output path for `letter` and renders it there.
pub fn write_letter(
    sink: &dyn DocumentSink,
    letter: &LetterDocument,
    page: &PageConfig,
    dir: &Path,
) -> Result<PathBuf, RenderError> {
    let path = unique_output_path(dir, &letter.position)?;
    sink.render(letter, page, &path)?;
    Ok(path)
}

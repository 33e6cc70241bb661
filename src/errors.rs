use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures of the page source: loading the PDF or rendering a page range.
#[derive(Debug, Error)]
pub enum PdfExtractorError {
  #[error("failed to load PDF: {0}")]
  Load(#[source] lopdf::Error),
  #[error("page {page} is out of range for a document with {page_count} pages")]
  PageOutOfRange { page: usize, page_count: usize },
  #[error("empty page range {start}..{end}")]
  EmptyRange { start: usize, end: usize },
  #[error("failed to serialize PDF: {0}")]
  Serialize(#[source] io::Error),
  #[error("IO error: {0}")]
  Io(#[from] io::Error),
}

/// Run-level errors. `Extraction`, `InvalidTarget` and `EmptyDocument` are
/// fatal; `Write` and `Compression` are recorded per chunk and the run goes on.
#[derive(Debug, Error)]
pub enum ChunkerError {
  #[error("failed to extract page {page}: {source}")]
  Extraction {
    page: usize,
    #[source]
    source: PdfExtractorError,
  },
  #[error("invalid target chunk size: {0}")]
  InvalidTarget(String),
  #[error("the document has no pages")]
  EmptyDocument,
  #[error("failed to write chunk {chunk} to {}: {source}", path.display())]
  Write {
    chunk: usize,
    path: PathBuf,
    #[source]
    source: PdfExtractorError,
  },
  #[error("failed to compress chunk {chunk} ({}): {source}", path.display())]
  Compression {
    chunk: usize,
    path: PathBuf,
    #[source]
    source: zip::result::ZipError,
  },
  #[error("failed to open {}: {source}", path.display())]
  Load {
    path: PathBuf,
    #[source]
    source: PdfExtractorError,
  },
  #[error("config error: {0}")]
  Config(#[from] config::ConfigError),
  #[error("IO error: {0}")]
  Io(#[from] io::Error),
}

impl ChunkerError {
  /// Whether the error ends the whole run rather than a single chunk.
  pub fn is_fatal(&self) -> bool {
    !matches!(self, ChunkerError::Write { .. } | ChunkerError::Compression { .. })
  }
}

pub type Result<T, E = ChunkerError> = std::result::Result<T, E>;

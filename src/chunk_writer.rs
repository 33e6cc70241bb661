use std::path::{Path, PathBuf};

use tracing::info;

use crate::consts::{CHUNK_DIR_SUFFIX, NUMBER_WIDTH};
use crate::errors::{ChunkerError, PdfExtractorError, Result};
use crate::output_store::OutputStore;
use crate::pdf_extractor::PageSource;
use crate::types::{Chunk, ChunkFile};

/// Where the chunks of one source file go and what they are called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkNaming {
  pub output_dir: PathBuf,
  pub base_name: String,
}

impl ChunkNaming {
  /// `<dir of source>/<stem>_chunks/`, or `output_dir` when given.
  pub fn for_source(source: &Path, output_dir: Option<&Path>) -> Self {
    let base_name = source
      .file_stem()
      .map(|s| s.to_string_lossy().to_string())
      .unwrap_or_else(|| "document".to_string());
    let output_dir = match output_dir {
      Some(dir) => dir.to_path_buf(),
      None => source
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(format!("{}{}", base_name, CHUNK_DIR_SUFFIX)),
    };
    ChunkNaming { output_dir, base_name }
  }

  /// `<base>_chunk<NNN>_pages<SSS>-<EEE>` with 1-based inclusive page bounds.
  pub fn file_stem(&self, number: usize, chunk: &Chunk) -> String {
    format!(
      "{}_chunk{:0w$}_pages{:0w$}-{:0w$}",
      self.base_name,
      number,
      chunk.first_page_number(),
      chunk.last_page_number(),
      w = NUMBER_WIDTH
    )
  }

  pub fn pdf_path(&self, number: usize, chunk: &Chunk) -> PathBuf {
    self.output_dir.join(format!("{}.pdf", self.file_stem(number, chunk)))
  }
}

/// Render the pages of `chunk` into a standalone PDF and store it.
///
/// A failure only concerns this chunk; files written for earlier chunks are
/// left where they are.
pub fn write_chunk<S, O>(
  source: &S,
  store: &mut O,
  naming: &ChunkNaming,
  number: usize,
  chunk: &Chunk,
) -> Result<ChunkFile>
where
  S: PageSource + ?Sized,
  O: OutputStore + ?Sized,
{
  let path = naming.pdf_path(number, chunk);
  let write_error = |source: PdfExtractorError| ChunkerError::Write {
    chunk: number,
    path: path.clone(),
    source,
  };

  let bytes = source.extract_pages(chunk.pages()).map_err(write_error)?;
  store.write(&path, &bytes).map_err(|e| write_error(e.into()))?;

  info!(chunk = number, pages = chunk.len(), bytes = bytes.len(), path = %path.display(), "wrote chunk");
  Ok(ChunkFile { number, chunk: *chunk, path, bytes: bytes.len() as u64 })
}

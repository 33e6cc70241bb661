use std::io::{Cursor, Write};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use zip::{result::ZipError, write::FileOptions, CompressionMethod, ZipWriter};

use crate::errors::{ChunkerError, Result};
use crate::output_store::OutputStore;
use crate::types::{ArchiveResult, ChunkFile};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArchiveOptions {
  /// Leave the uncompressed chunk PDF next to its archive instead of deleting it.
  pub keep_intermediate: bool,
  /// Deflate level 0 to 9, `None` for the library default.
  pub compression_level: Option<i32>,
}

/// Zip a written chunk into a single-entry archive at the sibling `.zip` path.
///
/// The intermediate PDF is removed afterwards unless
/// `options.keep_intermediate` is set. Failing to remove it is only logged.
pub fn archive_chunk<O>(store: &mut O, file: &ChunkFile, options: &ArchiveOptions) -> Result<ArchiveResult>
where
  O: OutputStore + ?Sized,
{
  let archive_path = file.path.with_extension("zip");
  let compression_error = |source: ZipError| ChunkerError::Compression {
    chunk: file.number,
    path: archive_path.clone(),
    source,
  };

  let original = store.read(&file.path).map_err(|e| compression_error(e.into()))?;
  let entry_name = file
    .path
    .file_name()
    .map(|n| n.to_string_lossy().to_string())
    .unwrap_or_else(|| format!("chunk{:03}.pdf", file.number));
  let compressed =
    zip_single_entry(&entry_name, &original, options.compression_level).map_err(compression_error)?;
  store.write(&archive_path, &compressed).map_err(|e| compression_error(e.into()))?;

  let mut intermediate_retained = true;
  if !options.keep_intermediate {
    match store.remove(&file.path) {
      Ok(()) => intermediate_retained = false,
      Err(e) => warn!(chunk = file.number, path = %file.path.display(), "failed to remove chunk PDF: {}", e),
    }
  }

  let result = ArchiveResult {
    number: file.number,
    chunk: file.chunk,
    archive_path,
    original_bytes: original.len() as u64,
    compressed_bytes: compressed.len() as u64,
    intermediate_retained,
  };
  info!(
    chunk = result.number,
    original = result.original_bytes,
    compressed = result.compressed_bytes,
    ratio = result.ratio(),
    "archived chunk"
  );
  Ok(result)
}

fn zip_single_entry(name: &str, contents: &[u8], level: Option<i32>) -> std::result::Result<Vec<u8>, ZipError> {
  let options = FileOptions::default()
    .compression_method(CompressionMethod::Deflated)
    .compression_level(level)
    .large_file(contents.len() as u64 >= u32::MAX as u64);
  let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
  zip.start_file(name, options)?;
  zip.write_all(contents)?;
  Ok(zip.finish()?.into_inner())
}

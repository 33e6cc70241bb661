use std::path::PathBuf;

use tracing::{info, instrument, warn};

use crate::archiver::{archive_chunk, ArchiveOptions};
use crate::chunk_writer::{write_chunk, ChunkNaming};
use crate::chunkifier::Chunkifier;
use crate::errors::{ChunkerError, Result};
use crate::estimator::estimate_page_sizes;
use crate::output_store::OutputStore;
use crate::pdf_extractor::PageSource;
use crate::types::{ArchiveResult, Chunk, ChunkFailure, ChunkFile, PageSizeEstimate, RunSummary, Strategy};

/// Everything a run needs besides the page source and the output store.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitJob {
  /// Path of the source PDF, used for naming the output.
  pub source: PathBuf,
  /// Size of the source file in bytes.
  pub file_size: u64,
  pub target_bytes: u64,
  pub strategy: Strategy,
  /// Overrides the default `<stem>_chunks` directory next to the source.
  pub output_dir: Option<PathBuf>,
  pub archive: ArchiveOptions,
}

/// Progress notifications, emitted in order as the run advances.
#[derive(Debug)]
pub enum RunEvent<'a> {
  Estimated(&'a PageSizeEstimate),
  Planned { chunks: &'a [Chunk], output_dir: &'a PathBuf },
  ChunkWritten(&'a ChunkFile),
  ChunkArchived(&'a ArchiveResult),
  ChunkFailed { number: usize, chunk: &'a Chunk, error: &'a ChunkerError },
}

pub trait Reporter {
  fn report(&mut self, event: &RunEvent);
}

/// Discards all events.
impl Reporter for () {
  fn report(&mut self, _event: &RunEvent) {}
}

/// Split `source` into chunks and archive each one into `store`.
///
/// The target and the page count are validated before any page is
/// extracted. Estimation and planning failures abort the run with nothing
/// written. After that each chunk is written and archived in turn; a chunk
/// that fails is recorded in the summary and the run moves on.
#[instrument(skip_all, fields(source = %job.source.display(), target = job.target_bytes, strategy = %job.strategy))]
pub fn run<S, O, R>(source: &S, store: &mut O, reporter: &mut R, job: &SplitJob) -> Result<RunSummary>
where
  S: PageSource + ?Sized,
  O: OutputStore + ?Sized,
  R: Reporter + ?Sized,
{
  if job.target_bytes == 0 {
    return Err(ChunkerError::InvalidTarget("0 bytes".to_string()));
  }
  let page_count = source.page_count();
  if page_count == 0 {
    return Err(ChunkerError::EmptyDocument);
  }

  let chunks = match job.strategy {
    Strategy::Greedy => {
      let estimate = estimate_page_sizes(source)?;
      info!(pages = page_count, estimated_total = estimate.total(), "estimated page sizes");
      reporter.report(&RunEvent::Estimated(&estimate));
      Chunkifier::chunkify_pages(&estimate, job.target_bytes)?
    },
    Strategy::Proportional => {
      Chunkifier::chunkify_proportional(page_count, job.file_size, job.target_bytes)?
    },
  };

  let naming = ChunkNaming::for_source(&job.source, job.output_dir.as_deref());
  store.create_dir_all(&naming.output_dir)?;
  info!(chunks = chunks.len(), output_dir = %naming.output_dir.display(), "planned chunks");
  reporter.report(&RunEvent::Planned { chunks: &chunks, output_dir: &naming.output_dir });

  let mut archives = Vec::with_capacity(chunks.len());
  let mut failures = Vec::new();
  for (index, chunk) in chunks.iter().enumerate() {
    let number = index + 1;
    let outcome = write_chunk(source, store, &naming, number, chunk).and_then(|file| {
      reporter.report(&RunEvent::ChunkWritten(&file));
      archive_chunk(store, &file, &job.archive)
    });
    match outcome {
      Ok(result) => {
        reporter.report(&RunEvent::ChunkArchived(&result));
        archives.push(result);
      },
      Err(error) => {
        warn!(chunk = number, pages = %chunk, "chunk failed: {}", error);
        reporter.report(&RunEvent::ChunkFailed { number, chunk, error: &error });
        failures.push(ChunkFailure { number, chunk: *chunk, message: error.to_string() });
      },
    }
  }

  Ok(RunSummary {
    source: job.source.clone(),
    output_dir: naming.output_dir,
    strategy: job.strategy,
    target_bytes: job.target_bytes,
    page_count,
    chunks,
    archives,
    failures,
  })
}

/// Open the output folder, but only when something was produced.
pub fn reveal_output<O: OutputStore + ?Sized>(store: &mut O, summary: &RunSummary) -> bool {
  if !summary.produced_any() {
    return false;
  }
  match store.reveal(&summary.output_dir) {
    Ok(()) => true,
    Err(e) => {
      warn!(dir = %summary.output_dir.display(), "could not open output folder: {}", e);
      false
    },
  }
}

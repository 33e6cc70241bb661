use tracing::debug;

use crate::consts::BYTES_PER_MB;
use crate::errors::{ChunkerError, Result};
use crate::types::{Chunk, PageSizeEstimate};

pub struct Chunkifier;

impl Chunkifier {
  /// Convert a target in megabytes to bytes, rejecting anything that is not a
  /// positive finite size of at least one byte.
  pub fn target_bytes(target_mb: f64) -> Result<u64> {
    if !target_mb.is_finite() || target_mb <= 0.0 {
      return Err(ChunkerError::InvalidTarget(format!("{target_mb} MB")));
    }
    let bytes = (target_mb * BYTES_PER_MB as f64) as u64;
    if bytes == 0 {
      return Err(ChunkerError::InvalidTarget(format!("{target_mb} MB is less than one byte")));
    }
    Ok(bytes)
  }

  /// Greedy forward accumulation over per-page estimates.
  ///
  /// A page joins the current chunk if the chunk is still empty or the
  /// running sum including it stays `<= target`; otherwise the chunk is
  /// closed and the page opens the next one. A page larger than the target
  /// therefore ends up alone in its own chunk.
  pub fn chunkify_pages(estimate: &PageSizeEstimate, target: u64) -> Result<Vec<Chunk>> {
    if target == 0 {
      return Err(ChunkerError::InvalidTarget("0 bytes".to_string()));
    }
    if estimate.is_empty() {
      return Err(ChunkerError::EmptyDocument);
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut running_sum = 0u64;

    for (page, size) in estimate.as_slice().iter().enumerate() {
      let would_be = running_sum.saturating_add(*size);
      if page == start || would_be <= target {
        running_sum = would_be;
      } else {
        chunks.push(Chunk::new(start, page, running_sum));
        start = page;
        running_sum = *size;
      }
    }
    chunks.push(Chunk::new(start, estimate.len(), running_sum));

    debug!(chunks = chunks.len(), target, "planned greedy chunks");
    Ok(chunks)
  }

  /// Spread pages evenly over `round(file_size / target)` chunks, at least
  /// one and at most one per page.
  ///
  /// No page is extracted: this strategy never estimates, and each chunk's
  /// size is the file size split by page count. Rounding is half-to-even
  /// throughout. Ranges that round to nothing are dropped so the chunks still
  /// cover every page exactly once.
  pub fn chunkify_proportional(page_count: usize, file_size: u64, target: u64) -> Result<Vec<Chunk>> {
    if target == 0 {
      return Err(ChunkerError::InvalidTarget("0 bytes".to_string()));
    }
    if page_count == 0 {
      return Err(ChunkerError::EmptyDocument);
    }

    let chunk_count = ((file_size as f64 / target as f64).round_ties_even() as usize).clamp(1, page_count);
    let pages_per_chunk = page_count as f64 / chunk_count as f64;
    let bytes_per_page = file_size / page_count as u64;

    let mut chunks = Vec::with_capacity(chunk_count);
    for i in 0..chunk_count {
      let start = ((i as f64 * pages_per_chunk).round_ties_even() as usize).min(page_count);
      let end = (((i + 1) as f64 * pages_per_chunk).round_ties_even() as usize).min(page_count);
      if start >= end {
        continue;
      }
      chunks.push(Chunk::new(start, end, bytes_per_page * (end - start) as u64));
    }

    // the last chunk always ends on the final page
    if let Some(last) = chunks.last_mut() {
      last.end = page_count;
    }

    debug!(chunks = chunks.len(), target, file_size, "planned proportional chunks");
    Ok(chunks)
  }
}

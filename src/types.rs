use std::{fmt, ops::Range, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Per-page serialized size estimates, indexed by zero-based page position.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct PageSizeEstimate(Vec<u64>);

impl PageSizeEstimate {
  pub fn new(sizes: Vec<u64>) -> Self {
    PageSizeEstimate(sizes)
  }

  pub fn as_slice(&self) -> &[u64] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn get(&self, page: usize) -> Option<u64> {
    self.0.get(page).copied()
  }

  /// Sum of the estimates over a page range. A range reaching past the end sums to zero.
  pub fn sum(&self, pages: Range<usize>) -> u64 {
    self.0.get(pages).map(|s| s.iter().fold(0u64, |acc, b| acc.saturating_add(*b))).unwrap_or(0)
  }

  pub fn total(&self) -> u64 {
    self.sum(0..self.0.len())
  }
}

impl From<Vec<u64>> for PageSizeEstimate {
  fn from(sizes: Vec<u64>) -> Self {
    PageSizeEstimate(sizes)
  }
}

/// A contiguous half-open run of pages `[start, end)`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
  pub start: usize,
  pub end: usize,
  pub estimated_bytes: u64,
}

impl Chunk {
  pub fn new(start: usize, end: usize, estimated_bytes: u64) -> Self {
    Chunk { start, end, estimated_bytes }
  }

  pub fn pages(&self) -> Range<usize> {
    self.start..self.end
  }

  pub fn len(&self) -> usize {
    self.end - self.start
  }

  pub fn is_empty(&self) -> bool {
    self.end <= self.start
  }

  /// 1-based number of the first page.
  pub fn first_page_number(&self) -> usize {
    self.start + 1
  }

  /// 1-based number of the last page (inclusive).
  pub fn last_page_number(&self) -> usize {
    self.end
  }
}

impl fmt::Display for Chunk {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "pages {}-{}", self.first_page_number(), self.last_page_number())
  }
}

/// How pages are grouped into chunks.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
  /// Accumulate isolated per-page sizes until the target would be exceeded.
  #[default]
  Greedy,
  /// Divide pages evenly into `round(file size / target)` chunks.
  Proportional,
}

impl fmt::Display for Strategy {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Strategy::Greedy => write!(f, "greedy"),
      Strategy::Proportional => write!(f, "proportional"),
    }
  }
}

/// A chunk PDF that has been written to the output store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFile {
  /// 1-based chunk sequence number.
  pub number: usize,
  pub chunk: Chunk,
  pub path: PathBuf,
  pub bytes: u64,
}

/// The terminal artifact for one chunk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ArchiveResult {
  pub number: usize,
  pub chunk: Chunk,
  pub archive_path: PathBuf,
  pub original_bytes: u64,
  pub compressed_bytes: u64,
  /// Whether the uncompressed chunk PDF was left next to the archive.
  pub intermediate_retained: bool,
}

impl ArchiveResult {
  /// compressed / original. An empty original reports 1.0.
  pub fn ratio(&self) -> f64 {
    if self.original_bytes == 0 {
      return 1.0;
    }
    self.compressed_bytes as f64 / self.original_bytes as f64
  }

  pub fn reduction_percent(&self) -> f64 {
    (1.0 - self.ratio()) * 100.0
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChunkFailure {
  pub number: usize,
  pub chunk: Chunk,
  pub message: String,
}

/// Outcome of a full run. Per-chunk failures do not stop the run and are
/// collected here next to the successful archives.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunSummary {
  pub source: PathBuf,
  pub output_dir: PathBuf,
  pub strategy: Strategy,
  pub target_bytes: u64,
  pub page_count: usize,
  pub chunks: Vec<Chunk>,
  pub archives: Vec<ArchiveResult>,
  pub failures: Vec<ChunkFailure>,
}

impl RunSummary {
  pub fn total_original_bytes(&self) -> u64 {
    self.archives.iter().map(|a| a.original_bytes).sum()
  }

  pub fn total_compressed_bytes(&self) -> u64 {
    self.archives.iter().map(|a| a.compressed_bytes).sum()
  }

  pub fn overall_reduction_percent(&self) -> f64 {
    let original = self.total_original_bytes();
    if original == 0 {
      return 0.0;
    }
    (1.0 - self.total_compressed_bytes() as f64 / original as f64) * 100.0
  }

  pub fn produced_any(&self) -> bool {
    !self.archives.is_empty()
  }
}

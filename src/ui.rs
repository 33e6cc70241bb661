use owo_colors::OwoColorize;

use crate::runner::{Reporter, RunEvent};
use crate::types::{RunSummary, Strategy};

const RULE_WIDTH: usize = 60;

/// Human readable size: bytes below 1 KB, one decimal KB below 1 MB, two
/// decimal MB above.
pub fn format_size(size_bytes: u64) -> String {
  if size_bytes < 1024 {
    format!("{} B", size_bytes)
  } else if size_bytes < 1024 * 1024 {
    format!("{:.1} KB", size_bytes as f64 / 1024.0)
  } else {
    format!("{:.2} MB", size_bytes as f64 / (1024.0 * 1024.0))
  }
}

fn rule() -> String {
  "=".repeat(RULE_WIDTH)
}

pub fn display_banner() {
  println!("{}", rule());
  println!("{}", format!("PDF Chunker v{} - Split by Size", env!("CARGO_PKG_VERSION")).green().bold());
  println!("{}", rule());
  println!();
}

pub fn display_source(path: &std::path::Path, file_size: u64, page_count: usize) {
  println!("Selected: {}", path.display());
  println!("File size: {}", format_size(file_size));
  println!("Total pages: {}", page_count);
  println!();
}

pub fn display_info_message(info: &str) {
  println!("{}", info.blue());
}

pub fn display_warning_message(warning: &str) {
  println!("{}", warning.yellow());
}

/// Warning for a target at least as large as the source file. Only the
/// proportional strategy is then guaranteed a single chunk; greedy estimates
/// over-count shared resources and may still split.
pub fn target_warning(strategy: Strategy, target_bytes: u64, file_size: u64) -> Option<&'static str> {
  if target_bytes < file_size {
    return None;
  }
  match strategy {
    Strategy::Proportional => Some("The target is not smaller than the file, expect a single chunk."),
    Strategy::Greedy => None,
  }
}

pub fn display_summary(summary: &RunSummary) {
  println!();
  println!("{}", rule());
  if summary.failures.is_empty() {
    println!("{}", "COMPLETE!".green().bold());
  } else {
    println!(
      "{}",
      format!("FINISHED WITH {} FAILED CHUNK(S)", summary.failures.len()).yellow().bold()
    );
  }
  println!("{}", rule());
  println!("Created {} ZIP file(s)", summary.archives.len());
  println!(
    "Total size: {} ({:.1}% compression)",
    format_size(summary.total_compressed_bytes()),
    summary.overall_reduction_percent()
  );
  for failure in &summary.failures {
    println!("  {} chunk {}: {}", "failed".red(), failure.number, failure.message);
  }
  println!("Location: {}", summary.output_dir.display());
  println!();
}

/// Prints progress lines as the run advances.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
  fn report(&mut self, event: &RunEvent) {
    match event {
      RunEvent::Estimated(estimate) => {
        println!(
          "Estimated {} page(s), {} in isolation",
          estimate.len(),
          format_size(estimate.total())
        );
      },
      RunEvent::Planned { chunks, output_dir } => {
        let total: u64 = chunks.iter().map(|c| c.estimated_bytes).sum();
        let per_chunk = if chunks.is_empty() { 0 } else { total / chunks.len() as u64 };
        println!("Planned {} chunk(s) (~{} each)", chunks.len(), format_size(per_chunk));
        println!("Output directory: {}", output_dir.display());
        println!();
        println!("{}", "Creating chunks...".cyan().bold());
      },
      RunEvent::ChunkWritten(file) => {
        let name = file.path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        println!("  {}", name);
        println!("    -> {} pages, {}", file.chunk.len(), format_size(file.bytes));
      },
      RunEvent::ChunkArchived(result) => {
        let name =
          result.archive_path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        println!("  {}", name.green());
        println!(
          "    -> {} ({:.1}% reduction, ratio {:.3})",
          format_size(result.compressed_bytes),
          result.reduction_percent(),
          result.ratio()
        );
      },
      RunEvent::ChunkFailed { number, chunk, error } => {
        eprintln!("  {} chunk {} ({}): {}", "failed".red().bold(), number, chunk, error);
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_format_size_thresholds() {
    assert_eq!(format_size(0), "0 B");
    assert_eq!(format_size(1023), "1023 B");
    assert_eq!(format_size(1024), "1.0 KB");
    assert_eq!(format_size(1536), "1.5 KB");
    assert_eq!(format_size(1024 * 1024), "1.00 MB");
    assert_eq!(format_size(5 * 1024 * 1024 + 512 * 1024), "5.50 MB");
  }

  #[test]
  fn test_single_chunk_warning_only_for_proportional() {
    assert!(target_warning(Strategy::Proportional, 100, 100).is_some());
    assert!(target_warning(Strategy::Proportional, 99, 100).is_none());
    assert!(target_warning(Strategy::Greedy, 500, 100).is_none());
  }
}

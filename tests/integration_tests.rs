extern crate pdf_chunker;
extern crate tempfile;

#[cfg(test)]
mod integration_tests {
  use std::fs;
  use std::io::{self, Cursor, Read};
  use std::path::{Path, PathBuf};

  use lopdf::Document;
  use pdf_chunker::archiver::ArchiveOptions;
  use pdf_chunker::errors::ChunkerError;
  use pdf_chunker::estimator::estimate_page_sizes;
  use pdf_chunker::output_store::{LocalStore, MemoryStore, OutputStore};
  use pdf_chunker::pdf_extractor::{PageSource, PdfPages};
  use pdf_chunker::runner::{run, SplitJob};
  use pdf_chunker::sample::{build_pdf, PageKind};
  use pdf_chunker::types::{RunSummary, Strategy};
  use pretty_assertions::assert_eq;
  use tempfile::tempdir;
  use zip::ZipArchive;

  fn text(lines: usize) -> PageKind {
    PageKind::Text { lines }
  }

  fn noise(width: u32, height: u32, seed: u64) -> PageKind {
    PageKind::Noise { width, height, seed }
  }

  fn write_sample(dir: &Path, name: &str, pages: &[PageKind]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, build_pdf(pages).unwrap()).unwrap();
    path
  }

  fn job_for(path: &Path, target_bytes: u64) -> SplitJob {
    SplitJob {
      source: path.to_path_buf(),
      file_size: fs::metadata(path).map(|m| m.len()).unwrap_or(0),
      target_bytes,
      strategy: Strategy::Greedy,
      output_dir: None,
      archive: ArchiveOptions::default(),
    }
  }

  /// Unpack a single-entry archive and return the entry name and its pages.
  fn unzip_chunk(bytes: Vec<u8>) -> (String, usize) {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 1);
    let mut entry = archive.by_index(0).unwrap();
    let name = entry.name().to_string();
    let mut pdf = Vec::new();
    entry.read_to_end(&mut pdf).unwrap();
    let pages = Document::load_mem(&pdf).unwrap().get_pages().len();
    (name, pages)
  }

  fn assert_covers_all_pages(summary: &RunSummary) {
    assert_eq!(summary.chunks.first().map(|c| c.start), Some(0));
    assert_eq!(summary.chunks.last().map(|c| c.end), Some(summary.page_count));
    for pair in summary.chunks.windows(2) {
      assert_eq!(pair[0].end, pair[1].start);
    }
  }

  // Requirement: a real PDF is split into contiguous chunks, each zipped
  // alone under <stem>_chunks with the intermediate PDFs removed.
  #[test]
  fn test_split_and_archive_real_pdf() {
    let dir = tempdir().expect("Unable to create temporary directory.");
    let pages =
      [text(10), noise(40, 30, 1), text(3), text(3), noise(30, 20, 2), text(8), text(1), noise(20, 20, 3)];
    let path = write_sample(dir.path(), "report.pdf", &pages);
    let source = PdfPages::from_pdf(&path).unwrap();
    let estimate = estimate_page_sizes(&source).unwrap();
    let target = *estimate.as_slice().iter().max().unwrap() * 2;

    let summary = run(&source, &mut LocalStore, &mut (), &job_for(&path, target)).unwrap();

    assert_eq!(summary.page_count, pages.len());
    assert_covers_all_pages(&summary);
    assert!(summary.failures.is_empty());
    assert_eq!(summary.archives.len(), summary.chunks.len());
    assert_eq!(summary.output_dir, dir.path().join("report_chunks"));
    for chunk in &summary.chunks {
      assert!(chunk.len() == 1 || chunk.estimated_bytes <= target);
    }

    for archive in &summary.archives {
      let pdf_name = format!(
        "report_chunk{:03}_pages{:03}-{:03}.pdf",
        archive.number,
        archive.chunk.first_page_number(),
        archive.chunk.last_page_number()
      );
      assert_eq!(archive.archive_path, summary.output_dir.join(&pdf_name).with_extension("zip"));
      assert!(!summary.output_dir.join(&pdf_name).exists());
      assert!(!archive.intermediate_retained);

      let (entry, page_count) = unzip_chunk(fs::read(&archive.archive_path).unwrap());
      assert_eq!(entry, pdf_name);
      assert_eq!(page_count, archive.chunk.len());
    }
  }

  // Requirement: a page larger than the target gets a chunk of its own, and
  // pages that exactly fill the target stay together.
  #[test]
  fn test_one_giant_page_is_isolated() {
    let dir = tempdir().expect("Unable to create temporary directory.");
    let path = write_sample(dir.path(), "scan.pdf", &[noise(200, 150, 9), text(5), text(5), text(5), text(5)]);
    let source = PdfPages::from_pdf(&path).unwrap();
    let estimate = estimate_page_sizes(&source).unwrap();
    let target = estimate.sum(1..5);
    assert!(estimate.get(0).unwrap() > target);

    let summary = run(&source, &mut LocalStore, &mut (), &job_for(&path, target)).unwrap();

    assert_eq!(
      summary.chunks.iter().map(|c| (c.start, c.end)).collect::<Vec<_>>(),
      vec![(0, 1), (1, 5)]
    );
    assert_eq!(summary.chunks[1].estimated_bytes, target);
    let mut names: Vec<String> = fs::read_dir(&summary.output_dir)
      .unwrap()
      .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
      .collect();
    names.sort();
    assert_eq!(names, vec!["scan_chunk001_pages001-001.zip", "scan_chunk002_pages002-005.zip"]);
  }

  #[test]
  fn test_target_above_file_size_gives_one_chunk() {
    let dir = tempdir().expect("Unable to create temporary directory.");
    let path = write_sample(dir.path(), "small.pdf", &[text(2), text(2), text(2)]);
    let source = PdfPages::from_pdf(&path).unwrap();
    let summary = run(&source, &mut LocalStore, &mut (), &job_for(&path, 1024 * 1024)).unwrap();
    assert_eq!(summary.chunks.len(), 1);
    assert_eq!(summary.archives.len(), 1);
    let (_, pages) = unzip_chunk(fs::read(&summary.archives[0].archive_path).unwrap());
    assert_eq!(pages, 3);
  }

  #[test]
  fn test_keep_intermediate_pdfs_on_disk() {
    let dir = tempdir().expect("Unable to create temporary directory.");
    let path = write_sample(dir.path(), "notes.pdf", &[text(4), text(4)]);
    let out = dir.path().join("out");
    let source = PdfPages::from_pdf(&path).unwrap();
    let mut job = job_for(&path, 1);
    job.output_dir = Some(out.clone());
    job.archive = ArchiveOptions { keep_intermediate: true, compression_level: Some(9) };

    let summary = run(&source, &mut LocalStore, &mut (), &job).unwrap();

    assert_eq!(summary.archives.len(), 2);
    for archive in &summary.archives {
      assert!(archive.intermediate_retained);
      let pdf = archive.archive_path.with_extension("pdf");
      assert_eq!(Document::load(&pdf).unwrap().get_pages().len(), 1);
      assert_eq!(fs::metadata(&pdf).unwrap().len(), archive.original_bytes);
    }
    assert!(!dir.path().join("notes_chunks").exists());
  }

  #[test]
  fn test_proportional_strategy_on_real_pdf() {
    let dir = tempdir().expect("Unable to create temporary directory.");
    let pages: Vec<PageKind> = (0..10).map(|i| noise(16, 16, i)).collect();
    let path = write_sample(dir.path(), "even.pdf", &pages);
    let source = PdfPages::from_pdf(&path).unwrap();
    let mut job = job_for(&path, 0);
    job.target_bytes = job.file_size / 3 + 1;
    job.strategy = Strategy::Proportional;

    let summary = run(&source, &mut LocalStore, &mut (), &job).unwrap();

    assert_covers_all_pages(&summary);
    assert_eq!(summary.archives.len(), summary.chunks.len());
    assert!(summary.chunks.iter().all(|c| !c.is_empty()));
  }

  // Requirement: a document without pages is rejected before anything is
  // written.
  #[test]
  fn test_empty_document_is_rejected() {
    let dir = tempdir().expect("Unable to create temporary directory.");
    let path = write_sample(dir.path(), "empty.pdf", &[]);
    let source = PdfPages::from_pdf(&path).unwrap();
    assert_eq!(source.page_count(), 0);

    let err = run(&source, &mut LocalStore, &mut (), &job_for(&path, 1024)).unwrap_err();

    assert!(matches!(err, ChunkerError::EmptyDocument));
    assert!(!dir.path().join("empty_chunks").exists());
  }

  #[test]
  fn test_zero_target_is_rejected() {
    let dir = tempdir().expect("Unable to create temporary directory.");
    let path = write_sample(dir.path(), "doc.pdf", &[text(1)]);
    let source = PdfPages::from_pdf(&path).unwrap();
    let err = run(&source, &mut LocalStore, &mut (), &job_for(&path, 0)).unwrap_err();
    assert!(matches!(err, ChunkerError::InvalidTarget(_)));
    assert!(!dir.path().join("doc_chunks").exists());
  }

  /// Refuses to write any file whose name contains `poison`.
  struct FlakyStore {
    inner: MemoryStore,
    poison: &'static str,
  }

  impl OutputStore for FlakyStore {
    fn create_dir_all(&mut self, dir: &Path) -> io::Result<()> {
      self.inner.create_dir_all(dir)
    }

    fn write(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()> {
      if path.to_string_lossy().contains(self.poison) {
        return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
      }
      self.inner.write(path, bytes)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
      self.inner.read(path)
    }

    fn remove(&mut self, path: &Path) -> io::Result<()> {
      self.inner.remove(path)
    }

    fn reveal(&mut self, dir: &Path) -> io::Result<()> {
      self.inner.reveal(dir)
    }
  }

  // Requirement: one chunk failing to write does not stop the others.
  #[test]
  fn test_failed_chunk_does_not_stop_the_run() {
    let bytes = build_pdf(&[text(2), text(2), text(2)]).unwrap();
    let source = PdfPages::from_bytes(&bytes).unwrap();
    let mut store = FlakyStore { inner: MemoryStore::new(), poison: "chunk002_pages002-002.pdf" };
    let job = SplitJob {
      source: PathBuf::from("/docs/three.pdf"),
      file_size: bytes.len() as u64,
      target_bytes: 1,
      strategy: Strategy::Greedy,
      output_dir: None,
      archive: ArchiveOptions::default(),
    };

    let summary = run(&source, &mut store, &mut (), &job).unwrap();

    assert_eq!(summary.chunks.len(), 3);
    assert_eq!(summary.archives.iter().map(|a| a.number).collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].number, 2);
    assert!(summary.failures[0].message.contains("disk full"));
    assert_eq!(
      store.inner.file_names(),
      vec!["three_chunk001_pages001-001.zip".to_string(), "three_chunk003_pages003-003.zip".to_string()]
    );
  }

  // Requirement: a failed archive write is reported as a compression failure
  // and the chunk PDF is left in place.
  #[test]
  fn test_failed_archive_keeps_chunk_pdf() {
    let bytes = build_pdf(&[text(2), text(2)]).unwrap();
    let source = PdfPages::from_bytes(&bytes).unwrap();
    let mut store = FlakyStore { inner: MemoryStore::new(), poison: "chunk001_pages001-001.zip" };
    let job = SplitJob {
      source: PathBuf::from("/docs/two.pdf"),
      file_size: bytes.len() as u64,
      target_bytes: 1,
      strategy: Strategy::Greedy,
      output_dir: None,
      archive: ArchiveOptions::default(),
    };

    let summary = run(&source, &mut store, &mut (), &job).unwrap();

    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].message.contains("compress"));
    assert_eq!(
      store.inner.file_names(),
      vec!["two_chunk001_pages001-001.pdf".to_string(), "two_chunk002_pages002-002.zip".to_string()]
    );
  }
}

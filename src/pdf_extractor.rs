use lopdf::Document;
use std::ops::Range;
use std::path::Path;

use crate::errors::PdfExtractorError;

/// Anything that can hand out standalone serialized PDFs for page ranges.
///
/// The estimator and the chunk writer only see this trait, so they can be
/// exercised with fixed page sizes in tests.
pub trait PageSource {
  /// Number of pages in the source document.
  fn page_count(&self) -> usize;

  /// Serialize a new document holding exactly the pages in `pages`
  /// (zero-based, half-open), in their original order.
  fn extract_pages(&self, pages: Range<usize>) -> Result<Vec<u8>, PdfExtractorError>;
}

/// A PDF loaded into memory with lopdf.
pub struct PdfPages {
  doc: Document,
  /// lopdf page numbers (1-based, ascending) in document order.
  page_numbers: Vec<u32>,
}

impl PdfPages {
  pub fn from_pdf<P: AsRef<Path>>(pdf_path: P) -> Result<Self, PdfExtractorError> {
    let doc = Document::load(pdf_path).map_err(PdfExtractorError::Load)?;
    Ok(Self::from_document(doc))
  }

  pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfExtractorError> {
    let doc = Document::load_mem(bytes).map_err(PdfExtractorError::Load)?;
    Ok(Self::from_document(doc))
  }

  pub fn from_document(doc: Document) -> Self {
    let page_numbers = doc.get_pages().keys().copied().collect();
    PdfPages { doc, page_numbers }
  }

  pub fn total_pages(&self) -> usize {
    self.page_numbers.len()
  }

  pub fn document(&self) -> &Document {
    &self.doc
  }
}

impl PageSource for PdfPages {
  fn page_count(&self) -> usize {
    self.total_pages()
  }

  fn extract_pages(&self, pages: Range<usize>) -> Result<Vec<u8>, PdfExtractorError> {
    if pages.start >= pages.end {
      return Err(PdfExtractorError::EmptyRange { start: pages.start, end: pages.end });
    }
    if pages.end > self.page_numbers.len() {
      return Err(PdfExtractorError::PageOutOfRange {
        page: pages.end - 1,
        page_count: self.page_numbers.len(),
      });
    }

    // the source stays untouched, every extraction trims its own copy
    let mut doc = self.doc.clone();
    let to_delete: Vec<u32> = self
      .page_numbers
      .iter()
      .enumerate()
      .filter(|(index, _)| !pages.contains(index))
      .map(|(_, number)| *number)
      .collect();
    if !to_delete.is_empty() {
      doc.delete_pages(&to_delete);
      doc.prune_objects();
    }

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(PdfExtractorError::Serialize)?;
    Ok(buffer)
  }
}

use tracing::debug;

use crate::errors::{ChunkerError, Result};
use crate::pdf_extractor::PageSource;
use crate::types::PageSizeEstimate;

/// Measure every page in isolation.
///
/// Page `i` is extracted into a singleton document and its serialized length
/// becomes the estimate for `i`. Shared resources (fonts, images, the xref
/// table) are copied into every singleton, so the estimates are an upper
/// bound on each page's real contribution and the chunks written later come
/// out smaller than their estimates.
///
/// Any page that fails to extract aborts the whole estimate.
pub fn estimate_page_sizes<S: PageSource + ?Sized>(source: &S) -> Result<PageSizeEstimate> {
  let page_count = source.page_count();
  let mut sizes = Vec::with_capacity(page_count);
  for page in 0..page_count {
    let bytes = source
      .extract_pages(page..page + 1)
      .map_err(|source| ChunkerError::Extraction { page, source })?;
    debug!(page, bytes = bytes.len(), "estimated page size");
    sizes.push(bytes.len() as u64);
  }
  Ok(PageSizeEstimate::new(sizes))
}

//! Synthetic PDFs for exercising the splitter.
//!
//! Text pages are small and share one font object. Noise pages embed an
//! uncompressed RGB image that does not compress well, so a handful of them
//! dominates the file size the way scanned or photo-heavy pages do.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore. ";
const NOISE_BASE_WIDTH: f64 = 1500.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageKind {
  /// A page with `lines` lines of filler text.
  Text { lines: usize },
  /// A page with a `width` x `height` noisy gradient image, seeded per page.
  Noise { width: u32, height: u32, seed: u64 },
}

impl PageKind {
  /// Noise page scaled from a 1500 x 1125 base image.
  pub fn noise(multiplier: f64, seed: u64) -> Self {
    PageKind::Noise {
      width: (NOISE_BASE_WIDTH * multiplier) as u32,
      height: (NOISE_BASE_WIDTH * 0.75 * multiplier) as u32,
      seed,
    }
  }
}

/// Page mixes for the sample generator binary.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
  /// Every fourth page is an image, the rest heavy text. 60 pages.
  Mixed,
  /// Mostly tiny text pages with large and medium images mixed in. 50 pages.
  Variable,
  /// One huge image page followed by tiny text pages. 30 pages.
  OneGiant,
  /// Identical image pages. 100 pages.
  Uniform,
}

impl Profile {
  pub fn default_pages(&self) -> usize {
    match self {
      Profile::Mixed => 60,
      Profile::Variable => 50,
      Profile::OneGiant => 30,
      Profile::Uniform => 100,
    }
  }

  pub fn pages(&self, count: Option<usize>) -> Vec<PageKind> {
    let count = count.unwrap_or_else(|| self.default_pages());
    (0..count)
      .map(|i| {
        let seed = i as u64 + 1;
        match self {
          Profile::Mixed if i % 4 == 0 => PageKind::noise(1.5, seed),
          Profile::Mixed => PageKind::Text { lines: 60 },
          Profile::Variable if i % 7 == 0 => PageKind::noise(2.0, seed),
          Profile::Variable if i % 7 == 3 => PageKind::noise(1.0, seed),
          Profile::Variable => PageKind::Text { lines: 5 },
          Profile::OneGiant if i == 0 => PageKind::Noise { width: 3000, height: 2000, seed: 999 },
          Profile::OneGiant => PageKind::Text { lines: 5 },
          Profile::Uniform => PageKind::noise(0.8, seed),
        }
      })
      .collect()
  }
}

/// Build a letter-sized document with one page per entry of `pages`.
pub fn build_document(pages: &[PageKind]) -> lopdf::Result<Document> {
  let mut doc = Document::with_version("1.5");
  let pages_id = doc.new_object_id();
  let font_id = doc.add_object(dictionary! {
    "Type" => "Font",
    "Subtype" => "Type1",
    "BaseFont" => "Helvetica",
  });

  let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
  for (index, kind) in pages.iter().enumerate() {
    let page_number = index + 1;
    let (operations, xobjects) = match kind {
      PageKind::Text { lines } => (text_operations(page_number, *lines), dictionary! {}),
      PageKind::Noise { width, height, seed } => {
        let image_id = doc.add_object(noise_image(*width, *height, *seed));
        let label = format!("Page {} - Image ({}x{})", page_number, width, height);
        let operations = vec![
          Operation::new("BT", vec![]),
          Operation::new("Tf", vec!["F1".into(), 14.into()]),
          Operation::new("Td", vec![40.into(), 770.into()]),
          Operation::new("Tj", vec![Object::string_literal(label)]),
          Operation::new("ET", vec![]),
          Operation::new("q", vec![]),
          Operation::new(
            "cm",
            vec![530.into(), 0.into(), 0.into(), 400.into(), 40.into(), 100.into()],
          ),
          Operation::new("Do", vec!["Im1".into()]),
          Operation::new("Q", vec![]),
        ];
        (operations, dictionary! { "Im1" => image_id })
      },
    };

    let content_id = doc.add_object(Stream::new(dictionary! {}, Content { operations }.encode()?));
    let resources = dictionary! {
      "Font" => dictionary! { "F1" => font_id },
      "XObject" => xobjects,
    };
    let page_id = doc.add_object(dictionary! {
      "Type" => "Page",
      "Parent" => pages_id,
      "Contents" => content_id,
      "Resources" => resources,
    });
    kids.push(page_id.into());
  }

  let count = kids.len() as i64;
  doc.objects.insert(
    pages_id,
    Object::Dictionary(dictionary! {
      "Type" => "Pages",
      "Kids" => kids,
      "Count" => count,
      "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    }),
  );
  let catalog_id = doc.add_object(dictionary! {
    "Type" => "Catalog",
    "Pages" => pages_id,
  });
  doc.trailer.set("Root", catalog_id);
  Ok(doc)
}

/// Serialize a freshly built sample document.
pub fn build_pdf(pages: &[PageKind]) -> lopdf::Result<Vec<u8>> {
  let mut doc = build_document(pages)?;
  let mut buffer = Vec::new();
  doc.save_to(&mut buffer)?;
  Ok(buffer)
}

fn text_operations(page_number: usize, lines: usize) -> Vec<Operation> {
  let mut operations = vec![
    Operation::new("BT", vec![]),
    Operation::new("Tf", vec!["F1".into(), 10.into()]),
    Operation::new("TL", vec![12.into()]),
    Operation::new("Td", vec![40.into(), 770.into()]),
  ];
  for line in 1..=lines {
    let text: String =
      format!("Page {} Line {}: {}", page_number, line, LOREM.repeat(2)).chars().take(110).collect();
    operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
    operations.push(Operation::new("T*", vec![]));
  }
  operations.push(Operation::new("ET", vec![]));
  operations
}

fn noise_image(width: u32, height: u32, seed: u64) -> Stream {
  let mut rng = StdRng::seed_from_u64(seed);
  let (w, h) = (width.max(1) as u64, height.max(1) as u64);
  let mut data = Vec::with_capacity((w * h * 3) as usize);
  for y in 0..h {
    for x in 0..w {
      let noise: i64 = rng.gen_range(-30..=30);
      let r = ((x * 200 / w) as i64 + noise).clamp(0, 255);
      let g = ((y * 200 / h) as i64 + noise).clamp(0, 255);
      let b = ((x * y * 200 / (w * h)) as i64 + noise).clamp(0, 255);
      data.extend_from_slice(&[r as u8, g as u8, b as u8]);
    }
  }
  Stream::new(
    dictionary! {
      "Type" => "XObject",
      "Subtype" => "Image",
      "Width" => w as i64,
      "Height" => h as i64,
      "ColorSpace" => "DeviceRGB",
      "BitsPerComponent" => 8,
    },
    data,
  )
}

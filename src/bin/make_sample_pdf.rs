use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};

use pdf_chunker::sample::{build_pdf, Profile};
use pdf_chunker::ui::{display_info_message, format_size};

/// Write a synthetic PDF for trying out the splitter.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
  #[arg(short, long, value_enum, default_value_t = Profile::Mixed, help = "Page mix to generate")]
  profile: Profile,

  #[arg(short = 'n', long, value_name = "COUNT", help = "Number of pages, defaults to the profile's own count")]
  pages: Option<usize>,

  #[arg(short, long, value_name = "FILE", default_value = "sample.pdf", help = "Where to write the PDF")]
  output: PathBuf,
}

fn main() -> Result<()> {
  color_eyre::install()?;
  let args = Args::parse();

  let pages = args.profile.pages(args.pages);
  let bytes = build_pdf(&pages).wrap_err("failed to build the sample document")?;
  std::fs::write(&args.output, &bytes).wrap_err_with(|| format!("cannot write {}", args.output.display()))?;

  display_info_message(&format!(
    "Wrote {} ({} pages, {})",
    args.output.display(),
    pages.len(),
    format_size(bytes.len() as u64)
  ));
  Ok(())
}

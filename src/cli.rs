use clap::Parser;
use std::path::PathBuf;

use crate::types::Strategy;
use crate::utils::version;

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
  #[arg(value_name = "PDF", help = "PDF file to split")]
  pub input: PathBuf,

  #[arg(
    short,
    long = "target",
    value_name = "MB",
    help = "Target size per chunk in megabytes (1 MB = 1,048,576 bytes). Prompted for when omitted"
  )]
  pub target_mb: Option<f64>,

  #[arg(short, long, value_enum, value_name = "STRATEGY", help = "How pages are grouped into chunks")]
  pub strategy: Option<Strategy>,

  #[arg(
    short,
    long = "output-dir",
    value_name = "DIR",
    help = "Where to put the archives instead of <name>_chunks next to the input"
  )]
  pub output_dir: Option<PathBuf>,

  #[arg(long = "keep-pdfs", help = "Keep the uncompressed chunk PDFs next to their archives")]
  pub keep_pdfs: bool,

  #[arg(long = "no-open", help = "Do not open the output folder when done")]
  pub no_open: bool,

  #[arg(
    short = 'l',
    long = "level",
    value_name = "0-9",
    value_parser = clap::value_parser!(i32).range(0..=9),
    help = "Deflate compression level"
  )]
  pub compression_level: Option<i32>,

  #[arg(long, help = "Print the run summary as JSON")]
  pub json: bool,

  #[arg(short, long, help = "Never prompt, use the suggested target when none is given")]
  pub yes: bool,
}

use clap::Parser;
use color_eyre::eyre::{bail, Result, WrapErr};
use dialoguer::Input;
use std::io::IsTerminal;
use tracing::{info, warn};

use pdf_chunker::chunkifier::Chunkifier;
use pdf_chunker::cli::Cli;
use pdf_chunker::config::Config;
use pdf_chunker::errors::ChunkerError;
use pdf_chunker::output_store::LocalStore;
use pdf_chunker::pdf_extractor::PdfPages;
use pdf_chunker::runner::{reveal_output, run, SplitJob};
use pdf_chunker::ui::{self, format_size, ConsoleReporter};
use pdf_chunker::utils::{get_config_dir, initialize_panic_handler, initialize_tracing, suggested_target_mb};

fn prompt_target_mb(file_size: u64, non_interactive: bool) -> Result<f64> {
  let suggested = suggested_target_mb(file_size);
  if non_interactive || !std::io::stdin().is_terminal() {
    return Ok(suggested);
  }
  let target = Input::<f64>::new()
    .with_prompt(format!(
      "Input PDF size: {}. Target size per chunk (MB)",
      format_size(file_size)
    ))
    .default(suggested)
    .validate_with(|value: &f64| -> Result<(), &'static str> {
      if value.is_finite() && *value > 0.0 {
        Ok(())
      } else {
        Err("the target must be a positive number of megabytes")
      }
    })
    .interact_text()?;
  Ok(target)
}

fn main() -> Result<()> {
  initialize_panic_handler()?;
  initialize_tracing()?;

  let cli = Cli::parse();
  let mut config = Config::new(&get_config_dir()).wrap_err("failed to load configuration")?;
  if let Some(strategy) = cli.strategy {
    config.strategy = strategy;
  }
  if cli.keep_pdfs {
    config.keep_intermediate = true;
  }
  if cli.no_open {
    config.open_output = false;
  }
  if cli.compression_level.is_some() {
    config.compression_level = cli.compression_level;
  }

  if !cli.json {
    ui::display_banner();
  }

  let file_size = std::fs::metadata(&cli.input)
    .wrap_err_with(|| format!("cannot read {}", cli.input.display()))?
    .len();
  let target_mb = match cli.target_mb.or(config.target_mb) {
    Some(target) => target,
    None => prompt_target_mb(file_size, cli.yes || cli.json)?,
  };
  let target_bytes = Chunkifier::target_bytes(target_mb)?;

  let source = PdfPages::from_pdf(&cli.input)
    .map_err(|source| ChunkerError::Load { path: cli.input.clone(), source })?;
  info!(path = %cli.input.display(), file_size, pages = source.total_pages(), "loaded source");

  if !cli.json {
    ui::display_source(&cli.input, file_size, source.total_pages());
    ui::display_info_message(&format!(
      "Target chunk size: {:.2} MB ({} strategy)",
      target_mb, config.strategy
    ));
    if let Some(warning) = ui::target_warning(config.strategy, target_bytes, file_size) {
      ui::display_warning_message(warning);
    }
  }

  let job = SplitJob {
    source: cli.input.clone(),
    file_size,
    target_bytes,
    strategy: config.strategy,
    output_dir: cli.output_dir.clone(),
    archive: config.archive_options(),
  };
  let mut store = LocalStore;
  let result = if cli.json {
    run(&source, &mut store, &mut (), &job)
  } else {
    run(&source, &mut store, &mut ConsoleReporter, &job)
  };
  let summary = result.wrap_err_with(|| format!("failed to split {}", cli.input.display()))?;

  if cli.json {
    println!("{}", serde_json::to_string_pretty(&summary)?);
  } else {
    ui::display_summary(&summary);
  }

  if config.open_output {
    reveal_output(&mut store, &summary);
  }

  if !summary.produced_any() {
    bail!("no chunks were produced");
  }
  if !summary.failures.is_empty() {
    warn!(failed = summary.failures.len(), "run finished with failed chunks");
    bail!("{} of {} chunks failed", summary.failures.len(), summary.chunks.len());
  }
  Ok(())
}

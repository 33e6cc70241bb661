use crate::consts::*;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing_error::ErrorLayer;
use tracing_subscriber::{self, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use color_eyre::eyre::Result;
use tracing::error;

fn project_directory() -> Option<ProjectDirs> {
  ProjectDirs::from("com", "zetaohm", env!("CARGO_PKG_NAME"))
}

/// `override_dir` when set, then the platform directory, then `./<fallback>`.
fn resolve_dir(override_dir: &Option<PathBuf>, platform: fn(&ProjectDirs) -> &Path, fallback: &str) -> PathBuf {
  override_dir
    .clone()
    .or_else(|| project_directory().map(|dirs| platform(&dirs).to_path_buf()))
    .unwrap_or_else(|| PathBuf::from(".").join(fallback))
}

/// Where the log file goes. `PDF_CHUNKER_DATA` overrides it.
pub fn get_data_dir() -> PathBuf {
  resolve_dir(&DATA_FOLDER, ProjectDirs::data_local_dir, ".data")
}

/// Where `config.toml` is looked up. `PDF_CHUNKER_CONFIG` overrides it.
pub fn get_config_dir() -> PathBuf {
  resolve_dir(&CONFIG_FOLDER, ProjectDirs::config_local_dir, ".config")
}

/// Log to `<data dir>/pdf-chunker.log`. The filter comes from
/// `RUST_LOG` or `PDF_CHUNKER_LOG_LEVEL`, defaulting to info for this crate.
pub fn initialize_tracing() -> Result<()> {
  let log_dir = get_data_dir();
  std::fs::create_dir_all(&log_dir)?;
  let log_file = std::fs::OpenOptions::new().create(true).append(true).open(log_dir.join(LOG_FILE.as_str()))?;

  let directives = std::env::var("RUST_LOG")
    .or_else(|_| std::env::var(LOG_ENV.as_str()))
    .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")));
  let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("info"));

  let file_layer = tracing_subscriber::fmt::layer()
    .with_writer(log_file)
    .with_ansi(false)
    .with_target(false)
    .with_file(true)
    .with_line_number(true)
    .with_filter(filter);

  tracing_subscriber::registry().with(file_layer).with(ErrorLayer::default()).init();
  Ok(())
}

/// Route eyre reports and panics through color-eyre. Release builds also
/// write a human-panic crash dump, debug builds print a full backtrace.
pub fn initialize_panic_handler() -> Result<()> {
  let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
    .panic_section(format!(
      "pdf-chunker crashed. Please file an issue at {} with the input PDF if you can share it",
      env!("CARGO_PKG_REPOSITORY")
    ))
    .display_location_section(true)
    .into_hooks();
  eyre_hook.install()?;

  std::panic::set_hook(Box::new(move |panic_info| {
    let report = panic_hook.panic_report(panic_info).to_string();
    error!("panic: {}", strip_ansi_escapes::strip_str(&report));

    #[cfg(not(debug_assertions))]
    {
      eprintln!("{}", report);
      let meta = human_panic::Metadata {
        version: env!("CARGO_PKG_VERSION").into(),
        name: env!("CARGO_PKG_NAME").into(),
        authors: env!("CARGO_PKG_AUTHORS").replace(':', ", ").into(),
        homepage: env!("CARGO_PKG_REPOSITORY").into(),
      };
      let dump = human_panic::handle_dump(&meta, panic_info);
      if let Err(e) = human_panic::print_msg(dump, &meta) {
        eprintln!("could not print the crash report location: {}", e);
      }
    }

    #[cfg(debug_assertions)]
    {
      better_panic::Settings::auto()
        .most_recent_first(false)
        .lineno_suffix(true)
        .verbosity(better_panic::Verbosity::Full)
        .create_panic_handler()(panic_info);
    }

    std::process::exit(libc::EXIT_FAILURE);
  }));
  Ok(())
}

/// Suggested target for a file of `file_size` bytes: a quarter of the file,
/// rounded half to even at one decimal, never below 1 MB.
pub fn suggested_target_mb(file_size: u64) -> f64 {
  let file_mb = file_size as f64 / BYTES_PER_MB as f64;
  let suggested = (file_mb / SUGGESTED_CHUNK_COUNT * 10.0).round_ties_even() / 10.0;
  suggested.max(MIN_SUGGESTED_TARGET_MB)
}

/// Long version string for `--version`: build info plus the directories in use.
pub fn version() -> String {
  format!(
    "{}\ncommit: {}\nauthors: {}\nconfig: {}\nlogs: {}",
    env!("CARGO_PKG_VERSION"),
    GIT_COMMIT_HASH.as_str(),
    clap::crate_authors!(", "),
    get_config_dir().join(CONFIG_FILE).display(),
    get_data_dir().join(LOG_FILE.as_str()).display(),
  )
}

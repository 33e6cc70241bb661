use std::path::Path;

use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::archiver::ArchiveOptions;
use crate::consts::{CONFIG_FILE, PROJECT_NAME};
use crate::errors::{ChunkerError, Result};
use crate::types::Strategy;

/// Settings that can come from the config file or the environment.
/// Command line flags are applied on top by the binary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
  /// Target chunk size in megabytes. Prompted for when unset.
  #[serde(default)]
  pub target_mb: Option<f64>,
  #[serde(default)]
  pub strategy: Strategy,
  #[serde(default)]
  pub keep_intermediate: bool,
  #[serde(default = "default_open_output")]
  pub open_output: bool,
  #[serde(default)]
  pub compression_level: Option<i32>,
}

fn default_open_output() -> bool {
  true
}

impl Default for Config {
  fn default() -> Self {
    Config {
      target_mb: None,
      strategy: Strategy::default(),
      keep_intermediate: false,
      open_output: default_open_output(),
      compression_level: None,
    }
  }
}

impl Config {
  /// Defaults, then `<config_dir>/config.toml` if present, then
  /// `PDF_CHUNKER_*` environment variables.
  pub fn new(config_dir: &Path) -> Result<Self> {
    let builder = config::Config::builder()
      .set_default("strategy", "greedy")?
      .set_default("keep_intermediate", false)?
      .set_default("open_output", true)?
      .add_source(File::from(config_dir.join(CONFIG_FILE)).format(FileFormat::Toml).required(false))
      .add_source(Environment::with_prefix(&PROJECT_NAME).try_parsing(true));

    let cfg: Config = builder.build()?.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
  }

  pub fn validate(&self) -> Result<()> {
    if let Some(level) = self.compression_level {
      if !(0..=9).contains(&level) {
        return Err(ChunkerError::Config(config::ConfigError::Message(format!(
          "compression_level must be between 0 and 9, got {level}"
        ))));
      }
    }
    if let Some(target) = self.target_mb {
      if !target.is_finite() || target <= 0.0 {
        return Err(ChunkerError::InvalidTarget(format!("{target} MB")));
      }
    }
    Ok(())
  }

  pub fn archive_options(&self) -> ArchiveOptions {
    ArchiveOptions {
      keep_intermediate: self.keep_intermediate,
      compression_level: self.compression_level,
    }
  }
}

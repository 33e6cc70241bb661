use lazy_static::lazy_static;
use std::path::PathBuf;

/// Target sizes are given in binary megabytes.
pub const BYTES_PER_MB: u64 = 1_048_576;

pub const CHUNK_DIR_SUFFIX: &str = "_chunks";
pub const CONFIG_FILE: &str = "config.toml";

/// Minimum number of digits for chunk numbers and page bounds in file names.
pub const NUMBER_WIDTH: usize = 3;

/// Smallest target suggested when prompting for one.
pub const MIN_SUGGESTED_TARGET_MB: f64 = 1.0;
/// The suggested target splits the source into roughly this many chunks.
pub const SUGGESTED_CHUNK_COUNT: f64 = 4.0;

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        std::env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        std::env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref GIT_COMMIT_HASH: String =
        std::env::var(format!("{}_GIT_INFO", PROJECT_NAME.clone()))
            .unwrap_or_else(|_| String::from("Unknown"));
    pub static ref LOG_ENV: String = format!("{}_LOG_LEVEL", PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME").to_lowercase());
}

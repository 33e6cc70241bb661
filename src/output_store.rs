use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

/// Filesystem and desktop side effects of a run.
///
/// The writer, the archiver and the runner only touch the outside world
/// through this trait. `LocalStore` is the real thing, `MemoryStore` keeps
/// files in a map for tests.
pub trait OutputStore {
  fn create_dir_all(&mut self, dir: &Path) -> io::Result<()>;
  fn write(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()>;
  fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
  fn remove(&mut self, path: &Path) -> io::Result<()>;
  /// Show a directory to the user, e.g. in the platform file manager.
  fn reveal(&mut self, dir: &Path) -> io::Result<()>;
}

/// Writes to the local filesystem and opens folders with the platform opener.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStore;

impl LocalStore {
  fn opener() -> Command {
    if cfg!(target_os = "windows") {
      Command::new("explorer")
    } else if cfg!(target_os = "macos") {
      Command::new("open")
    } else {
      Command::new("xdg-open")
    }
  }
}

impl OutputStore for LocalStore {
  fn create_dir_all(&mut self, dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
  }

  fn write(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()> {
    fs::write(path, bytes)
  }

  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    fs::read(path)
  }

  fn remove(&mut self, path: &Path) -> io::Result<()> {
    fs::remove_file(path)
  }

  fn reveal(&mut self, dir: &Path) -> io::Result<()> {
    debug!(dir = %dir.display(), "opening output folder");
    // the opener outlives us, it is not waited on
    Self::opener().arg(dir).spawn().map(|_| ())
  }
}

/// In-memory store. Writes into a directory that was never created fail with
/// `NotFound`, like the real filesystem.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
  dirs: BTreeSet<PathBuf>,
  files: BTreeMap<PathBuf, Vec<u8>>,
  revealed: Vec<PathBuf>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn files(&self) -> &BTreeMap<PathBuf, Vec<u8>> {
    &self.files
  }

  pub fn file_names(&self) -> Vec<String> {
    self
      .files
      .keys()
      .filter_map(|p| p.file_name())
      .map(|n| n.to_string_lossy().to_string())
      .collect()
  }

  pub fn has_dir(&self, dir: &Path) -> bool {
    self.dirs.contains(dir)
  }

  pub fn revealed(&self) -> &[PathBuf] {
    &self.revealed
  }

  fn parent_exists(&self, path: &Path) -> bool {
    match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => self.dirs.contains(parent),
      _ => true,
    }
  }
}

impl OutputStore for MemoryStore {
  fn create_dir_all(&mut self, dir: &Path) -> io::Result<()> {
    for ancestor in dir.ancestors().filter(|a| !a.as_os_str().is_empty()) {
      self.dirs.insert(ancestor.to_path_buf());
    }
    Ok(())
  }

  fn write(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()> {
    if !self.parent_exists(path) {
      return Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such directory: {}", path.display()),
      ));
    }
    self.files.insert(path.to_path_buf(), bytes.to_vec());
    Ok(())
  }

  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    self.files.get(path).cloned().ok_or_else(|| {
      io::Error::new(io::ErrorKind::NotFound, format!("no such file: {}", path.display()))
    })
  }

  fn remove(&mut self, path: &Path) -> io::Result<()> {
    self.files.remove(path).map(|_| ()).ok_or_else(|| {
      io::Error::new(io::ErrorKind::NotFound, format!("no such file: {}", path.display()))
    })
  }

  fn reveal(&mut self, dir: &Path) -> io::Result<()> {
    self.revealed.push(dir.to_path_buf());
    Ok(())
  }
}

//! Invocation-wide settings.
//!
//! Settings are resolved once at the CLI boundary and passed down by
//! reference; nothing below this module reads the process environment for
//! paths.

use std::path::PathBuf;

use crate::consts::{CELLAR_DIR, OPT_DIR};
use crate::platform::paths;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
  /// Root holding `Cellar/` and `opt/`.
  pub root: PathBuf,
  /// Where fetched archives and patches are cached.
  pub downloads_dir: PathBuf,
}

impl Settings {
  pub fn new(root: impl Into<PathBuf>, downloads_dir: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      downloads_dir: downloads_dir.into(),
    }
  }

  /// Resolve settings from `CELLAR_ROOT`/`CELLAR_CACHE` and the XDG
  /// directories.
  pub fn from_env() -> Self {
    Self::new(paths::root_dir(), paths::downloads_dir())
  }

  pub fn cellar_dir(&self) -> PathBuf {
    self.root.join(CELLAR_DIR)
  }

  pub fn opt_dir(&self) -> PathBuf {
    self.root.join(OPT_DIR)
  }

  /// Keg prefix for a formula version: `<root>/Cellar/<name>/<version>`.
  pub fn keg_prefix(&self, name: &str, version: &str) -> PathBuf {
    self.cellar_dir().join(name).join(version)
  }

  /// Stable link to the installed keg: `<root>/opt/<name>`.
  pub fn opt_prefix(&self, name: &str) -> PathBuf {
    self.opt_dir().join(name)
  }

  /// Scratch area for unpacked sources; each build gets a fresh temp dir below it.
  pub fn build_root(&self) -> PathBuf {
    self.root.join("tmp")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keg_and_opt_paths() {
    let settings = Settings::new("/c", "/c/cache");
    assert_eq!(settings.keg_prefix("qt5", "5.4.2"), PathBuf::from("/c/Cellar/qt5/5.4.2"));
    assert_eq!(settings.opt_prefix("qt5"), PathBuf::from("/c/opt/qt5"));
    assert_eq!(settings.build_root(), PathBuf::from("/c/tmp"));
  }
}

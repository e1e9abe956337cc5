//! Paths of an installed keg.

use std::path::PathBuf;

use serde::Serialize;

/// The installed tree produced by a formula, rooted at its keg prefix.
///
/// Only consulted by fixups and the smoke test, after the external install
/// step has succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallLayout {
  pub prefix: PathBuf,
  pub lib: PathBuf,
  pub include: PathBuf,
  pub frameworks: PathBuf,
  pub bin: PathBuf,
}

impl InstallLayout {
  pub fn new(prefix: impl Into<PathBuf>) -> Self {
    let prefix = prefix.into();
    Self {
      lib: prefix.join("lib"),
      include: prefix.join("include"),
      frameworks: prefix.join("Frameworks"),
      bin: prefix.join("bin"),
      prefix,
    }
  }

  /// Generated qmake configuration carrying build-environment leftovers.
  pub fn qconfig(&self) -> PathBuf {
    self.prefix.join("mkspecs").join("qconfig.pri")
  }

  /// Whether the keg looks installed (the prefix directory exists).
  pub fn is_installed(&self) -> bool {
    self.prefix.is_dir()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn derives_paths_from_prefix() {
    let layout = InstallLayout::new("/c/Cellar/qt5/5.4.2");
    assert_eq!(layout.lib, PathBuf::from("/c/Cellar/qt5/5.4.2/lib"));
    assert_eq!(layout.frameworks, PathBuf::from("/c/Cellar/qt5/5.4.2/Frameworks"));
    assert_eq!(layout.qconfig(), PathBuf::from("/c/Cellar/qt5/5.4.2/mkspecs/qconfig.pri"));
  }
}

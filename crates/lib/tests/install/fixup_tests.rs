//! Fixups against a keg on disk.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use cellar_lib::formula::{Formula, Qt5, Qtkeychain};
use cellar_lib::install::{self, InstallError};
use walkdir::WalkDir;

use super::common::{TestEnv, fake_qt_install};

/// Every symlink under `root` with its target.
fn links(root: &Path) -> BTreeSet<(PathBuf, PathBuf)> {
  WalkDir::new(root)
    .into_iter()
    .filter_map(Result::ok)
    .filter(|e| e.path_is_symlink())
    .map(|e| (e.path().to_path_buf(), fs::read_link(e.path()).unwrap()))
    .collect()
}

#[test]
fn fixup_is_idempotent() {
  let env = TestEnv::new();
  let prefix = env.settings.keg_prefix("qt5", Qt5.version());
  fake_qt_install(&prefix);

  let first = install::fixup_keg(&Qt5, &env.settings).unwrap();
  let links_after_first = links(&env.settings.root);
  let qconfig_after_first = fs::read_to_string(prefix.join("mkspecs/qconfig.pri")).unwrap();

  let second = install::fixup_keg(&Qt5, &env.settings).unwrap();

  assert!(first.is_empty());
  assert!(second.is_empty());
  assert_eq!(links(&env.settings.root), links_after_first);
  assert_eq!(
    fs::read_to_string(prefix.join("mkspecs/qconfig.pri")).unwrap(),
    qconfig_after_first
  );
  // Frameworks (2), headers (2), opt (1).
  assert_eq!(links_after_first.len(), 5);
}

#[test]
fn fixup_warnings_do_not_fail_the_keg() {
  let env = TestEnv::new();
  let prefix = env.settings.keg_prefix("qt5", Qt5.version());
  fake_qt_install(&prefix);
  fs::remove_file(prefix.join("mkspecs/qconfig.pri")).unwrap();
  fs::create_dir_all(prefix.join("include").join("QtCore")).unwrap();

  let warnings = install::fixup_keg(&Qt5, &env.settings).unwrap();

  assert_eq!(warnings.len(), 2);
  assert!(prefix.join("Frameworks").join("QtGui.framework").exists());
  assert!(prefix.join("Designer.app").is_dir());
}

#[test]
fn fixup_requires_installed_keg() {
  let env = TestEnv::new();
  assert!(matches!(
    install::fixup_keg(&Qtkeychain, &env.settings),
    Err(InstallError::NotInstalled { .. })
  ));
}

#[test]
fn qtkeychain_fixup_only_links_opt() {
  let env = TestEnv::new();
  let prefix = env.settings.keg_prefix("qtkeychain", Qtkeychain.version());
  fs::create_dir_all(prefix.join("lib")).unwrap();

  assert!(install::fixup_keg(&Qtkeychain, &env.settings).unwrap().is_empty());
  assert_eq!(links(&env.settings.root).len(), 1);
}

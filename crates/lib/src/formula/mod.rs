//! Formula definitions.
//!
//! A formula is a build recipe: where the source comes from, which options
//! it takes, how options become configure arguments, which external steps
//! build and install it, what to tidy afterwards and how to smoke-test the
//! result.

mod qt5;
mod qtkeychain;
mod types;

use std::path::Path;

pub use qt5::Qt5;
pub use qtkeychain::Qtkeychain;
pub use types::{Bottle, BuildStep, Dependency, DependencyKind, FormulaMeta, Patch, Phase, SmokeTest};

use crate::args::{ArgContext, ArgumentList, ArgsError};
use crate::execute::Resource;
use crate::fixup::FixupWarning;
use crate::layout::InstallLayout;
use crate::options::{BuildOptions, DeprecatedOption, OptionError, OptionSpec};

pub trait Formula: Sync {
  fn meta(&self) -> &'static FormulaMeta;

  fn options(&self) -> &'static [OptionSpec] {
    &[]
  }

  fn deprecated_options(&self) -> &'static [DeprecatedOption] {
    &[]
  }

  fn dependencies(&self) -> &'static [Dependency] {
    &[]
  }

  fn patches(&self) -> &'static [Patch] {
    &[]
  }

  fn bottles(&self) -> &'static [Bottle] {
    &[]
  }

  /// Arguments for the configure tool. Pure; must not touch the filesystem.
  fn configure_args(&self, ctx: &ArgContext<'_>) -> Result<ArgumentList, ArgsError>;

  /// The external steps that configure, compile and install the unpacked
  /// source in `source_dir`, in order.
  fn build_steps(&self, args: &ArgumentList, options: &BuildOptions, source_dir: &Path) -> Vec<BuildStep>;

  /// Tidy the installed keg.
  fn fixup(&self, _layout: &InstallLayout) -> Vec<FixupWarning> {
    Vec::new()
  }

  /// How to check the installed keg; `scratch` is an empty directory.
  fn smoke_test(&self, layout: &InstallLayout, scratch: &Path) -> SmokeTest;

  fn name(&self) -> &'static str {
    self.meta().name
  }

  fn version(&self) -> &'static str {
    self.meta().version
  }

  /// The source archive with its mirrors.
  fn source(&self) -> Resource {
    let meta = self.meta();
    meta
      .mirrors
      .iter()
      .fold(Resource::new(meta.url, meta.sha256), |r, m| r.mirror(*m))
  }

  fn parse_options(&self, flags: &[String]) -> Result<BuildOptions, OptionError> {
    BuildOptions::parse(self.options(), self.deprecated_options(), flags)
  }

  /// Names of dependencies that feed argument construction when located.
  fn host_dependencies(&self) -> Vec<&'static str> {
    self
      .dependencies()
      .iter()
      .filter(|d| d.kind != DependencyKind::Build)
      .map(|d| d.name)
      .collect()
  }
}

static QT5: Qt5 = Qt5;
static QTKEYCHAIN: Qtkeychain = Qtkeychain;

/// Every known formula, in name order.
pub fn all() -> [&'static dyn Formula; 2] {
  [&QT5, &QTKEYCHAIN]
}

pub fn lookup(name: &str) -> Option<&'static dyn Formula> {
  all().into_iter().find(|f| f.name() == name)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lookup_by_name() {
    assert_eq!(lookup("qt5").map(|f| f.version()), Some("5.4.2"));
    assert_eq!(lookup("qtkeychain").map(|f| f.version()), Some("0.6.2"));
    assert!(lookup("qt4").is_none());
  }

  #[test]
  fn source_includes_mirrors() {
    let source = QT5.source();
    assert_eq!(source.urls().count(), 2);
    assert_eq!(source.sha256, QT5.meta().sha256);
  }

  #[test]
  fn host_dependencies_skip_build_only() {
    assert_eq!(QT5.host_dependencies(), vec!["d-bus", "mysql"]);
    assert_eq!(QTKEYCHAIN.host_dependencies(), vec!["qt5"]);
  }
}

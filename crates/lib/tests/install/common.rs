//! Shared test helpers for install pipeline tests.

use std::fs;
use std::path::{Path, PathBuf};

use cellar_lib::args::{ArgContext, ArgumentList, ArgsError};
use cellar_lib::config::Settings;
use cellar_lib::execute::Resource;
use cellar_lib::fixup::FixupWarning;
use cellar_lib::formula::{BuildStep, Dependency, Formula, FormulaMeta, Patch, SmokeTest};
use cellar_lib::layout::InstallLayout;
use cellar_lib::options::{BuildOptions, DeprecatedOption, OptionSpec};
use cellar_lib::util::hash::hash_bytes;
use tempfile::TempDir;

/// Wraps a real formula but fetches its source (and patches) from disk.
pub struct LocalSource<F> {
  pub inner: F,
  pub source: Resource,
  pub patches: &'static [Patch],
}

impl<F: Formula> Formula for LocalSource<F> {
  fn meta(&self) -> &'static FormulaMeta {
    self.inner.meta()
  }

  fn options(&self) -> &'static [OptionSpec] {
    self.inner.options()
  }

  fn deprecated_options(&self) -> &'static [DeprecatedOption] {
    self.inner.deprecated_options()
  }

  fn dependencies(&self) -> &'static [Dependency] {
    self.inner.dependencies()
  }

  fn patches(&self) -> &'static [Patch] {
    self.patches
  }

  fn configure_args(&self, ctx: &ArgContext<'_>) -> Result<ArgumentList, ArgsError> {
    self.inner.configure_args(ctx)
  }

  fn build_steps(&self, args: &ArgumentList, options: &BuildOptions, source_dir: &Path) -> Vec<BuildStep> {
    self.inner.build_steps(args, options, source_dir)
  }

  fn fixup(&self, layout: &InstallLayout) -> Vec<FixupWarning> {
    self.inner.fixup(layout)
  }

  fn smoke_test(&self, layout: &InstallLayout, scratch: &Path) -> SmokeTest {
    self.inner.smoke_test(layout, scratch)
  }

  fn source(&self) -> Resource {
    self.source.clone()
  }
}

/// Isolated cellar root plus an origin directory to fetch from.
pub struct TestEnv {
  pub temp: TempDir,
  pub settings: Settings,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let settings = Settings::new(temp.path().join("root"), temp.path().join("cache").join("downloads"));
    Self { temp, settings }
  }

  /// Write `content` to the origin directory and describe it as a resource.
  pub fn resource(&self, name: &str, content: &[u8]) -> Resource {
    let path = self.temp.path().join("origin").join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    Resource::new(format!("file://{}", path.display()), hash_bytes(content).0)
  }

  /// A patch whose URL points into the origin directory.
  pub fn patch(&self, name: &str, content: &[u8]) -> Patch {
    let resource = self.resource(name, content);
    Patch {
      url: Box::leak(resource.url.into_boxed_str()),
      sha256: Box::leak(resource.sha256.into_boxed_str()),
      reason: "test patch",
    }
  }

  pub fn local<F: Formula>(&self, inner: F) -> LocalSource<F> {
    LocalSource {
      inner,
      source: self.resource("source.tar.xz", b"fake source archive"),
      patches: &[],
    }
  }

  pub fn downloads_dir(&self) -> PathBuf {
    self.settings.downloads_dir.clone()
  }
}

/// What `make install` of Qt leaves behind, reduced to what fixups touch.
pub fn fake_qt_install(prefix: &Path) {
  for name in ["QtCore", "QtGui"] {
    let headers = prefix.join("lib").join(format!("{name}.framework")).join("Headers");
    fs::create_dir_all(&headers).unwrap();
    fs::write(headers.join(name), "").unwrap();
  }
  fs::create_dir_all(prefix.join("bin").join("Designer.app").join("Contents")).unwrap();
  fs::write(prefix.join("bin").join("qmake"), "").unwrap();
  fs::create_dir_all(prefix.join("mkspecs")).unwrap();
  fs::write(
    prefix.join("mkspecs").join("qconfig.pri"),
    "QT_ARCH = x86_64\n\n# pkgconfig\nPKG_CONFIG_LIBDIR = /usr/local/lib/pkgconfig\n",
  )
  .unwrap();
}

//! QtKeychain, a platform-independent credential storage API for Qt.

use std::path::Path;

use crate::args::{ArgContext, ArgumentList, ArgsError};
use crate::execute::Invocation;
use crate::formula::Formula;
use crate::formula::types::{Bottle, BuildStep, Dependency, FormulaMeta, Phase, SmokeTest};
use crate::layout::InstallLayout;
use crate::options::BuildOptions;

static META: FormulaMeta = FormulaMeta {
  name: "qtkeychain",
  desc: "Platform-independent Qt API for storing passwords securely",
  homepage: "https://github.com/frankosterfeld/qtkeychain",
  version: "0.6.2",
  url: "https://github.com/frankosterfeld/qtkeychain/archive/v0.6.2.tar.gz",
  mirrors: &[],
  sha256: "ae13459234feeeab3a154457319d9b26ee9600973443517c77e055838ebae63c",
  head: Some("https://github.com/frankosterfeld/qtkeychain.git"),
  keg_only: None,
  caveats: None,
};

static DEPENDENCIES: &[Dependency] = &[Dependency::build("cmake"), Dependency::runtime("qt5")];

static BOTTLES: &[Bottle] = &[Bottle {
  root_url: Some("https://link0.net/homebrew"),
  os: "mavericks",
  sha256: "817ef5e3ae0b6b6624dc97f6930e048ab90edce9dee79e150a116e4fb9800865",
  cellar_any: true,
}];

/// Oldest CPU the built library must run on.
const OLDEST_CPU: &str = "core2";

/// Arguments every cmake-based formula passes.
pub fn std_cmake_args(layout: &InstallLayout) -> Vec<String> {
  vec![
    format!("-DCMAKE_INSTALL_PREFIX={}", layout.prefix.display()),
    "-DCMAKE_BUILD_TYPE=Release".to_string(),
    "-DCMAKE_FIND_FRAMEWORK=LAST".to_string(),
    "-DCMAKE_VERBOSE_MAKEFILE=ON".to_string(),
    "-Wno-dev".to_string(),
  ]
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Qtkeychain;

impl Formula for Qtkeychain {
  fn meta(&self) -> &'static FormulaMeta {
    &META
  }

  fn dependencies(&self) -> &'static [Dependency] {
    DEPENDENCIES
  }

  fn bottles(&self) -> &'static [Bottle] {
    BOTTLES
  }

  /// Always builds both architectures. Points cmake at the cellar's Qt when
  /// one is linked; otherwise cmake searches for a system Qt.
  fn configure_args(&self, ctx: &ArgContext<'_>) -> Result<ArgumentList, ArgsError> {
    let mut args = ArgumentList::new();
    args.extend([".", "-DCMAKE_OSX_ARCHITECTURES=x86_64;i386"]);
    if let Some(qt) = ctx.host.dependency("qt5") {
      args.push(format!("-DCMAKE_PREFIX_PATH={}", qt.display()));
    }
    args.extend(std_cmake_args(ctx.layout));
    Ok(args)
  }

  /// Optimization targets the oldest supported CPU rather than the build host.
  fn build_steps(&self, args: &ArgumentList, _options: &BuildOptions, source_dir: &Path) -> Vec<BuildStep> {
    let optflags = format!("-march={}", OLDEST_CPU);
    let tuned = |inv: Invocation| inv.env("CFLAGS", optflags.as_str()).env("CXXFLAGS", optflags.as_str());
    vec![
      BuildStep::new(
        Phase::Configure,
        tuned(Invocation::new("cmake").args(args.as_slice()).cwd(source_dir)),
      ),
      BuildStep::new(
        Phase::Install,
        tuned(Invocation::new("make").arg("install").cwd(source_dir)),
      ),
    ]
  }

  /// There is no tool to run; the public header must be in place.
  fn smoke_test(&self, layout: &InstallLayout, _scratch: &Path) -> SmokeTest {
    SmokeTest::FileExists(layout.include.join("qt5keychain").join("keychain.h"))
  }
}

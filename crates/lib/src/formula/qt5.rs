//! Qt 5, the application framework.

use std::path::Path;

use crate::args::{self, ArgContext, ArgumentList, ArgsError, Rule};
use crate::consts::ORACLE_HOME_ENV;
use crate::execute::Invocation;
use crate::fixup::{self, FixupWarning};
use crate::formula::types::{Bottle, BuildStep, Dependency, FormulaMeta, Patch, Phase, SmokeTest};
use crate::formula::Formula;
use crate::layout::InstallLayout;
use crate::options::{BuildOptions, DeprecatedOption, OptionSpec};
use crate::platform::arch::WordSize;

static META: FormulaMeta = FormulaMeta {
  name: "qt5",
  desc: "Version 5 of the Qt framework",
  homepage: "https://www.qt.io/",
  version: "5.4.2",
  url: "https://download.qt.io/official_releases/qt/5.4/5.4.2/single/qt-everywhere-opensource-src-5.4.2.tar.xz",
  mirrors: &["https://www.mirrorservice.org/sites/download.qt-project.org/official_releases/qt/5.4/5.4.2/single/qt-everywhere-opensource-src-5.4.2.tar.xz"],
  sha256: "8c6d070613b721452f8cffdea6bddc82ce4f32f96703e3af02abb91a59f1ea25",
  head: Some("https://code.qt.io/qt/qt5.git"),
  keg_only: Some("Qt 5 conflicts Qt 4 (which is currently much more widely used)."),
  caveats: Some("We agreed to the Qt opensource license for you.\nIf this is unacceptable you should uninstall."),
};

static OPTIONS: &[OptionSpec] = &[
  OptionSpec::switch("universal", "Build a universal binary"),
  OptionSpec::with("docs", "Build documentation"),
  OptionSpec::with("examples", "Build examples"),
  OptionSpec::with("developer", "Build and link with developer options"),
  OptionSpec::with("oci", "Build with Oracle OCI plugin"),
  OptionSpec::with("d-bus", "Build with D-Bus support"),
  OptionSpec::with("mysql", "Build with MySQL plugin"),
  OptionSpec::without("webengine", "Build without QtWebEngine module"),
];

static DEPRECATED: &[DeprecatedOption] = &[
  DeprecatedOption {
    old: "developer",
    new: "with-developer",
  },
  DeprecatedOption {
    old: "qtdbus",
    new: "with-d-bus",
  },
];

static DEPENDENCIES: &[Dependency] = &[
  Dependency::build("pkg-config"),
  Dependency::build("xcode"),
  Dependency::optional("d-bus"),
  Dependency::optional("mysql"),
];

static PATCHES: &[Patch] = &[
  Patch {
    url: "https://link0.net/qt5.patch",
    sha256: "a0278afefc5e4e950cd2e7403e5c5bd229efadcd52a7f564940573d00bcb0ed2",
    reason: "Local build fixes",
  },
  Patch {
    url: "https://raw.githubusercontent.com/DomT4/scripts/2107043e8/Homebrew_Resources/Qt5/qt5_el_capitan.diff",
    sha256: "bd8fd054247ec730f60778e210d58cba613265e5df04ec93f4110421fb03b14a",
    reason: "Fix build with clang 3.7",
  },
  Patch {
    url: "https://raw.githubusercontent.com/Homebrew/patches/2fcc1f8ec1df1c90785f4fa6632cebac68772fa9/qt5/el-capitan-2.diff",
    sha256: "b8f04efd047eeed7cfd15b029ece20b5fe3c0960b74f7a5cb98bd36475463227",
    reason: "Fix library paths with Xcode 7 for QtWebEngine",
  },
  Patch {
    url: "https://gist.githubusercontent.com/UniqMartin/baf089e326f572150971/raw/1de52d53929bc3472cc7f345c16f068c37c75263/qtbug-47641.patch",
    sha256: "c74c73b2d540788f0be2f1f137d0844feca8f5022a044851366380bf2972ead0",
    reason: "Fix CGEventCreateMouseEvent use with 10.11 SDK",
  },
];

static BOTTLES: &[Bottle] = &[Bottle {
  root_url: Some("https://link0.net/homebrew"),
  os: "mavericks",
  sha256: "787951f01c02c39065f65ad63d203dd003bbd1f54c20daf4dff898781331ceaf",
  cellar_any: false,
}];

/// Compiler and linker flags for a universal build.
const UNIVERSAL_ARCH_FLAGS: &str = "-arch x86_64 -arch i386";

const OCI_MESSAGE: &str = "To use --with-oci you have to set the ORACLE_HOME environment variable.\n\
Check Oracle Instant Client documentation for more information.";

/// Conditional configure flags. Table order is argument order.
static RULES: &[Rule] = &[
  Rule {
    name: "examples",
    when: without_examples,
    emit: skip_examples,
  },
  Rule {
    name: "webengine",
    when: without_webengine,
    emit: skip_webengine,
  },
  Rule {
    name: "mysql",
    when: with_mysql,
    emit: mysql_plugin,
  },
  Rule {
    name: "d-bus",
    when: with_dbus,
    emit: dbus_flags,
  },
  Rule {
    name: "arch",
    when: args::always,
    emit: arch_flags,
  },
  Rule {
    name: "oci",
    when: with_oci,
    emit: oci_flags,
  },
  Rule {
    name: "developer",
    when: with_developer,
    emit: developer_build,
  },
];

fn without_examples(ctx: &ArgContext<'_>) -> bool {
  !ctx.options.is_set("examples")
}

fn skip_examples(_: &ArgContext<'_>) -> Result<Vec<String>, ArgsError> {
  Ok(strings(&["-nomake", "examples"]))
}

fn without_webengine(ctx: &ArgContext<'_>) -> bool {
  !ctx.options.is_set("webengine")
}

fn skip_webengine(_: &ArgContext<'_>) -> Result<Vec<String>, ArgsError> {
  Ok(strings(&["-skip", "qtwebengine"]))
}

fn with_mysql(ctx: &ArgContext<'_>) -> bool {
  ctx.options.is_set("mysql")
}

/// Configure finds the client through `mysql_config`; no prefix is passed.
fn mysql_plugin(_: &ArgContext<'_>) -> Result<Vec<String>, ArgsError> {
  Ok(strings(&["-plugin-sql-mysql"]))
}

fn with_dbus(ctx: &ArgContext<'_>) -> bool {
  ctx.options.is_set("d-bus")
}

fn dbus_flags(ctx: &ArgContext<'_>) -> Result<Vec<String>, ArgsError> {
  let dbus = ctx.require_dependency("d-bus", "d-bus")?;
  Ok(vec![
    format!("-I{}", dbus.join("lib/dbus-1.0/include").display()),
    format!("-I{}", dbus.join("include/dbus-1.0").display()),
    format!("-L{}", dbus.join("lib").display()),
    "-ldbus-1".to_string(),
    "-dbus-linked".to_string(),
  ])
}

/// Universal builds get both architectures, 64-bit first. Otherwise the
/// host's preferred word size picks exactly one.
fn arch_flags(ctx: &ArgContext<'_>) -> Result<Vec<String>, ArgsError> {
  if ctx.options.is_set("universal") {
    return Ok(strings(&["-arch", "x86_64", "-arch", "x86"]));
  }
  Ok(match ctx.host.word_size {
    WordSize::Bits64 => strings(&["-arch", "x86_64"]),
    WordSize::Bits32 => strings(&["-arch", "x86"]),
  })
}

fn with_oci(ctx: &ArgContext<'_>) -> bool {
  ctx.options.is_set("oci")
}

fn oci_flags(ctx: &ArgContext<'_>) -> Result<Vec<String>, ArgsError> {
  let home = ctx.host.oracle_home.as_ref().ok_or_else(|| ArgsError::MissingEnvironment {
    variable: ORACLE_HOME_ENV.to_string(),
    message: OCI_MESSAGE.to_string(),
  })?;
  Ok(vec![
    format!("-I{}", home.join("sdk/include").display()),
    format!("-L{}", home.display()),
    "-plugin-sql-oci".to_string(),
  ])
}

fn with_developer(ctx: &ArgContext<'_>) -> bool {
  ctx.options.is_set("developer")
}

fn developer_build(_: &ArgContext<'_>) -> Result<Vec<String>, ArgsError> {
  Ok(strings(&["-developer-build"]))
}

/// A universal build compiles and links every object for both
/// architectures, not just the ones configure knows about.
fn with_build_env(invocation: Invocation, options: &BuildOptions) -> Invocation {
  if !options.is_set("universal") {
    return invocation;
  }
  ["CFLAGS", "CXXFLAGS", "LDFLAGS"]
    .into_iter()
    .fold(invocation, |inv, var| inv.env(var, UNIVERSAL_ARCH_FLAGS))
}

fn strings(args: &[&str]) -> Vec<String> {
  args.iter().map(|s| s.to_string()).collect()
}

/// Flags every build gets, ahead of the rule table.
fn base_args(layout: &InstallLayout) -> ArgumentList {
  let mut args = ArgumentList::new();
  args.push("-prefix");
  args.push(layout.prefix.display().to_string());
  args.extend([
    "-system-zlib",
    "-qt-libpng",
    "-qt-libjpeg",
    "-confirm-license",
    "-opensource",
    "-nomake",
    "tests",
    "-release",
  ]);
  args
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Qt5;

impl Formula for Qt5 {
  fn meta(&self) -> &'static FormulaMeta {
    &META
  }

  fn options(&self) -> &'static [OptionSpec] {
    OPTIONS
  }

  fn deprecated_options(&self) -> &'static [DeprecatedOption] {
    DEPRECATED
  }

  fn dependencies(&self) -> &'static [Dependency] {
    DEPENDENCIES
  }

  fn patches(&self) -> &'static [Patch] {
    PATCHES
  }

  fn bottles(&self) -> &'static [Bottle] {
    BOTTLES
  }

  fn configure_args(&self, ctx: &ArgContext<'_>) -> Result<ArgumentList, ArgsError> {
    args::compile(base_args(ctx.layout), RULES, ctx)
  }

  fn build_steps(&self, args: &ArgumentList, options: &BuildOptions, source_dir: &Path) -> Vec<BuildStep> {
    let mut steps = vec![
      BuildStep::new(
        Phase::Configure,
        Invocation::new("./configure").args(args.as_slice()).cwd(source_dir),
      ),
      BuildStep::new(Phase::Compile, Invocation::new("make").cwd(source_dir)),
      // Parallel install races on the generated module files.
      BuildStep::new(
        Phase::Install,
        Invocation::new("make").arg("install").env("MAKEFLAGS", "-j1").cwd(source_dir),
      ),
    ];

    if options.is_set("docs") {
      steps.push(BuildStep::new(Phase::Docs, Invocation::new("make").arg("docs").cwd(source_dir)));
      steps.push(BuildStep::new(
        Phase::Docs,
        Invocation::new("make").arg("install_docs").cwd(source_dir),
      ));
    }

    steps
      .into_iter()
      .map(|step| BuildStep::new(step.phase, with_build_env(step.invocation, options)))
      .collect()
  }

  fn fixup(&self, layout: &InstallLayout) -> Vec<FixupWarning> {
    let mut warnings = fixup::link_frameworks(layout);
    warnings.extend(fixup::link_framework_headers(layout));
    warnings.extend(fixup::strip_build_env_file(&layout.qconfig()));
    warnings.extend(fixup::relocate_apps(layout));
    warnings
  }

  fn smoke_test(&self, layout: &InstallLayout, scratch: &Path) -> SmokeTest {
    let qmake = layout.bin.join("qmake");
    SmokeTest::Command(
      Invocation::new(qmake.display().to_string())
        .arg("-project")
        .cwd(scratch),
    )
  }
}

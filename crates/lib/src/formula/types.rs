use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::execute::{Invocation, Resource};

/// Static description of a formula.
#[derive(Debug, Serialize)]
pub struct FormulaMeta {
  pub name: &'static str,
  pub desc: &'static str,
  pub homepage: &'static str,
  pub version: &'static str,
  pub url: &'static str,
  pub mirrors: &'static [&'static str],
  pub sha256: &'static str,
  /// Git URL for development builds. Informational only.
  pub head: Option<&'static str>,
  /// Why the keg should not be linked into the shared prefix, if it shouldn't.
  pub keg_only: Option<&'static str>,
  pub caveats: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
  /// Needed only to build; not consulted for arguments.
  Build,
  /// Used only when the option of the same name is on.
  Optional,
  /// Used when it can be located; the build proceeds without it otherwise.
  Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dependency {
  pub name: &'static str,
  pub kind: DependencyKind,
}

impl Dependency {
  pub const fn build(name: &'static str) -> Self {
    Self {
      name,
      kind: DependencyKind::Build,
    }
  }

  pub const fn optional(name: &'static str) -> Self {
    Self {
      name,
      kind: DependencyKind::Optional,
    }
  }

  pub const fn runtime(name: &'static str) -> Self {
    Self {
      name,
      kind: DependencyKind::Runtime,
    }
  }
}

/// A source patch applied with `patch -p1` after extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Patch {
  pub url: &'static str,
  pub sha256: &'static str,
  pub reason: &'static str,
}

impl Patch {
  pub fn resource(&self) -> Resource {
    Resource::new(self.url, self.sha256)
  }
}

/// A prebuilt binary artifact. Carried as metadata; never poured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bottle {
  pub root_url: Option<&'static str>,
  pub os: &'static str,
  pub sha256: &'static str,
  /// Relocatable into any cellar.
  pub cellar_any: bool,
}

/// Stage of the install pipeline an invocation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  Extract,
  Patch,
  Configure,
  Compile,
  Install,
  Docs,
  Test,
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Extract => "extract",
      Self::Patch => "patch",
      Self::Configure => "configure",
      Self::Compile => "compile",
      Self::Install => "install",
      Self::Docs => "docs",
      Self::Test => "test",
    };
    write!(f, "{}", name)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildStep {
  pub phase: Phase,
  pub invocation: Invocation,
}

impl BuildStep {
  pub fn new(phase: Phase, invocation: Invocation) -> Self {
    Self { phase, invocation }
  }
}

/// How an installed keg is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmokeTest {
  /// Run a command; it must exit zero.
  Command(Invocation),
  /// A file the install must have produced.
  FileExists(PathBuf),
}

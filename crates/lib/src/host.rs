//! Facts about the host that argument construction depends on.
//!
//! [`HostFacts::detect`] is the only place that reads the process
//! environment. Everything downstream takes `&HostFacts`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::consts::ORACLE_HOME_ENV;
use crate::platform::arch::WordSize;

/// Resolves a named dependency to the prefix it is installed under.
pub trait DependencyLocator {
  fn locate(&self, name: &str) -> Option<PathBuf>;
}

/// Finds dependencies through the `opt/<name>` links of a cellar root.
#[derive(Debug, Clone)]
pub struct OptLocator {
  opt_dir: PathBuf,
}

impl OptLocator {
  pub fn new(opt_dir: impl Into<PathBuf>) -> Self {
    Self { opt_dir: opt_dir.into() }
  }
}

impl DependencyLocator for OptLocator {
  fn locate(&self, name: &str) -> Option<PathBuf> {
    let path = self.opt_dir.join(name);
    path.is_dir().then_some(path)
  }
}

/// Environment-derived inputs to the argument builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostFacts {
  pub word_size: WordSize,
  /// Located dependency prefixes, keyed by dependency name.
  pub dependencies: BTreeMap<String, PathBuf>,
  /// Value of `ORACLE_HOME`, if set.
  pub oracle_home: Option<PathBuf>,
}

impl HostFacts {
  pub fn new(word_size: WordSize) -> Self {
    Self {
      word_size,
      dependencies: BTreeMap::new(),
      oracle_home: None,
    }
  }

  /// Gather host facts for a build that may use `dependencies`.
  pub fn detect<'a>(locator: &impl DependencyLocator, dependencies: impl IntoIterator<Item = &'a str>) -> Self {
    let mut facts = Self::new(WordSize::current());

    for name in dependencies {
      match locator.locate(name) {
        Some(prefix) => {
          debug!(dependency = %name, prefix = %prefix.display(), "located dependency");
          facts.dependencies.insert(name.to_string(), prefix);
        }
        None => debug!(dependency = %name, "dependency not found"),
      }
    }

    facts.oracle_home = std::env::var_os(ORACLE_HOME_ENV)
      .filter(|v| !v.is_empty())
      .map(PathBuf::from);

    facts
  }

  pub fn with_dependency(mut self, name: &str, prefix: impl Into<PathBuf>) -> Self {
    self.dependencies.insert(name.to_string(), prefix.into());
    self
  }

  pub fn with_oracle_home(mut self, path: impl Into<PathBuf>) -> Self {
    self.oracle_home = Some(path.into());
    self
  }

  pub fn dependency(&self, name: &str) -> Option<&Path> {
    self.dependencies.get(name).map(PathBuf::as_path)
  }
}

//! Option-to-argument compilation.
//!
//! A formula's configure arguments are a fixed base followed by the output
//! of a table of [`Rule`]s, evaluated in table order. Each rule pairs a
//! predicate with the flags it contributes, so ordering is visible in one
//! place and each rule can be tested on its own.
//!
//! Compilation is pure: it reads only the [`ArgContext`] it is given.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::host::HostFacts;
use crate::layout::InstallLayout;
use crate::options::BuildOptions;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgsError {
  /// An option needs an environment variable that is not set.
  #[error("{variable} is not set\n{message}")]
  MissingEnvironment { variable: String, message: String },

  /// An option needs a dependency that could not be located.
  #[error("option `{option}` requires `{dependency}`, which is not installed")]
  MissingDependency { option: String, dependency: String },
}

/// Ordered arguments for an external configure tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArgumentList(Vec<String>);

impl ArgumentList {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, arg: impl Into<String>) {
    self.0.push(arg.into());
  }

  pub fn extend<I, S>(&mut self, args: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.0.extend(args.into_iter().map(Into::into));
  }

  pub fn as_slice(&self) -> &[String] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Number of times `arg` appears.
  pub fn count(&self, arg: &str) -> usize {
    self.0.iter().filter(|a| *a == arg).count()
  }

  pub fn into_vec(self) -> Vec<String> {
    self.0
  }
}

impl<S: Into<String>> FromIterator<S> for ArgumentList {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self(iter.into_iter().map(Into::into).collect())
  }
}

impl fmt::Display for ArgumentList {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.join(" "))
  }
}

/// Everything a rule may consult.
#[derive(Debug, Clone, Copy)]
pub struct ArgContext<'a> {
  pub options: &'a BuildOptions,
  pub host: &'a HostFacts,
  pub layout: &'a InstallLayout,
}

impl ArgContext<'_> {
  /// Prefix of a dependency an enabled option relies on.
  pub fn require_dependency(&self, option: &str, dependency: &str) -> Result<PathBuf, ArgsError> {
    self
      .host
      .dependency(dependency)
      .map(|p| p.to_path_buf())
      .ok_or_else(|| ArgsError::MissingDependency {
        option: option.to_string(),
        dependency: dependency.to_string(),
      })
  }
}

/// One row of a formula's argument table.
pub struct Rule {
  pub name: &'static str,
  pub when: fn(&ArgContext<'_>) -> bool,
  pub emit: fn(&ArgContext<'_>) -> Result<Vec<String>, ArgsError>,
}

impl fmt::Debug for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Rule").field("name", &self.name).finish()
  }
}

/// Predicate for rules that always contribute.
pub fn always(_: &ArgContext<'_>) -> bool {
  true
}

/// Append the output of every applicable rule to `base`, in table order.
pub fn compile(base: ArgumentList, rules: &[Rule], ctx: &ArgContext<'_>) -> Result<ArgumentList, ArgsError> {
  let mut args = base;
  for rule in rules {
    if (rule.when)(ctx) {
      args.extend((rule.emit)(ctx)?);
    }
  }
  Ok(args)
}

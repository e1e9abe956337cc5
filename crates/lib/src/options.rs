//! Build options selected by the invoker.
//!
//! A formula declares its options as [`OptionSpec`]s. The invoker's flags
//! (`--with-docs`, `--without-webengine`, `--universal`, ...) are resolved
//! against those specs once, producing an immutable [`BuildOptions`].

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// How an option is spelled on the command line and what it defaults to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionStyle {
  /// Off by default, enabled with `--with-<name>`.
  With,
  /// On by default, disabled with `--without-<name>`.
  Without,
  /// Off by default, enabled with `--<name>`.
  Switch,
}

/// A named option a formula accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionSpec {
  pub name: &'static str,
  pub description: &'static str,
  pub style: OptionStyle,
}

impl OptionSpec {
  pub const fn with(name: &'static str, description: &'static str) -> Self {
    Self {
      name,
      description,
      style: OptionStyle::With,
    }
  }

  pub const fn without(name: &'static str, description: &'static str) -> Self {
    Self {
      name,
      description,
      style: OptionStyle::Without,
    }
  }

  pub const fn switch(name: &'static str, description: &'static str) -> Self {
    Self {
      name,
      description,
      style: OptionStyle::Switch,
    }
  }

  pub fn default_value(&self) -> bool {
    matches!(self.style, OptionStyle::Without)
  }

  /// The flag that flips this option away from its default.
  pub fn flag(&self) -> String {
    match self.style {
      OptionStyle::With => format!("--with-{}", self.name),
      OptionStyle::Without => format!("--without-{}", self.name),
      OptionStyle::Switch => format!("--{}", self.name),
    }
  }
}

/// An old flag spelling that is rewritten before lookup, e.g. `developer` to
/// `with-developer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeprecatedOption {
  pub old: &'static str,
  pub new: &'static str,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionError {
  #[error("unknown option: {flag}")]
  Unknown { flag: String },

  #[error("options must start with `--`: {flag}")]
  Malformed { flag: String },
}

/// The resolved value of every option a formula declares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuildOptions {
  values: BTreeMap<String, bool>,
}

impl BuildOptions {
  /// Every declared option at its default value.
  pub fn defaults(specs: &[OptionSpec]) -> Self {
    Self {
      values: specs.iter().map(|s| (s.name.to_string(), s.default_value())).collect(),
    }
  }

  /// Resolve command-line flags against the declared options.
  ///
  /// Deprecated spellings are rewritten first. Both polarities are accepted
  /// for `with`/`without` options, so `--with-webengine` is a valid no-op.
  pub fn parse<S: AsRef<str>>(
    specs: &[OptionSpec],
    deprecated: &[DeprecatedOption],
    flags: &[S],
  ) -> Result<Self, OptionError> {
    let mut options = Self::defaults(specs);

    for flag in flags {
      let flag = flag.as_ref();
      let Some(raw) = flag.strip_prefix("--") else {
        return Err(OptionError::Malformed { flag: flag.to_string() });
      };

      let name = deprecated.iter().find(|d| d.old == raw).map(|d| d.new).unwrap_or(raw);

      let (option, value) = if let Some(rest) = name.strip_prefix("with-") {
        (rest, true)
      } else if let Some(rest) = name.strip_prefix("without-") {
        (rest, false)
      } else {
        (name, true)
      };

      let spec = specs.iter().find(|s| {
        s.name == option
          && match s.style {
            OptionStyle::Switch => option == name,
            OptionStyle::With | OptionStyle::Without => option != name,
          }
      });

      match spec {
        Some(spec) => {
          options.values.insert(spec.name.to_string(), value);
        }
        None => return Err(OptionError::Unknown { flag: flag.to_string() }),
      }
    }

    Ok(options)
  }

  /// Return a copy with `name` set to `value`.
  pub fn set(mut self, name: &str, value: bool) -> Self {
    self.values.insert(name.to_string(), value);
    self
  }

  /// Whether the option is on. Undeclared options are off.
  pub fn is_set(&self, name: &str) -> bool {
    self.values.get(name).copied().unwrap_or(false)
  }

  /// Names of the options that are on, in name order.
  pub fn enabled(&self) -> impl Iterator<Item = &str> {
    self.values.iter().filter(|(_, v)| **v).map(|(k, _)| k.as_str())
  }
}

impl fmt::Display for BuildOptions {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let enabled: Vec<&str> = self.enabled().collect();
    if enabled.is_empty() {
      write!(f, "(none)")
    } else {
      write!(f, "{}", enabled.join(", "))
    }
  }
}

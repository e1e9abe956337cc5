//! Types for running external tools and fetching resources.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// One external command: program, arguments, working directory and extra
/// environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: Option<PathBuf>,
  pub env: BTreeMap<String, String>,
}

impl Invocation {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
      env: BTreeMap::new(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
    self.cwd = Some(cwd.as_ref().to_path_buf());
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.insert(key.into(), value.into());
    self
  }

  /// The command line as a single string, for logs and error messages.
  pub fn command_line(&self) -> String {
    std::iter::once(self.program.as_str())
      .chain(self.args.iter().map(String::as_str))
      .collect::<Vec<_>>()
      .join(" ")
  }
}

impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.command_line())
  }
}

/// Captured output of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
  pub stdout: String,
  pub stderr: String,
}

/// Errors from running an external tool.
#[derive(Debug, Error)]
pub enum ToolError {
  /// The tool ran and exited unsuccessfully. Carries its output verbatim.
  #[error("`{command}` failed with exit code {}{}", display_code(.code), diagnostics(.stdout, .stderr))]
  Failed {
    command: String,
    code: Option<i32>,
    stdout: String,
    stderr: String,
  },

  /// The tool could not be started at all.
  #[error("failed to run `{command}`: {source}")]
  Spawn {
    command: String,
    #[source]
    source: std::io::Error,
  },
}

fn display_code(code: &Option<i32>) -> String {
  match code {
    Some(code) => code.to_string(),
    None => "none (terminated by signal)".to_string(),
  }
}

fn diagnostics(stdout: &str, stderr: &str) -> String {
  let mut out = String::new();
  if !stdout.trim().is_empty() {
    out.push_str("\n--- stdout ---\n");
    out.push_str(stdout.trim_end());
  }
  if !stderr.trim().is_empty() {
    out.push_str("\n--- stderr ---\n");
    out.push_str(stderr.trim_end());
  }
  out
}

/// Errors from fetching a source archive or patch.
#[derive(Debug, Error)]
pub enum FetchError {
  /// Downloaded bytes do not match the declared SHA-256.
  #[error("checksum mismatch for {url}: expected {expected}, got {actual}")]
  Integrity {
    url: String,
    expected: String,
    actual: String,
  },

  /// Every URL for the resource failed to download.
  #[error("download failed for {url}: {message}")]
  Download { url: String, message: String },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn command_line_joins_program_and_args() {
    let inv = Invocation::new("make").arg("install").env("MAKEFLAGS", "-j1");
    assert_eq!(inv.command_line(), "make install");
    assert_eq!(inv.env.get("MAKEFLAGS").map(String::as_str), Some("-j1"));
  }

  #[test]
  fn failed_error_includes_diagnostics_verbatim() {
    let err = ToolError::Failed {
      command: "./configure -release".to_string(),
      code: Some(2),
      stdout: "checking for zlib... no\n".to_string(),
      stderr: "ERROR: zlib not found\n".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.starts_with("`./configure -release` failed with exit code 2"));
    assert!(msg.contains("checking for zlib... no"));
    assert!(msg.contains("ERROR: zlib not found"));
  }

  #[test]
  fn failed_error_without_output_is_one_line() {
    let err = ToolError::Failed {
      command: "false".to_string(),
      code: None,
      stdout: String::new(),
      stderr: String::new(),
    };
    assert_eq!(err.to_string(), "`false` failed with exit code none (terminated by signal)");
  }
}

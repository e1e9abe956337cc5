//! Types for the install pipeline.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::args::{ArgumentList, ArgsError};
use crate::execute::{FetchError, ToolError};
use crate::fixup::FixupWarning;
use crate::formula::{Formula, Phase};
use crate::host::HostFacts;
use crate::layout::InstallLayout;
use crate::options::{BuildOptions, OptionError};

/// Errors that abort an install. Nothing is rolled back.
#[derive(Debug, Error)]
pub enum InstallError {
  #[error(transparent)]
  Options(#[from] OptionError),

  #[error(transparent)]
  Args(#[from] ArgsError),

  #[error(transparent)]
  Fetch(#[from] FetchError),

  /// An external step exited unsuccessfully; remaining steps were not run.
  #[error("{phase} step failed")]
  Tool {
    phase: Phase,
    #[source]
    source: ToolError,
  },

  #[error("smoke test failed: {0}")]
  SmokeTestFailed(String),

  #[error("{name} {version} is not installed (expected {})", prefix.display())]
  NotInstalled {
    name: String,
    version: String,
    prefix: PathBuf,
  },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Inputs of one install. Resolved once at the invocation boundary.
pub struct InstallRequest<'a> {
  pub formula: &'a dyn Formula,
  pub options: BuildOptions,
  pub host: HostFacts,
  pub skip_test: bool,
}

/// An external invocation that ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
  pub phase: Phase,
  pub command: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokeOutcome {
  Passed,
  Skipped,
}

/// Summary of a completed install.
#[derive(Debug, Serialize)]
pub struct InstallReport {
  pub formula: String,
  pub version: String,
  pub options: BuildOptions,
  pub arguments: ArgumentList,
  pub layout: InstallLayout,
  pub steps: Vec<StepRecord>,
  pub warnings: Vec<FixupWarning>,
  pub smoke_test: SmokeOutcome,
  pub caveats: Option<String>,
  pub elapsed_ms: u64,
}

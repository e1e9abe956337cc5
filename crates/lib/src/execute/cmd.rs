//! Running external build tools.
//!
//! Every external step (extract, patch, configure, compile, install, docs,
//! smoke test) goes through a [`Toolchain`], so the install pipeline can be
//! exercised without spawning real processes.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::consts::SOURCE_DATE_EPOCH;
use crate::execute::types::{Invocation, ToolError, ToolOutput};

/// Runs invocations, one at a time, in the order they are given.
#[allow(async_fn_in_trait)]
pub trait Toolchain {
  /// Run one invocation to completion. A non-zero exit status is an error.
  async fn run(&self, invocation: &Invocation) -> Result<ToolOutput, ToolError>;
}

/// Spawns real processes.
///
/// Invocations inherit the caller's environment (build tools need `PATH`,
/// compilers and SDK variables) with these overrides:
/// - `LANG`/`LC_ALL` set to `C`
/// - `SOURCE_DATE_EPOCH` set for reproducible timestamps
/// - the invocation's own `env` entries, applied last
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessToolchain;

impl Toolchain for ProcessToolchain {
  async fn run(&self, invocation: &Invocation) -> Result<ToolOutput, ToolError> {
    let command_line = invocation.command_line();
    info!(cmd = %command_line, "executing command");

    let mut command = Command::new(&invocation.program);
    command
      .args(&invocation.args)
      .stdin(Stdio::null())
      .env("LANG", "C")
      .env("LC_ALL", "C")
      .env("SOURCE_DATE_EPOCH", SOURCE_DATE_EPOCH)
      .envs(&invocation.env);

    if let Some(cwd) = &invocation.cwd {
      command.current_dir(cwd);
    }

    debug!(program = %invocation.program, cwd = ?invocation.cwd, "spawning process");

    let output = command.output().await.map_err(|source| ToolError::Spawn {
      command: command_line.clone(),
      source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
      if !stderr.is_empty() {
        debug!(stderr = %stderr, "command stderr");
      }
      if !stdout.is_empty() {
        debug!(stdout = %stdout, "command stdout");
      }

      return Err(ToolError::Failed {
        command: command_line,
        code: output.status.code(),
        stdout,
        stderr,
      });
    }

    if !stdout.is_empty() {
      debug!(stdout = %stdout.trim_end(), "command output");
    }

    Ok(ToolOutput { stdout, stderr })
  }
}

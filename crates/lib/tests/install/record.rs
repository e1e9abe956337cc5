//! A toolchain that records invocations instead of spawning processes.

use std::sync::Mutex;

use cellar_lib::execute::{Invocation, ToolError, ToolOutput, Toolchain};

type Hook = Box<dyn Fn(&Invocation) -> Result<(), ToolError> + Send + Sync>;

/// Records every invocation it is asked to run. An optional hook sees each
/// invocation first and may fake its side effects or fail it.
#[derive(Default)]
pub struct RecordingToolchain {
  invocations: Mutex<Vec<Invocation>>,
  hook: Option<Hook>,
}

impl RecordingToolchain {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_hook(hook: impl Fn(&Invocation) -> Result<(), ToolError> + Send + Sync + 'static) -> Self {
    Self {
      invocations: Mutex::new(Vec::new()),
      hook: Some(Box::new(hook)),
    }
  }

  pub fn invocations(&self) -> Vec<Invocation> {
    self.invocations.lock().unwrap().clone()
  }

  /// Command lines of the recorded invocations, in order.
  pub fn command_lines(&self) -> Vec<String> {
    self.invocations().iter().map(Invocation::command_line).collect()
  }
}

impl Toolchain for RecordingToolchain {
  async fn run(&self, invocation: &Invocation) -> Result<ToolOutput, ToolError> {
    self.invocations.lock().unwrap().push(invocation.clone());
    if let Some(hook) = &self.hook {
      hook(invocation)?;
    }
    Ok(ToolOutput::default())
  }
}

/// Hook result for a failed tool.
pub fn tool_failure(invocation: &Invocation, code: i32, stderr: &str) -> ToolError {
  ToolError::Failed {
    command: invocation.command_line(),
    code: Some(code),
    stdout: String::new(),
    stderr: stderr.to_string(),
  }
}

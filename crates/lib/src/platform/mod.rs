pub mod arch;
pub mod paths;

use std::fmt;

use arch::{Arch, WordSize};

/// Host description shown by `cellar info` and `cellar install`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
  pub arch: Option<Arch>,
  pub word_size: WordSize,
}

impl Platform {
  /// Detect the current platform at runtime
  pub fn current() -> Self {
    Self {
      arch: Arch::current(),
      word_size: WordSize::current(),
    }
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.arch {
      Some(arch) => write!(f, "{}-{} ({})", arch, std::env::consts::OS, self.word_size),
      None => write!(f, "unknown-{} ({})", std::env::consts::OS, self.word_size),
    }
  }
}

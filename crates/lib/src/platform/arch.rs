use std::fmt;

use serde::{Deserialize, Serialize};

/// CPU architecture variants cellar can build for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
  X86,
  X86_64,
  Aarch64,
}

impl Arch {
  /// Detect the current CPU architecture at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86" => Some(Self::X86),
      "x86_64" => Some(Self::X86_64),
      "aarch64" => Some(Self::Aarch64),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86 => "x86",
      Self::X86_64 => "x86_64",
      Self::Aarch64 => "aarch64",
    }
  }

  pub fn word_size(&self) -> WordSize {
    match self {
      Self::X86 => WordSize::Bits32,
      Self::X86_64 | Self::Aarch64 => WordSize::Bits64,
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// The host's preferred word size, which decides the single `-arch` flag of a
/// non-universal build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WordSize {
  #[serde(rename = "32")]
  Bits32,
  #[serde(rename = "64")]
  Bits64,
}

impl WordSize {
  /// Word size of the running process, falling back to pointer width when the
  /// architecture is not one we name.
  pub fn current() -> Self {
    match Arch::current() {
      Some(arch) => arch.word_size(),
      None if cfg!(target_pointer_width = "32") => Self::Bits32,
      None => Self::Bits64,
    }
  }

  pub fn bits(&self) -> u8 {
    match self {
      Self::Bits32 => 32,
      Self::Bits64 => 64,
    }
  }
}

impl fmt::Display for WordSize {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-bit", self.bits())
  }
}

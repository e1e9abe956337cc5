//! Post-install filesystem fixups.
//!
//! These run after the external install step has succeeded and normalize the
//! keg for downstream consumers. None of them is fatal: every failure becomes
//! a [`FixupWarning`], and every step is safe to run again on the same tree.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::layout::InstallLayout;

/// Marker comment that introduces build-environment leftovers in `qconfig.pri`.
const PKG_CONFIG_MARKER: &str = "# pkgconfig";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixupStep {
  LinkFramework,
  LinkHeaders,
  EditConfig,
  RelocateApp,
  LinkOpt,
}

impl fmt::Display for FixupStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::LinkFramework => "link framework",
      Self::LinkHeaders => "link headers",
      Self::EditConfig => "edit config",
      Self::RelocateApp => "relocate app",
      Self::LinkOpt => "link opt",
    };
    write!(f, "{}", name)
  }
}

/// A cosmetic post-install step that did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixupWarning {
  pub step: FixupStep,
  pub path: PathBuf,
  pub message: String,
}

impl FixupWarning {
  fn new(step: FixupStep, path: &Path, message: impl Into<String>) -> Self {
    let warning = Self {
      step,
      path: path.to_path_buf(),
      message: message.into(),
    };
    warn!(step = %warning.step, path = %warning.path.display(), "{}", warning.message);
    warning
  }
}

impl fmt::Display for FixupWarning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}: {}", self.step, self.path.display(), self.message)
  }
}

/// What [`ensure_symlink`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
  Created,
  Replaced,
  Unchanged,
}

/// Point `link` at `target`.
///
/// A link that already points at `target` is left alone; a link pointing
/// elsewhere is replaced. A real file or directory at `link` is an error.
pub fn ensure_symlink(target: &Path, link: &Path) -> io::Result<LinkOutcome> {
  if let Some(parent) = link.parent() {
    fs::create_dir_all(parent)?;
  }

  let outcome = match fs::symlink_metadata(link) {
    Ok(meta) if meta.file_type().is_symlink() => {
      if fs::read_link(link)? == target {
        return Ok(LinkOutcome::Unchanged);
      }
      fs::remove_file(link)?;
      LinkOutcome::Replaced
    }
    Ok(_) => {
      return Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("{} exists and is not a symlink", link.display()),
      ));
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => LinkOutcome::Created,
    Err(e) => return Err(e),
  };

  symlink(target, link)?;
  Ok(outcome)
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
  std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
  std::os::windows::fs::symlink_dir(target, link)
}

/// Direct children of `dir` whose names end in `.<extension>`, sorted by name.
/// A missing directory has no children.
fn bundles(dir: &Path, extension: &str) -> Vec<PathBuf> {
  if !dir.is_dir() {
    debug!(dir = %dir.display(), "directory absent, nothing to enumerate");
    return Vec::new();
  }

  WalkDir::new(dir)
    .min_depth(1)
    .max_depth(1)
    .sort_by_file_name()
    .into_iter()
    .filter_map(Result::ok)
    .map(|entry| entry.into_path())
    .filter(|path| path.extension().is_some_and(|ext| ext == extension))
    .collect()
}

fn file_name(path: &Path) -> String {
  path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default()
}

fn stem(path: &Path) -> String {
  path
    .file_stem()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default()
}

/// Link every `lib/*.framework` bundle into `Frameworks/`.
pub fn link_frameworks(layout: &InstallLayout) -> Vec<FixupWarning> {
  let mut warnings = Vec::new();

  for bundle in bundles(&layout.lib, "framework") {
    if !bundle.exists() {
      warnings.push(FixupWarning::new(FixupStep::LinkFramework, &bundle, "link target is missing"));
      continue;
    }

    let link = layout.frameworks.join(file_name(&bundle));
    match ensure_symlink(&bundle, &link) {
      Ok(outcome) => debug!(link = %link.display(), ?outcome, "framework linked"),
      Err(e) => warnings.push(FixupWarning::new(FixupStep::LinkFramework, &link, e.to_string())),
    }
  }

  warnings
}

/// Link each framework's `Headers` directory into `include/<name>`, where
/// `<name>` is the bundle name without `.framework`.
pub fn link_framework_headers(layout: &InstallLayout) -> Vec<FixupWarning> {
  let mut warnings = Vec::new();

  for bundle in bundles(&layout.lib, "framework") {
    let headers = bundle.join("Headers");
    if !headers.is_dir() {
      debug!(bundle = %bundle.display(), "framework has no headers");
      continue;
    }

    let link = layout.include.join(stem(&bundle));
    match ensure_symlink(&headers, &link) {
      Ok(outcome) => debug!(link = %link.display(), ?outcome, "headers linked"),
      Err(e) => warnings.push(FixupWarning::new(FixupStep::LinkHeaders, &link, e.to_string())),
    }
  }

  warnings
}

fn is_pkg_config_assignment(line: &str) -> bool {
  let line = line.trim_start();
  line.starts_with("PKG_CONFIG_") && line.contains('=')
}

/// Remove the `# pkgconfig` block from generated qmake configuration.
///
/// Drops the marker line, one blank line directly before it, and every
/// directly following `PKG_CONFIG_* = ...` line. Returns `None` when there is
/// no marker, so a second pass is a no-op.
pub fn strip_build_env(text: &str) -> Option<String> {
  let lines: Vec<&str> = text.split('\n').collect();
  let marker = lines.iter().position(|l| l.trim_end() == PKG_CONFIG_MARKER)?;

  let mut end = marker + 1;
  while end < lines.len() && is_pkg_config_assignment(lines[end]) {
    end += 1;
  }

  let mut start = marker;
  if start > 0 && lines[start - 1].trim().is_empty() {
    start -= 1;
  }

  let mut kept = lines[..start].to_vec();
  kept.extend_from_slice(&lines[end..]);
  Some(kept.join("\n"))
}

/// Apply [`strip_build_env`] to a file in place.
pub fn strip_build_env_file(path: &Path) -> Vec<FixupWarning> {
  let text = match fs::read_to_string(path) {
    Ok(text) => text,
    Err(e) => return vec![FixupWarning::new(FixupStep::EditConfig, path, e.to_string())],
  };

  match strip_build_env(&text) {
    Some(stripped) => match fs::write(path, stripped) {
      Ok(()) => {
        info!(path = %path.display(), "removed build environment from config");
        Vec::new()
      }
      Err(e) => vec![FixupWarning::new(FixupStep::EditConfig, path, e.to_string())],
    },
    None => {
      debug!(path = %path.display(), "no build environment marker");
      Vec::new()
    }
  }
}

/// Move every `bin/*.app` bundle to the top of the prefix, replacing an
/// older bundle of the same name.
pub fn relocate_apps(layout: &InstallLayout) -> Vec<FixupWarning> {
  let mut warnings = Vec::new();

  for app in bundles(&layout.bin, "app") {
    let dest = layout.prefix.join(file_name(&app));

    let result = (|| -> io::Result<()> {
      if fs::symlink_metadata(&dest).is_ok() {
        if dest.is_dir() {
          fs::remove_dir_all(&dest)?;
        } else {
          fs::remove_file(&dest)?;
        }
      }
      fs::rename(&app, &dest)
    })();

    match result {
      Ok(()) => debug!(from = %app.display(), to = %dest.display(), "app relocated"),
      Err(e) => warnings.push(FixupWarning::new(FixupStep::RelocateApp, &app, e.to_string())),
    }
  }

  warnings
}

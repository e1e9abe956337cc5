mod args;
mod fixup;
mod info;
mod install;
mod list;

pub use args::cmd_args;
pub use fixup::cmd_fixup;
pub use info::cmd_info;
pub use install::cmd_install;
pub use list::cmd_list;
pub use test::cmd_test;

use anyhow::{Context, Result, anyhow, bail};
use tracing::debug;

use cellar_lib::config::Settings;
use cellar_lib::fixup::FixupWarning;
use cellar_lib::formula::{self, Formula};
use cellar_lib::host::{HostFacts, OptLocator};
use cellar_lib::options::BuildOptions;

use crate::output::print_warning;

fn find_formula(name: &str) -> Result<&'static dyn Formula> {
  formula::lookup(name).ok_or_else(|| {
    let known: Vec<&str> = formula::all().iter().map(|f| f.name()).collect();
    anyhow!("No available formula '{}' (known: {})", name, known.join(", "))
  })
}

/// cellar's own flags; everything after the formula name is a formula option.
const CLI_FLAGS: &[&str] = &["--output", "-o", "--verbose", "-v", "--skip-test"];

/// Parse formula options, rejecting cellar flags given after the formula name.
fn parse_options(formula: &dyn Formula, flags: &[String]) -> Result<BuildOptions> {
  let misplaced = flags
    .iter()
    .find(|f| CLI_FLAGS.contains(&f.split_once('=').map_or(f.as_str(), |(name, _)| name)));
  if let Some(flag) = misplaced {
    bail!(
      "`{}` is a cellar flag and must come before the formula name `{}`",
      flag,
      formula.name()
    );
  }
  Ok(formula.parse_options(flags)?)
}

/// Host facts for `formula`, with its dependencies looked up under `opt/`.
fn detect_host(formula: &dyn Formula, settings: &Settings) -> HostFacts {
  let host = HostFacts::detect(&OptLocator::new(settings.opt_dir()), formula.host_dependencies());
  debug!(formula = %formula.name(), ?host, "detected host");
  host
}

fn runtime() -> Result<tokio::runtime::Runtime> {
  tokio::runtime::Runtime::new().context("Failed to create async runtime")
}

fn print_warnings(warnings: &[FixupWarning]) {
  for warning in warnings {
    print_warning(&warning.to_string());
  }
}

use anyhow::{Context, Result};

use cellar_lib::config::Settings;
use cellar_lib::install;

use super::{find_formula, print_warnings};
use crate::output::{OutputFormat, print_json, print_success};

pub fn cmd_fixup(name: &str, output: OutputFormat) -> Result<()> {
  let formula = find_formula(name)?;
  let settings = Settings::from_env();

  let warnings = install::fixup_keg(formula, &settings).with_context(|| format!("Cannot fix up {}", formula.name()))?;

  if output.is_json() {
    print_json(&warnings)?;
  } else {
    print_warnings(&warnings);
    print_success(&format!("Fixed up {} ({} warning(s))", formula.name(), warnings.len()));
  }

  Ok(())
}

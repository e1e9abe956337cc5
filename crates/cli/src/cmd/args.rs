//! Implementation of the `cellar args` command.
//!
//! Compiles the configure arguments without fetching or running anything.

use anyhow::{Context, Result};
use serde::Serialize;

use cellar_lib::args::ArgumentList;
use cellar_lib::config::Settings;
use cellar_lib::install;
use cellar_lib::options::BuildOptions;

use super::{detect_host, find_formula, parse_options};
use crate::output::{OutputFormat, print_json};

#[derive(Serialize)]
struct ArgsOutput<'a> {
  formula: &'a str,
  options: &'a BuildOptions,
  arguments: &'a ArgumentList,
}

pub fn cmd_args(name: &str, flags: &[String], output: OutputFormat) -> Result<()> {
  let formula = find_formula(name)?;
  let options = parse_options(formula, flags)?;

  let settings = Settings::from_env();
  let host = detect_host(formula, &settings);
  let arguments = install::plan(formula, &options, &host, &settings)
    .with_context(|| format!("Cannot configure {}", formula.name()))?;

  if output.is_json() {
    print_json(&ArgsOutput {
      formula: formula.name(),
      options: &options,
      arguments: &arguments,
    })?;
  } else {
    println!("{}", arguments);
  }

  Ok(())
}

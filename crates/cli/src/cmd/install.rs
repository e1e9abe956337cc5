//! Implementation of the `cellar install` command.

use std::time::Duration;

use anyhow::{Context, Result};

use cellar_lib::config::Settings;
use cellar_lib::execute::ProcessToolchain;
use cellar_lib::install::{self, InstallRequest, SmokeOutcome};
use cellar_lib::platform::Platform;

use super::{detect_host, find_formula, parse_options, print_warnings, runtime};
use crate::output::{OutputFormat, format_duration, print_info, print_json, print_stat, print_success};

/// Execute the install command.
///
/// Arguments are compiled before anything is fetched, so a bad option
/// combination fails without touching the cellar.
pub fn cmd_install(name: &str, flags: &[String], skip_test: bool, output: OutputFormat) -> Result<()> {
  let formula = find_formula(name)?;
  let options = parse_options(formula, flags)?;

  let settings = Settings::from_env();
  let request = InstallRequest {
    formula,
    options,
    host: detect_host(formula, &settings),
    skip_test,
  };

  let rt = runtime()?;
  let report = rt
    .block_on(install::install(&request, &settings, &ProcessToolchain))
    .with_context(|| format!("Failed to install {}", formula.name()))?;

  if output.is_json() {
    return print_json(&report);
  }

  print_warnings(&report.warnings);
  println!();
  print_success(&format!("Installed {} {}", report.formula, report.version));
  print_stat("Prefix", &report.layout.prefix.display().to_string());
  print_stat("Host", &Platform::current().to_string());
  print_stat("Options", &report.options.to_string());
  print_stat("Steps", &report.steps.len().to_string());
  print_stat("Warnings", &report.warnings.len().to_string());
  let smoke = match report.smoke_test {
    SmokeOutcome::Passed => "passed",
    SmokeOutcome::Skipped => "skipped",
  };
  print_stat("Smoke test", smoke);
  print_stat("Duration", &format_duration(Duration::from_millis(report.elapsed_ms)));

  if let Some(caveats) = &report.caveats {
    println!();
    print_info("Caveats:");
    println!("{}", caveats);
  }

  Ok(())
}

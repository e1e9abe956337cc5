//! Implementation of the `cellar info` command.

use anyhow::Result;
use serde::Serialize;

use cellar_lib::formula::{Bottle, Dependency, FormulaMeta, Patch};
use cellar_lib::options::{DeprecatedOption, OptionSpec};
use cellar_lib::platform::Platform;

use super::find_formula;
use crate::output::{OutputFormat, print_info, print_json, print_stat, symbols, truncate_hash};

#[derive(Serialize)]
struct FormulaInfo {
  #[serde(flatten)]
  meta: &'static FormulaMeta,
  options: Vec<OptionInfo>,
  deprecated_options: &'static [DeprecatedOption],
  dependencies: &'static [Dependency],
  patches: &'static [Patch],
  bottles: &'static [Bottle],
}

#[derive(Serialize)]
struct OptionInfo {
  flag: String,
  description: &'static str,
}

impl From<&OptionSpec> for OptionInfo {
  fn from(spec: &OptionSpec) -> Self {
    Self {
      flag: spec.flag(),
      description: spec.description,
    }
  }
}

pub fn cmd_info(name: &str, output: OutputFormat) -> Result<()> {
  let formula = find_formula(name)?;
  let info = FormulaInfo {
    meta: formula.meta(),
    options: formula.options().iter().map(OptionInfo::from).collect(),
    deprecated_options: formula.deprecated_options(),
    dependencies: formula.dependencies(),
    patches: formula.patches(),
    bottles: formula.bottles(),
  };

  if output.is_json() {
    return print_json(&info);
  }

  let meta = info.meta;
  println!("{} {}: {}", meta.name, meta.version, meta.desc);
  print_stat("Homepage", meta.homepage);
  print_stat("Source", meta.url);
  for mirror in meta.mirrors {
    print_stat("Mirror", mirror);
  }
  print_stat("SHA-256", meta.sha256);
  if let Some(head) = meta.head {
    print_stat("Head", head);
  }
  if let Some(reason) = meta.keg_only {
    print_stat("Keg-only", reason);
  }
  print_stat("Host", &Platform::current().to_string());

  if !info.dependencies.is_empty() {
    println!();
    println!("Dependencies:");
    for dep in info.dependencies {
      println!("  {} {} ({:?})", symbols::INFO, dep.name, dep.kind);
    }
  }

  if !info.options.is_empty() {
    println!();
    println!("Options:");
    for option in &info.options {
      println!("  {}", option.flag);
      println!("      {}", option.description);
    }
    for alias in info.deprecated_options {
      println!("  --{} {} --{} (deprecated)", alias.old, symbols::ARROW, alias.new);
    }
  }

  if !info.patches.is_empty() {
    println!();
    println!("Patches:");
    for patch in info.patches {
      println!("  {} {} ({})", symbols::INFO, patch.reason, truncate_hash(patch.sha256));
    }
  }

  for bottle in info.bottles {
    print_stat("Bottle", &format!("{} ({})", bottle.os, truncate_hash(bottle.sha256)));
  }

  if let Some(caveats) = meta.caveats {
    println!();
    print_info("Caveats:");
    println!("{}", caveats);
  }

  Ok(())
}

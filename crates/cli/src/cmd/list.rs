use anyhow::Result;
use serde::Serialize;

use cellar_lib::formula;

use crate::output::{OutputFormat, print_json};

#[derive(Serialize)]
struct FormulaSummary {
  name: &'static str,
  version: &'static str,
  desc: &'static str,
}

pub fn cmd_list(output: OutputFormat) -> Result<()> {
  let formulas: Vec<FormulaSummary> = formula::all()
    .iter()
    .map(|f| FormulaSummary {
      name: f.name(),
      version: f.version(),
      desc: f.meta().desc,
    })
    .collect();

  if output.is_json() {
    print_json(&formulas)?;
  } else {
    for f in &formulas {
      println!("{:<12} {:<8} {}", f.name, f.version, f.desc);
    }
  }

  Ok(())
}

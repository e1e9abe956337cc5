use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

use output::{OutputFormat, print_error};

/// cellar - build Qt 5 and QtKeychain from source
#[derive(Parser)]
#[command(name = "cellar")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// List known formulas
  List,

  /// Show a formula's metadata, options and dependencies
  Info {
    /// Formula name
    formula: String,
  },

  /// Print the configure arguments an install would use
  Args {
    /// Formula name
    formula: String,

    /// Build options, e.g. --with-docs --without-webengine. Everything after
    /// the formula name is a build option; put cellar flags before it.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    flags: Vec<String>,
  },

  /// Fetch, build, install and test a formula
  Install {
    /// Skip the smoke test (must come before the formula's options)
    #[arg(long)]
    skip_test: bool,

    /// Formula name
    formula: String,

    /// Build options, e.g. --with-docs --without-webengine. Everything after
    /// the formula name is a build option; put cellar flags before it.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    flags: Vec<String>,
  },

  /// Run the smoke test against an installed keg
  Test {
    /// Formula name
    formula: String,
  },

  /// Re-run the post-install fixups on an installed keg
  Fixup {
    /// Formula name
    formula: String,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if let Err(e) = run(cli) {
    print_error(&format!("{:#}", e));
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> Result<()> {
  let output = cli.output;
  match cli.command {
    Commands::List => cmd::cmd_list(output),
    Commands::Info { formula } => cmd::cmd_info(&formula, output),
    Commands::Args { formula, flags } => cmd::cmd_args(&formula, &flags, output),
    Commands::Install {
      formula,
      flags,
      skip_test,
    } => cmd::cmd_install(&formula, &flags, skip_test, output),
    Commands::Test { formula } => cmd::cmd_test(&formula, output),
    Commands::Fixup { formula } => cmd::cmd_fixup(&formula, output),
  }
}

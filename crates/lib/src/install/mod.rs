//! The install pipeline.
//!
//! One install runs strictly in sequence:
//!
//! 1. compile configure arguments (fails before any side effect)
//! 2. fetch the source archive and patches, verifying checksums
//! 3. extract and patch in a fresh build directory
//! 4. configure, compile, install and (optionally) build docs
//! 5. post-install fixups and the `opt/` link (warnings only)
//! 6. smoke test
//!
//! Any fatal error stops the pipeline where it is.

mod types;

use std::time::Instant;

use tracing::{info, warn};

pub use types::{InstallError, InstallReport, InstallRequest, SmokeOutcome, StepRecord};

use crate::args::{ArgContext, ArgumentList, ArgsError};
use crate::config::Settings;
use crate::execute::{Fetcher, Invocation, Toolchain};
use crate::fixup::{self, FixupStep, FixupWarning};
use crate::formula::{BuildStep, Formula, Phase, SmokeTest};
use crate::host::HostFacts;
use crate::layout::InstallLayout;
use crate::options::BuildOptions;

/// The keg layout a formula installs into.
pub fn keg_layout(formula: &dyn Formula, settings: &Settings) -> InstallLayout {
  InstallLayout::new(settings.keg_prefix(formula.name(), formula.version()))
}

/// Compile the configure arguments without doing anything else.
pub fn plan(
  formula: &dyn Formula,
  options: &BuildOptions,
  host: &HostFacts,
  settings: &Settings,
) -> Result<ArgumentList, ArgsError> {
  let layout = keg_layout(formula, settings);
  formula.configure_args(&ArgContext {
    options,
    host,
    layout: &layout,
  })
}

async fn run_step<T: Toolchain>(
  toolchain: &T,
  step: &BuildStep,
  record: &mut Vec<StepRecord>,
) -> Result<(), InstallError> {
  info!(phase = %step.phase, cmd = %step.invocation, "running step");
  toolchain
    .run(&step.invocation)
    .await
    .map_err(|source| InstallError::Tool {
      phase: step.phase,
      source,
    })?;
  record.push(StepRecord {
    phase: step.phase,
    command: step.invocation.command_line(),
  });
  Ok(())
}

/// Run the full pipeline for one formula.
pub async fn install<T: Toolchain>(
  request: &InstallRequest<'_>,
  settings: &Settings,
  toolchain: &T,
) -> Result<InstallReport, InstallError> {
  let started = Instant::now();
  let formula = request.formula;
  let layout = keg_layout(formula, settings);

  let arguments = plan(formula, &request.options, &request.host, settings)?;
  info!(
    formula = %formula.name(),
    version = %formula.version(),
    options = %request.options,
    "installing"
  );

  let fetcher = Fetcher::new(&settings.downloads_dir);
  let archive = fetcher.fetch(&formula.source()).await?;
  let mut patches = Vec::with_capacity(formula.patches().len());
  for patch in formula.patches() {
    patches.push(fetcher.fetch(&patch.resource()).await?);
  }

  std::fs::create_dir_all(settings.build_root())?;
  let build_dir = tempfile::Builder::new()
    .prefix(&format!("{}-{}-", formula.name(), formula.version()))
    .tempdir_in(settings.build_root())?;
  let source_dir = build_dir.path();

  let mut steps = Vec::new();

  let extract = BuildStep::new(
    Phase::Extract,
    Invocation::new("tar")
      .arg("-xf")
      .arg(archive.display().to_string())
      .arg("-C")
      .arg(source_dir.display().to_string())
      .arg("--strip-components=1"),
  );
  run_step(toolchain, &extract, &mut steps).await?;

  for patch in &patches {
    let step = BuildStep::new(
      Phase::Patch,
      Invocation::new("patch")
        .args(["-p1", "-i"])
        .arg(patch.display().to_string())
        .cwd(source_dir),
    );
    run_step(toolchain, &step, &mut steps).await?;
  }

  for step in formula.build_steps(&arguments, &request.options, source_dir) {
    run_step(toolchain, &step, &mut steps).await?;
  }

  let warnings = finish_keg(formula, settings, &layout);

  let smoke_test = if request.skip_test {
    info!("smoke test skipped");
    SmokeOutcome::Skipped
  } else {
    run_smoke_test(formula, &layout, toolchain, &mut steps).await?;
    SmokeOutcome::Passed
  };

  let elapsed = started.elapsed();
  info!(formula = %formula.name(), elapsed = %humantime::format_duration(elapsed), "install complete");

  Ok(InstallReport {
    formula: formula.name().to_string(),
    version: formula.version().to_string(),
    options: request.options.clone(),
    arguments,
    layout,
    steps,
    warnings,
    smoke_test,
    caveats: formula.meta().caveats.map(str::to_string),
    elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
  })
}

/// Formula fixups followed by the `opt/<name>` link.
fn finish_keg(formula: &dyn Formula, settings: &Settings, layout: &InstallLayout) -> Vec<FixupWarning> {
  let mut warnings = formula.fixup(layout);

  let opt = settings.opt_prefix(formula.name());
  if let Err(e) = fixup::ensure_symlink(&layout.prefix, &opt) {
    warn!(link = %opt.display(), error = %e, "could not link opt prefix");
    warnings.push(FixupWarning {
      step: FixupStep::LinkOpt,
      path: opt,
      message: e.to_string(),
    });
  }

  warnings
}

fn require_installed(formula: &dyn Formula, layout: &InstallLayout) -> Result<(), InstallError> {
  if layout.is_installed() {
    Ok(())
  } else {
    Err(InstallError::NotInstalled {
      name: formula.name().to_string(),
      version: formula.version().to_string(),
      prefix: layout.prefix.clone(),
    })
  }
}

/// Re-run fixups on an installed keg.
pub fn fixup_keg(formula: &dyn Formula, settings: &Settings) -> Result<Vec<FixupWarning>, InstallError> {
  let layout = keg_layout(formula, settings);
  require_installed(formula, &layout)?;
  Ok(finish_keg(formula, settings, &layout))
}

async fn run_smoke_test<T: Toolchain>(
  formula: &dyn Formula,
  layout: &InstallLayout,
  toolchain: &T,
  record: &mut Vec<StepRecord>,
) -> Result<(), InstallError> {
  let scratch = tempfile::tempdir()?;

  match formula.smoke_test(layout, scratch.path()) {
    SmokeTest::Command(invocation) => {
      info!(cmd = %invocation, "running smoke test");
      toolchain
        .run(&invocation)
        .await
        .map_err(|e| InstallError::SmokeTestFailed(e.to_string()))?;
      record.push(StepRecord {
        phase: Phase::Test,
        command: invocation.command_line(),
      });
    }
    SmokeTest::FileExists(path) => {
      info!(path = %path.display(), "checking installed file");
      if !path.exists() {
        return Err(InstallError::SmokeTestFailed(format!("{} is missing", path.display())));
      }
    }
  }

  Ok(())
}

/// Smoke-test an installed keg.
pub async fn test_keg<T: Toolchain>(
  formula: &dyn Formula,
  settings: &Settings,
  toolchain: &T,
) -> Result<Vec<StepRecord>, InstallError> {
  let layout = keg_layout(formula, settings);
  require_installed(formula, &layout)?;

  let mut record = Vec::new();
  run_smoke_test(formula, &layout, toolchain, &mut record).await?;
  Ok(record)
}


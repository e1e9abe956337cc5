//! End-to-end install pipeline tests with a recording toolchain.

use std::fs;

use cellar_lib::args::ArgsError;
use cellar_lib::execute::FetchError;
use cellar_lib::formula::{Formula, Phase, Qt5, Qtkeychain};
use cellar_lib::host::HostFacts;
use cellar_lib::install::{self, InstallError, InstallRequest, SmokeOutcome};
use cellar_lib::platform::arch::WordSize;

use super::common::{TestEnv, fake_qt_install};
use super::record::{RecordingToolchain, tool_failure};

fn request<'a>(formula: &'a dyn Formula, flags: &[&str], host: HostFacts) -> InstallRequest<'a> {
  let flags: Vec<String> = flags.iter().map(|s| s.to_string()).collect();
  InstallRequest {
    formula,
    options: formula.parse_options(&flags).unwrap(),
    host,
    skip_test: false,
  }
}

fn host64() -> HostFacts {
  HostFacts::new(WordSize::Bits64)
}

#[tokio::test]
async fn qt5_install_runs_steps_in_order_and_fixes_up_keg() {
  let env = TestEnv::new();
  let formula = env.local(Qt5);
  let prefix = env.settings.keg_prefix("qt5", "5.4.2");

  let hook_prefix = prefix.clone();
  let toolchain = RecordingToolchain::with_hook(move |inv| {
    if inv.command_line() == "make install" {
      fake_qt_install(&hook_prefix);
    }
    Ok(())
  });

  let report = install::install(&request(&formula, &[], host64()), &env.settings, &toolchain)
    .await
    .unwrap();

  let phases: Vec<Phase> = report.steps.iter().map(|s| s.phase).collect();
  assert_eq!(
    phases,
    vec![
      Phase::Extract,
      Phase::Configure,
      Phase::Compile,
      Phase::Install,
      Phase::Test
    ]
  );
  assert!(report.steps[1].command.starts_with("./configure -prefix "));
  assert!(report.steps[1].command.ends_with("-nomake examples -arch x86_64"));
  assert_eq!(report.steps[4].command, format!("{}/bin/qmake -project", prefix.display()));

  assert!(report.warnings.is_empty(), "unexpected warnings: {:?}", report.warnings);
  assert_eq!(report.smoke_test, SmokeOutcome::Passed);
  assert!(report.caveats.as_deref().unwrap().contains("opensource license"));

  assert_eq!(
    fs::read_link(prefix.join("Frameworks").join("QtCore.framework")).unwrap(),
    prefix.join("lib").join("QtCore.framework")
  );
  assert!(prefix.join("include").join("QtGui").join("QtGui").exists());
  assert!(prefix.join("Designer.app").join("Contents").is_dir());
  assert_eq!(
    fs::read_to_string(prefix.join("mkspecs").join("qconfig.pri")).unwrap(),
    "QT_ARCH = x86_64\n"
  );
  assert_eq!(fs::read_link(env.settings.opt_prefix("qt5")).unwrap(), prefix);
}

#[tokio::test]
async fn oci_without_oracle_home_fails_before_any_side_effect() {
  let env = TestEnv::new();
  let formula = env.local(Qt5);
  let toolchain = RecordingToolchain::new();

  let err = install::install(&request(&formula, &["--with-oci"], host64()), &env.settings, &toolchain)
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    InstallError::Args(ArgsError::MissingEnvironment { ref variable, .. }) if variable == "ORACLE_HOME"
  ));
  assert!(toolchain.invocations().is_empty());
  assert!(!env.downloads_dir().exists(), "nothing should have been fetched");
  assert!(!env.settings.build_root().exists());
}

#[tokio::test]
async fn checksum_mismatch_aborts_before_extract() {
  let env = TestEnv::new();
  let mut formula = env.local(Qt5);
  formula.source.sha256 = "0".repeat(64);
  let toolchain = RecordingToolchain::new();

  let err = install::install(&request(&formula, &[], host64()), &env.settings, &toolchain)
    .await
    .unwrap_err();

  assert!(matches!(err, InstallError::Fetch(FetchError::Integrity { .. })));
  assert!(toolchain.invocations().is_empty());
}

#[tokio::test]
async fn failing_configure_stops_the_pipeline() {
  let env = TestEnv::new();
  let formula = env.local(Qt5);
  let toolchain = RecordingToolchain::with_hook(|inv| {
    if inv.program == "./configure" {
      return Err(tool_failure(inv, 1, "ERROR: Unknown command line option"));
    }
    Ok(())
  });

  let err = install::install(&request(&formula, &[], host64()), &env.settings, &toolchain)
    .await
    .unwrap_err();

  match &err {
    InstallError::Tool { phase, source } => {
      assert_eq!(*phase, Phase::Configure);
      assert!(source.to_string().contains("ERROR: Unknown command line option"));
    }
    other => panic!("expected a tool failure, got {other:?}"),
  }

  let programs: Vec<String> = toolchain.invocations().into_iter().map(|i| i.program).collect();
  assert_eq!(programs, vec!["tar", "./configure"]);
  assert!(!env.settings.opt_prefix("qt5").exists());
}

#[tokio::test]
async fn patches_are_fetched_and_applied_after_extract() {
  let env = TestEnv::new();
  let mut formula = env.local(Qt5);
  let patches = vec![env.patch("a.diff", b"patch a"), env.patch("b.diff", b"patch b")];
  formula.patches = Box::leak(patches.into_boxed_slice());

  let toolchain = RecordingToolchain::new();
  let mut req = request(&formula, &[], host64());
  req.skip_test = true;

  let report = install::install(&req, &env.settings, &toolchain).await.unwrap();

  let phases: Vec<Phase> = report.steps.iter().map(|s| s.phase).collect();
  assert_eq!(&phases[..3], &[Phase::Extract, Phase::Patch, Phase::Patch]);
  assert!(report.steps[1].command.starts_with("patch -p1 -i "));
  assert!(report.steps[1].command.ends_with("a.diff"));
  assert_eq!(report.smoke_test, SmokeOutcome::Skipped);
}

#[tokio::test]
async fn docs_option_runs_doc_targets_after_install() {
  let env = TestEnv::new();
  let formula = env.local(Qt5);
  let toolchain = RecordingToolchain::new();
  let mut req = request(&formula, &["--with-docs"], host64());
  req.skip_test = true;

  install::install(&req, &env.settings, &toolchain).await.unwrap();

  let lines = toolchain.command_lines();
  assert_eq!(
    &lines[lines.len() - 3..],
    &["make install", "make docs", "make install_docs"]
  );
}

#[tokio::test]
async fn failing_smoke_test_is_fatal() {
  let env = TestEnv::new();
  let formula = env.local(Qt5);
  let toolchain = RecordingToolchain::with_hook(|inv| {
    if inv.args == ["-project"] {
      return Err(tool_failure(inv, 3, "qmake: cannot find mkspecs"));
    }
    Ok(())
  });

  let err = install::install(&request(&formula, &[], host64()), &env.settings, &toolchain)
    .await
    .unwrap_err();

  match err {
    InstallError::SmokeTestFailed(message) => assert!(message.contains("cannot find mkspecs")),
    other => panic!("expected SmokeTestFailed, got {other:?}"),
  }
}

#[tokio::test]
async fn qtkeychain_builds_against_linked_qt() {
  let env = TestEnv::new();
  let formula = env.local(Qtkeychain);
  let prefix = env.settings.keg_prefix("qtkeychain", "0.6.2");
  let qt_opt = env.settings.opt_prefix("qt5");
  fs::create_dir_all(&qt_opt).unwrap();

  let hook_prefix = prefix.clone();
  let toolchain = RecordingToolchain::with_hook(move |inv| {
    if inv.command_line() == "make install" {
      let include = hook_prefix.join("include").join("qt5keychain");
      fs::create_dir_all(&include).unwrap();
      fs::write(include.join("keychain.h"), "").unwrap();
    }
    Ok(())
  });

  let host = HostFacts::new(WordSize::Bits64).with_dependency("qt5", &qt_opt);
  let report = install::install(&request(&formula, &[], host), &env.settings, &toolchain)
    .await
    .unwrap();

  assert!(
    report
      .arguments
      .as_slice()
      .contains(&format!("-DCMAKE_PREFIX_PATH={}", qt_opt.display()))
  );
  assert_eq!(report.smoke_test, SmokeOutcome::Passed);
  // The header check runs no external command.
  assert_eq!(report.steps.last().map(|s| s.phase), Some(Phase::Install));
}

#[tokio::test]
async fn qtkeychain_missing_header_fails_smoke_test() {
  let env = TestEnv::new();
  let formula = env.local(Qtkeychain);
  let toolchain = RecordingToolchain::new();

  let err = install::install(&request(&formula, &[], host64()), &env.settings, &toolchain)
    .await
    .unwrap_err();

  assert!(matches!(err, InstallError::SmokeTestFailed(ref m) if m.ends_with("keychain.h is missing")));
}

#[tokio::test]
async fn test_keg_requires_installed_keg() {
  let env = TestEnv::new();
  let toolchain = RecordingToolchain::new();

  let err = install::test_keg(&Qt5, &env.settings, &toolchain).await.unwrap_err();
  assert!(matches!(err, InstallError::NotInstalled { .. }));
  assert!(toolchain.invocations().is_empty());
}

#[test]
fn plan_matches_the_example_scenario() {
  let env = TestEnv::new();
  let options = Qt5
    .parse_options(&["--with-mysql".to_string()])
    .unwrap();
  let args = install::plan(&Qt5, &options, &host64(), &env.settings).unwrap();
  let tail: Vec<&str> = args.as_slice()[10..].iter().map(String::as_str).collect();
  assert_eq!(tail, vec!["-nomake", "examples", "-plugin-sql-mysql", "-arch", "x86_64"]);
}

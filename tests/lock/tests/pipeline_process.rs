//! Full pipeline against the `fake_transport` process engine.
//!
//! Each test runs in its own temporary working directory: inputs are
//! written, the fake engine is spawned there, its outputs are extracted,
//! and the directory is checked after cleanup.

use std::path::Path;

use lock_tests::transport_helpers::{fake_moments, fixture_binary, pin_cell_config};
use xsdigest_harness::contract::EngineError;
use xsdigest_harness::error::HarnessError;
use xsdigest_harness::results::{CompareMode, ReferenceOutcome};
use xsdigest_harness::runner::{Harness, RunOptions, RunOutcome, RunReport};
use xsdigest_kernel::digest::hash::sha512_hex;
use xsdigest_kernel::digest::Digest;

const RAW_LAYOUT: &str = "domain=1 type=transport\n[1.25]\n[0.125]\n\
                          domain=1 type=chi\n[1.5]\n[0.25]\n\
                          domain=2 type=transport\n[2.25]\n[0.125]\n\
                          domain=2 type=chi\n[2.5]\n[0.25]\n";

fn harness(args: &[&str], categories: &[&str]) -> Harness {
    let transport = fixture_binary("fake_transport");
    Harness::new(pin_cell_config(&transport, args, categories, &[0.0, 20.0])).unwrap()
}

fn options(mode: CompareMode, hash_output: bool) -> RunOptions {
    RunOptions {
        mode,
        hash_output: Some(hash_output),
        ..RunOptions::default()
    }
}

fn completed(outcome: RunOutcome) -> RunReport {
    match outcome {
        RunOutcome::Completed(report) => report,
        RunOutcome::InputsBuilt(_) => panic!("expected a completed run"),
    }
}

fn remaining(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

// ---------------------------------------------------------------------------
// End-to-end digest
// ---------------------------------------------------------------------------

#[test]
fn raw_digest_matches_engine_values() {
    let dir = tempfile::tempdir().unwrap();
    let report = completed(
        harness(&[], &["transport", "chi"])
            .run(dir.path(), options(CompareMode::Update, false))
            .unwrap(),
    );
    assert_eq!(report.digest, Digest::Raw(RAW_LAYOUT.to_string()));
    assert_eq!(report.result_file, dir.path().join("statepoint.10.json"));
    assert_eq!(fake_moments(1, 0, 0), (1.25, 0.125));
}

#[test]
fn hashed_digest_is_sha512_of_raw_layout() {
    let dir = tempfile::tempdir().unwrap();
    let report = completed(
        harness(&[], &["transport", "chi"])
            .run(dir.path(), options(CompareMode::Update, true))
            .unwrap(),
    );
    assert_eq!(report.digest, Digest::Sha512(sha512_hex(RAW_LAYOUT.as_bytes())));
}

#[test]
fn matrix_categories_render_nested() {
    let dir = tempfile::tempdir().unwrap();
    let transport = fixture_binary("fake_transport");
    let config = pin_cell_config(&transport, &[], &["nu-scatter matrix"], &[0.0, 0.625e-6, 20.0]);
    let report = completed(
        Harness::new(config)
            .unwrap()
            .run(dir.path(), options(CompareMode::Update, false))
            .unwrap(),
    );
    assert!(
        report
            .digest
            .as_str()
            .starts_with("domain=1 type=nu-scatter matrix\n[[1.25, 1.3125], [1.375, 1.4375]]\n"),
        "{}",
        report.digest
    );
}

// ---------------------------------------------------------------------------
// Reference comparison and cleanup
// ---------------------------------------------------------------------------

#[test]
fn update_then_compare_matches_and_cleans() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(&[], &["transport", "chi"]);

    let first = completed(h.run(dir.path(), options(CompareMode::Update, true)).unwrap());
    assert_eq!(first.results, ReferenceOutcome::Updated);
    assert_eq!(remaining(dir.path()), vec!["inputs_true.dat", "results_true.dat"]);

    let second = completed(h.run(dir.path(), options(CompareMode::Compare, true)).unwrap());
    assert_eq!(second.results, ReferenceOutcome::Matched);
    assert_eq!(second.inputs, ReferenceOutcome::Matched);
    assert_eq!(first.digest, second.digest);
    assert_eq!(first.input_digest, second.input_digest);
    assert_eq!(remaining(dir.path()), vec!["inputs_true.dat", "results_true.dat"]);
}

#[test]
fn reordered_categories_mismatch_reference() {
    let dir = tempfile::tempdir().unwrap();
    harness(&[], &["transport", "chi"])
        .run(dir.path(), options(CompareMode::Update, false))
        .unwrap();
    // The inputs differ too; drop that reference so the results check is reached.
    std::fs::remove_file(dir.path().join("inputs_true.dat")).unwrap();

    let err = harness(&[], &["chi", "transport"])
        .run(dir.path(), options(CompareMode::Compare, false))
        .unwrap_err();
    assert!(matches!(err, HarnessError::ResultsMismatch { .. }), "{err}");
    assert_eq!(remaining(dir.path()), vec!["results_true.dat"]);
}

#[test]
fn changed_inputs_mismatch_input_reference() {
    let dir = tempfile::tempdir().unwrap();
    harness(&[], &["transport", "chi"])
        .run(dir.path(), options(CompareMode::Update, true))
        .unwrap();

    let transport = fixture_binary("fake_transport");
    let mut config = pin_cell_config(&transport, &[], &["transport", "chi"], &[0.0, 20.0]);
    config.model.settings.particles = 5000;
    let err = Harness::new(config)
        .unwrap()
        .run(dir.path(), options(CompareMode::Compare, true))
        .unwrap_err();
    match err {
        HarnessError::ResultsMismatch { test, .. } => {
            assert_eq!(test, dir.path().join("inputs_test.dat"));
        }
        other => panic!("expected ResultsMismatch, got {other}"),
    }
}

// ---------------------------------------------------------------------------
// Failure taxonomy
// ---------------------------------------------------------------------------

#[test]
fn engine_failure_is_external_run_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = harness(&["--fail"], &["transport"])
        .run(dir.path(), RunOptions::default())
        .unwrap_err();
    match &err {
        HarnessError::ExternalRun(EngineError::ExitFailure {
            code, stderr_tail, ..
        }) => {
            assert_eq!(*code, Some(3));
            assert!(stderr_tail.contains("lost particle"), "{stderr_tail}");
        }
        other => panic!("expected ExitFailure, got {other}"),
    }
    assert!(remaining(dir.path()).is_empty());
}

#[test]
fn missing_executable_is_external_run_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = pin_cell_config(&dir.path().join("no-such-engine"), &[], &["chi"], &[0.0, 20.0]);
    let err = Harness::new(config)
        .unwrap()
        .run(dir.path(), RunOptions::default())
        .unwrap_err();
    assert!(
        matches!(err, HarnessError::ExternalRun(EngineError::Spawn { .. })),
        "{err}"
    );
    assert!(remaining(dir.path()).is_empty());
}

#[test]
fn skipped_category_is_missing_key() {
    let dir = tempfile::tempdir().unwrap();
    let err = harness(&["--skip-category", "chi"], &["transport", "chi"])
        .run(dir.path(), RunOptions::default())
        .unwrap_err();
    match err {
        HarnessError::MissingKey { key, path } => {
            assert_eq!(key, "material/1/chi/average");
            assert_eq!(path, dir.path().join("statepoint.10.json"));
        }
        other => panic!("expected MissingKey, got {other}"),
    }
    assert!(remaining(dir.path()).is_empty());
}

#[test]
fn ambiguous_statepoints_are_missing_output() {
    let dir = tempfile::tempdir().unwrap();
    let err = harness(&["--extra-statepoint"], &["transport"])
        .run(dir.path(), RunOptions::default())
        .unwrap_err();
    assert!(matches!(err, HarnessError::MissingOutput { .. }), "{err}");
    assert!(remaining(dir.path()).is_empty());
}

#[test]
fn absent_summary_is_missing_output() {
    let dir = tempfile::tempdir().unwrap();
    let err = harness(&["--no-summary"], &["transport"])
        .run(dir.path(), RunOptions::default())
        .unwrap_err();
    assert!(matches!(err, HarnessError::MissingOutput { .. }), "{err}");
    assert!(remaining(dir.path()).is_empty());
}

#[test]
fn unlinked_run_tolerates_absent_summary() {
    let dir = tempfile::tempdir().unwrap();
    let transport = fixture_binary("fake_transport");
    let mut config = pin_cell_config(&transport, &["--no-summary"], &["transport"], &[0.0, 20.0]);
    config.link_summary = false;
    let report = completed(
        Harness::new(config)
            .unwrap()
            .run(dir.path(), options(CompareMode::Update, false))
            .unwrap(),
    );
    assert!(report.digest.as_str().starts_with("domain=1 type=transport\n"));
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

#[test]
fn build_inputs_only_leaves_inputs_and_skips_engine() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = harness(&["--fail"], &["transport"])
        .run(
            dir.path(),
            RunOptions {
                build_inputs_only: true,
                ..RunOptions::default()
            },
        )
        .unwrap();
    assert!(matches!(outcome, RunOutcome::InputsBuilt(_)));
    assert_eq!(
        remaining(dir.path()),
        vec!["geometry.json", "materials.json", "settings.json", "tallies.json"]
    );
}

#[test]
fn kept_artifacts_include_derived_store() {
    let dir = tempfile::tempdir().unwrap();
    let report = completed(
        harness(&[], &["transport", "chi"])
            .run(
                dir.path(),
                RunOptions {
                    keep_artifacts: true,
                    ..options(CompareMode::Update, true)
                },
            )
            .unwrap(),
    );
    assert!(report.removed.is_empty());
    let store: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("mgxs.json")).unwrap()).unwrap();
    assert_eq!(store["material/2/chi/average"], serde_json::json!([2.5]));
    assert!(dir.path().join("summary.json").exists());
}

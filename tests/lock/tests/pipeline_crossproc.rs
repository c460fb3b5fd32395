//! Cross-process determinism of the full pipeline.
//!
//! Spawns the `pipeline_fixture` binary under several environment variants,
//! each with a fresh working directory, and asserts identical output. Proves
//! that digests and input hashes are not influenced by process-level state
//! (cwd, locale, timezone, working-directory path).

use std::process::Command;

use lock_tests::transport_helpers::fixture_binary;

/// Run the fixture with the given cwd and environment overrides.
fn run_variant(cwd: &str, env_overrides: &[(&str, &str)]) -> String {
    let bin = fixture_binary("pipeline_fixture");
    let transport = fixture_binary("fake_transport");
    let work_dir = tempfile::tempdir().unwrap();

    let mut command = Command::new(&bin);
    command
        .arg(&transport)
        .arg(work_dir.path())
        .current_dir(cwd)
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE")
        .env_remove("RUST_LOG");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!(
            "failed to spawn {} (cwd={cwd}, overrides={env_overrides:?}): {e}",
            bin.display()
        )
    });
    assert!(
        output.status.success(),
        "pipeline_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

fn field<'a>(output: &'a str, key: &str) -> &'a str {
    output
        .lines()
        .find_map(|line| line.strip_prefix(key)?.strip_prefix('='))
        .unwrap_or_else(|| panic!("output missing {key}: {output}"))
}

// ---------------------------------------------------------------------------
// Cross-process determinism
// ---------------------------------------------------------------------------

#[test]
fn crossproc_determinism_four_env_variants() {
    let root = env!("CARGO_MANIFEST_DIR");
    let baseline = run_variant(root, &[]);

    assert_eq!(field(&baseline, "digest").len(), 128);
    assert_eq!(field(&baseline, "input_digest").len(), 128);
    assert_eq!(field(&baseline, "record_count"), "8");

    let variant_cwd = run_variant("/tmp", &[]);
    assert_eq!(baseline, variant_cwd, "output differs when cwd changes");

    let variant_locale = run_variant(root, &[("LC_ALL", "C"), ("LANG", "C")]);
    assert_eq!(baseline, variant_locale, "output differs when LC_ALL=C LANG=C");

    let variant_noise = run_variant(
        root,
        &[
            ("XSDIGEST_NOISE", "should_not_matter"),
            ("TZ", "America/New_York"),
            ("RUST_LOG", "trace"),
        ],
    );
    assert_eq!(baseline, variant_noise, "output differs with noise env vars");
}

#[test]
fn hashed_and_raw_digests_agree() {
    let output = run_variant(env!("CARGO_MANIFEST_DIR"), &[]);
    assert_eq!(
        field(&output, "digest"),
        field(&output, "raw_digest_sha512")
    );
}

//! Binary that runs the full harness pipeline against `fake_transport` and
//! prints deterministic output lines for cross-process verification.
//!
//! Usage: `pipeline_fixture <fake_transport> <work_dir>`
//! Output: four lines, each `key=value`:
//!   `digest`=<sha512 hex>
//!   `raw_digest_sha512`=<sha512 hex of the unhashed digest>
//!   `input_digest`=<sha512 hex>
//!   `record_count`=<n>

use std::path::PathBuf;

use lock_tests::transport_helpers::pin_cell_config;
use xsdigest_harness::results::CompareMode;
use xsdigest_harness::runner::{Harness, RunOptions, RunOutcome, RunReport};
use xsdigest_kernel::digest::hash::sha512_hex;

fn run(harness: &Harness, dir: &std::path::Path, hash_output: bool) -> RunReport {
    let options = RunOptions {
        mode: CompareMode::Update,
        hash_output: Some(hash_output),
        ..RunOptions::default()
    };
    match harness.run(dir, options).expect("harness run failed") {
        RunOutcome::Completed(report) => report,
        RunOutcome::InputsBuilt(_) => panic!("pipeline stopped after building inputs"),
    }
}

fn main() {
    let mut args = std::env::args().skip(1);
    let transport = PathBuf::from(args.next().expect("usage: pipeline_fixture <fake_transport> <work_dir>"));
    let work_dir = PathBuf::from(args.next().expect("usage: pipeline_fixture <fake_transport> <work_dir>"));

    let config = pin_cell_config(
        &transport,
        &[],
        &["total", "transport", "nu-scatter matrix", "chi"],
        &[0.0, 0.625e-6, 20.0],
    );
    let harness = Harness::new(config).expect("configuration is valid");

    let hashed = run(&harness, &work_dir, true);
    let raw = run(&harness, &work_dir, false);
    assert_eq!(hashed.input_digest, raw.input_digest);

    println!("digest={}", hashed.digest.as_str());
    println!("raw_digest_sha512={}", sha512_hex(raw.digest.as_str().as_bytes()));
    println!("input_digest={}", hashed.input_digest);
    println!(
        "record_count={}",
        harness.library().domains().len() * harness.library().categories().len()
    );
}

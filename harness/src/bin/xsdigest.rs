//! Build inputs, run the configured engine, and print the result digest.
//!
//! Usage: `xsdigest --config <file> [--work-dir <dir>] [--update]
//!         [--build-inputs] [--no-hash] [--keep-artifacts] [-v...]`
//!
//! Stdout carries the digest: one hex line by default, the multi-line
//! canonical text with `--no-hash`, or the input digest with
//! `--build-inputs`. Logs go to stderr.

use std::io::Write;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::error;
use xsdigest_harness::logging::init_logging;
use xsdigest_harness::results::CompareMode;
use xsdigest_harness::runner::{Harness, RunOptions, RunOutcome};

#[derive(Parser, Debug)]
#[command(name = "xsdigest")]
#[command(about = "Run a transport engine and digest its multi-group results")]
struct Args {
    /// Harness configuration file (JSON)
    #[arg(long)]
    config: PathBuf,

    /// Working directory for inputs and outputs
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,

    /// Overwrite the reference files instead of comparing
    #[arg(long)]
    update: bool,

    /// Write the input files and exit without running
    #[arg(long)]
    build_inputs: bool,

    /// Print the raw digest text instead of its SHA-512
    #[arg(long)]
    no_hash: bool,

    /// Leave generated files in the working directory
    #[arg(long)]
    keep_artifacts: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let harness = match Harness::from_path(&args.config) {
        Ok(h) => h,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let options = RunOptions {
        mode: if args.update {
            CompareMode::Update
        } else {
            CompareMode::Compare
        },
        build_inputs_only: args.build_inputs,
        keep_artifacts: args.keep_artifacts,
        hash_output: args.no_hash.then_some(false),
    };

    let text = match harness.run(&args.work_dir, options) {
        Ok(RunOutcome::Completed(report)) => report.digest.into_string(),
        Ok(RunOutcome::InputsBuilt(inputs)) => format!("{}\n", inputs.digest()),
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    let mut stdout = std::io::stdout().lock();
    let written = if text.ends_with('\n') {
        stdout.write_all(text.as_bytes())
    } else {
        writeln!(stdout, "{text}")
    };
    if let Err(e) = written.and_then(|()| stdout.flush()) {
        error!("cannot write digest: {e}");
        process::exit(1);
    }
}

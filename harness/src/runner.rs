//! Harness runner: drives one run from configuration to digest.
//!
//! # Pipeline
//!
//! ```text
//! build_inputs() → inputs reference check
//!   → EngineSession::open() → run() → close()
//!   → extract() → results reference check → cleanup
//! ```
//!
//! A [`CleanupGuard`] is armed before the first file is written, so the
//! working directory is cleaned whichever stage fails, panics included.
//! Build-inputs-only mode stops after the inputs are written and never
//! cleans up.

use std::path::{Path, PathBuf};

use tracing::info;
use xsdigest_kernel::digest::hash::sha512_hex;
use xsdigest_kernel::digest::Digest;

use crate::config::HarnessConfig;
use crate::contract::{Engine, EngineSession};
use crate::error::HarnessError;
use crate::extract::extract;
use crate::input::{build_inputs, InputSet};
use crate::library::Library;
use crate::results::{CompareMode, ReferenceOutcome, ReferencePair};
use crate::workdir::{ArtifactSet, CleanupGuard};

/// Per-invocation switches, typically from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub mode: CompareMode,
    /// Write the inputs and stop.
    pub build_inputs_only: bool,
    /// Leave every artifact in place.
    pub keep_artifacts: bool,
    /// Overrides the configuration's `hash_output` when set.
    pub hash_output: Option<bool>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: CompareMode::Compare,
            build_inputs_only: false,
            keep_artifacts: false,
            hash_output: None,
        }
    }
}

/// A completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub digest: Digest,
    pub result_file: PathBuf,
    /// SHA-512 over the generated input files.
    pub input_digest: String,
    pub inputs: ReferenceOutcome,
    pub results: ReferenceOutcome,
    /// Artifacts removed by cleanup (empty when kept).
    pub removed: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Build-inputs-only mode: nothing ran.
    InputsBuilt(InputSet),
    Completed(RunReport),
}

/// A validated configuration, ready to run.
#[derive(Debug, Clone)]
pub struct Harness {
    config: HarnessConfig,
    library: Library,
}

impl Harness {
    /// Validate `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] if the model or library is invalid.
    pub fn new(config: HarnessConfig) -> Result<Self, HarnessError> {
        let library = config.validate()?;
        Ok(Self { config, library })
    }

    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Configuration`] if the file cannot be read,
    /// parsed or validated.
    pub fn from_path(path: &Path) -> Result<Self, HarnessError> {
        Self::new(HarnessConfig::load(path)?)
    }

    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    #[must_use]
    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Run with the engine named in the configuration.
    ///
    /// # Errors
    ///
    /// See [`Harness::run_with`].
    pub fn run(&self, work_dir: &Path, options: RunOptions) -> Result<RunOutcome, HarnessError> {
        let mut engine = self.config.engine.build();
        self.run_with(engine.as_mut(), work_dir, options)
    }

    /// Run the full pipeline in `work_dir` with `engine`.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage's [`HarnessError`]. Artifacts are
    /// cleaned up before the error is returned unless
    /// `options.keep_artifacts` is set.
    pub fn run_with(
        &self,
        engine: &mut dyn Engine,
        work_dir: &Path,
        options: RunOptions,
    ) -> Result<RunOutcome, HarnessError> {
        let model = &self.config.model;

        if options.build_inputs_only {
            let inputs = build_inputs(model, &self.library, work_dir)?;
            info!(dir = %work_dir.display(), "inputs built; skipping run");
            return Ok(RunOutcome::InputsBuilt(inputs));
        }

        let mut extract_options = self.config.extract_options();
        if let Some(hash_output) = options.hash_output {
            extract_options.hash_output = hash_output;
        }

        let mut guard = CleanupGuard::new(work_dir, ArtifactSet::for_run(&extract_options.pattern));
        if options.keep_artifacts {
            guard.disarm();
        }

        let inputs = build_inputs(model, &self.library, work_dir)?;
        let input_digest = inputs.digest();
        let inputs_outcome =
            ReferencePair::inputs(work_dir).check(&format!("{input_digest}\n"), options.mode)?;

        let mut session = EngineSession::open(engine, work_dir)?;
        session.run()?;
        session.close()?;
        info!(dir = %work_dir.display(), "external run finished");

        let extraction = extract(work_dir, &self.library, &extract_options)?;
        let results_outcome =
            ReferencePair::results(work_dir).check(extraction.digest.as_str(), options.mode)?;

        let removed = guard.release()?;
        info!(
            results = ?results_outcome,
            inputs = ?inputs_outcome,
            removed = removed.len(),
            digest = %short(&extraction.digest),
            "run complete"
        );

        Ok(RunOutcome::Completed(RunReport {
            digest: extraction.digest,
            result_file: extraction.result_file,
            input_digest,
            inputs: inputs_outcome,
            results: results_outcome,
            removed,
        }))
    }
}

/// Log-friendly digest identifier: the hash prefix, or a hash of the raw text.
fn short(digest: &Digest) -> String {
    let hex = match digest {
        Digest::Sha512(hex) => hex.clone(),
        Digest::Raw(text) => sha512_hex(text.as_bytes()),
    };
    hex.chars().take(16).collect()
}

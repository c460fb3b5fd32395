//! Reference comparison for digests and input hashes.
//!
//! A test file (`*_test.dat`) is written on every run and compared with the
//! stored reference (`*_true.dat`). In update mode the reference is
//! overwritten with the test file's contents instead. Comparison ignores
//! trailing whitespace so a reference saved by an editor with a final
//! newline still matches.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::HarnessError;
use crate::workdir::{INPUTS_TEST_FILE, INPUTS_TRUE_FILE, RESULTS_TEST_FILE, RESULTS_TRUE_FILE};

/// What to do with the reference file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareMode {
    /// Fail on any difference.
    Compare,
    /// Overwrite the reference with the test output.
    Update,
}

/// Outcome of one reference check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceOutcome {
    Matched,
    Updated,
    /// No reference exists and none is required.
    NoReference,
}

/// A pair of test/reference files in one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePair {
    pub test: PathBuf,
    pub reference: PathBuf,
    /// Whether a missing reference fails the comparison.
    pub required: bool,
}

impl ReferencePair {
    /// `results_test.dat` against `results_true.dat`; the reference is required.
    #[must_use]
    pub fn results(dir: &Path) -> Self {
        Self {
            test: dir.join(RESULTS_TEST_FILE),
            reference: dir.join(RESULTS_TRUE_FILE),
            required: true,
        }
    }

    /// `inputs_test.dat` against `inputs_true.dat`; the reference is optional.
    #[must_use]
    pub fn inputs(dir: &Path) -> Self {
        Self {
            test: dir.join(INPUTS_TEST_FILE),
            reference: dir.join(INPUTS_TRUE_FILE),
            required: false,
        }
    }

    /// Write `contents` to the test file, then compare or update.
    ///
    /// # Errors
    ///
    /// - [`HarnessError::ResultsMismatch`] if the contents differ from the
    ///   reference in compare mode.
    /// - [`HarnessError::MissingOutput`] if a required reference is absent
    ///   in compare mode.
    /// - [`HarnessError::Io`] on any read or write failure.
    pub fn check(&self, contents: &str, mode: CompareMode) -> Result<ReferenceOutcome, HarnessError> {
        std::fs::write(&self.test, contents).map_err(|e| HarnessError::io(&self.test, e))?;

        if mode == CompareMode::Update {
            std::fs::copy(&self.test, &self.reference)
                .map_err(|e| HarnessError::io(&self.reference, e))?;
            info!(reference = %self.reference.display(), "reference updated");
            return Ok(ReferenceOutcome::Updated);
        }

        let expected = match std::fs::read_to_string(&self.reference) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if self.required {
                    return Err(HarnessError::MissingOutput {
                        detail: format!(
                            "reference {} does not exist; rerun in update mode to create it",
                            self.reference.display()
                        ),
                    });
                }
                return Ok(ReferenceOutcome::NoReference);
            }
            Err(e) => return Err(HarnessError::io(&self.reference, e)),
        };

        if expected.trim_end() == contents.trim_end() {
            info!(reference = %self.reference.display(), "reference matched");
            Ok(ReferenceOutcome::Matched)
        } else {
            warn!(
                test = %self.test.display(),
                reference = %self.reference.display(),
                "reference mismatch"
            );
            Err(HarnessError::ResultsMismatch {
                test: self.test.clone(),
                reference: self.reference.clone(),
            })
        }
    }
}

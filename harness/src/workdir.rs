//! Working-directory bookkeeping: locating outputs and removing artifacts.
//!
//! # Artifacts owned by a run
//!
//! ```text
//! <work_dir>/
//!   settings.json geometry.json materials.json tallies.json  # generated inputs
//!   statepoint.*  # result files
//!   summary.json  # domain summary
//!   mgxs.json  # derived store
//!   results_test.dat inputs_test.dat  # test outputs
//! ```
//!
//! Reference files (`results_true.dat`, `inputs_true.dat`) are never
//! artifacts. Removal is idempotent: a missing file is not an error.
//!
//! # Fail-closed lookup
//!
//! [`locate_single`] requires exactly one match. Zero matches and multiple
//! matches are both errors; an ambiguous directory is never resolved by
//! picking one.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::HarnessError;
use crate::input::INPUT_FILES;

pub const SUMMARY_FILE: &str = "summary.json";
pub const DERIVED_STORE_FILE: &str = "mgxs.json";
pub const RESULTS_TEST_FILE: &str = "results_test.dat";
pub const RESULTS_TRUE_FILE: &str = "results_true.dat";
pub const INPUTS_TEST_FILE: &str = "inputs_test.dat";
pub const INPUTS_TRUE_FILE: &str = "inputs_true.dat";

/// Files that outlive every run.
pub const REFERENCE_FILES: [&str; 2] = [RESULTS_TRUE_FILE, INPUTS_TRUE_FILE];

/// The first reference file name `pattern` would match, if any.
#[must_use]
pub fn matched_reference(pattern: &str) -> Option<&'static str> {
    REFERENCE_FILES
        .into_iter()
        .find(|name| wildcard_match(pattern, name))
}

fn is_reference(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| REFERENCE_FILES.contains(&n))
}

/// Glob-style match of a file name against `pattern`.
///
/// `*` matches any run of characters (including none), `?` exactly one.
/// Every other character matches itself. No path separators are involved:
/// patterns apply to bare file names.
#[must_use]
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let n: Vec<char> = name.chars().collect();
    let (mut pi, mut ni) = (0, 0);
    // Position of the last `*` and the name index it was tried at.
    let mut backtrack: Option<(usize, usize)> = None;
    while ni < n.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == n[ni]) {
            pi += 1;
            ni += 1;
        } else if pi < p.len() && p[pi] == '*' {
            backtrack = Some((pi, ni));
            pi += 1;
        } else if let Some((star, matched)) = backtrack {
            pi = star + 1;
            ni = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|&c| c == '*')
}

/// Regular files in `dir` whose names match `pattern`, sorted by name.
///
/// # Errors
///
/// Returns [`HarnessError::Io`] if `dir` cannot be listed.
pub fn find_matches(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, HarnessError> {
    let entries = std::fs::read_dir(dir).map_err(|e| HarnessError::io(dir, e))?;
    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| HarnessError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if wildcard_match(pattern, name) {
                matches.push(path);
            }
        }
    }
    matches.sort();
    Ok(matches)
}

/// The single file in `dir` matching `pattern`.
///
/// # Errors
///
/// Returns [`HarnessError::MissingOutput`] for zero or several matches, or
/// [`HarnessError::Io`] if `dir` cannot be listed.
pub fn locate_single(dir: &Path, pattern: &str) -> Result<PathBuf, HarnessError> {
    let mut matches = find_matches(dir, pattern)?;
    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(HarnessError::MissingOutput {
            detail: format!("no file matching {pattern:?} in {}", dir.display()),
        }),
        n => Err(HarnessError::MissingOutput {
            detail: format!(
                "{n} files match {pattern:?} in {}: {}",
                dir.display(),
                matches
                    .iter()
                    .filter_map(|p| p.file_name().and_then(|f| f.to_str()))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }),
    }
}

/// Names and patterns of the files a run may leave behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    names: Vec<String>,
    patterns: Vec<String>,
}

impl ArtifactSet {
    /// The standard artifact set for a run whose result files match
    /// `result_pattern`.
    #[must_use]
    pub fn for_run(result_pattern: &str) -> Self {
        let mut names: Vec<String> = INPUT_FILES.iter().map(|s| (*s).to_string()).collect();
        names.extend(
            [
                SUMMARY_FILE,
                DERIVED_STORE_FILE,
                RESULTS_TEST_FILE,
                INPUTS_TEST_FILE,
            ]
            .iter()
            .map(|s| (*s).to_string()),
        );
        Self {
            names,
            patterns: vec![result_pattern.to_string()],
        }
    }

    /// Remove every artifact present in `dir`. Returns the removed paths.
    ///
    /// Reference files are skipped even when a result pattern matches them.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] for any failure other than the file
    /// already being gone.
    pub fn remove_from(&self, dir: &Path) -> Result<Vec<PathBuf>, HarnessError> {
        let mut targets: Vec<PathBuf> = self.names.iter().map(|n| dir.join(n)).collect();
        for pattern in &self.patterns {
            match find_matches(dir, pattern) {
                Ok(found) => targets.extend(found.into_iter().filter(|p| !is_reference(p))),
                // A vanished directory has nothing left to clean.
                Err(HarnessError::Io { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        let mut removed = Vec::new();
        for path in targets {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    debug!(file = %path.display(), "removed artifact");
                    removed.push(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(HarnessError::io(&path, e)),
            }
        }
        Ok(removed)
    }
}

/// Removes a run's artifacts when dropped, unless disarmed.
///
/// Drop-time errors are logged, not raised. Call [`CleanupGuard::release`]
/// on the success path to surface them instead.
#[derive(Debug)]
pub struct CleanupGuard {
    dir: PathBuf,
    artifacts: ArtifactSet,
    armed: bool,
}

impl CleanupGuard {
    #[must_use]
    pub fn new(dir: &Path, artifacts: ArtifactSet) -> Self {
        Self {
            dir: dir.to_path_buf(),
            artifacts,
            armed: true,
        }
    }

    /// Keep the artifacts: nothing is removed on drop.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Clean up now and report the outcome.
    ///
    /// # Errors
    ///
    /// Returns the first removal error.
    pub fn release(mut self) -> Result<Vec<PathBuf>, HarnessError> {
        if !self.armed {
            return Ok(Vec::new());
        }
        self.armed = false;
        self.artifacts.remove_from(&self.dir)
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = self.artifacts.remove_from(&self.dir) {
            warn!(dir = %self.dir.display(), error = %e, "cleanup failed");
        }
    }
}

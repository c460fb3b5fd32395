//! Result extractor: locate the result file, resolve every configured
//! record, and build the canonical digest.
//!
//! Extraction is fail-closed. The result file must match exactly once, the
//! summary (when linked) must declare every library domain, and every
//! (domain, category) pair must resolve. Nothing is skipped or defaulted.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};
use xsdigest_kernel::digest::canon::canonical_json_bytes;
use xsdigest_kernel::digest::{digest_records, Digest};
use xsdigest_kernel::key::DomainType;
use xsdigest_kernel::record::{RecordError, ResultRecord};
use xsdigest_kernel::store::{JsonStore, StoreError};

use crate::error::HarnessError;
use crate::library::Library;
use crate::workdir::{locate_single, DERIVED_STORE_FILE, SUMMARY_FILE};

/// Default result-file pattern for a run of `batches` batches.
#[must_use]
pub fn default_pattern(batches: u32) -> String {
    format!("statepoint.{batches}.*")
}

/// One domain entry in the summary file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SummaryDomain {
    pub id: u32,
    #[serde(default)]
    pub name: String,
}

/// Companion file listing the domains of the simulated model.
///
/// Unknown top-level keys are ignored: the external program may report more
/// than the harness needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub material: Vec<SummaryDomain>,
    #[serde(default)]
    pub cell: Vec<SummaryDomain>,
    #[serde(default)]
    pub universe: Vec<SummaryDomain>,
}

impl Summary {
    /// Read and parse a summary file.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::MissingOutput`] if the file does not exist,
    /// [`HarnessError::Io`] if it cannot be read, or
    /// [`HarnessError::MalformedOutput`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self, HarnessError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(HarnessError::MissingOutput {
                    detail: format!("summary file {} was requested but not written", path.display()),
                });
            }
            Err(e) => return Err(HarnessError::io(path, e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| HarnessError::MalformedOutput {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// Entries declared for `domain_type`.
    #[must_use]
    pub fn domains(&self, domain_type: DomainType) -> &[SummaryDomain] {
        match domain_type {
            DomainType::Material => &self.material,
            DomainType::Cell => &self.cell,
            DomainType::Universe => &self.universe,
        }
    }

    #[must_use]
    pub fn declares(&self, domain_type: DomainType, id: u32) -> bool {
        self.domains(domain_type).iter().any(|d| d.id == id)
    }
}

/// Extraction settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Result-file name pattern (`*` and `?` wildcards).
    pub pattern: String,
    /// Require `summary.json` and check every library domain against it.
    pub link_summary: bool,
    /// Reduce the digest to its SHA-512.
    pub hash_output: bool,
    /// Write the resolved records to `mgxs.json`.
    pub export: bool,
}

impl ExtractOptions {
    /// Link, hash and export, with the given pattern.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            link_summary: true,
            hash_output: true,
            export: true,
        }
    }
}

/// What one extraction produced.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub result_file: PathBuf,
    pub records: Vec<ResultRecord>,
    pub digest: Digest,
    /// Path of the derived store, when exported.
    pub derived_store: Option<PathBuf>,
}

/// Extract and digest the results of a completed run in `dir`.
///
/// # Errors
///
/// - [`HarnessError::MissingOutput`]: no result file, several result files,
///   or a linked summary that was not written.
/// - [`HarnessError::MissingKey`]: a library domain absent from the summary
///   (`<domain_type>/<id>`) or a result entry absent from the result file.
/// - [`HarnessError::MalformedOutput`]: unparseable files, non-rectangular
///   or non-numeric entries, average/std. dev. shape disagreement.
/// - [`HarnessError::Io`]: reading or writing a file failed.
pub fn extract(
    dir: &Path,
    library: &Library,
    options: &ExtractOptions,
) -> Result<Extraction, HarnessError> {
    let result_file = locate_single(dir, &options.pattern)?;
    debug!(file = %result_file.display(), "located result file");

    if options.link_summary {
        let summary_path = dir.join(SUMMARY_FILE);
        let summary = Summary::load(&summary_path)?;
        link_summary(&summary, library, &summary_path)?;
        debug!(domains = library.domains().len(), "summary linked");
    }

    let store = JsonStore::open(&result_file).map_err(|e| store_error(&result_file, e))?;
    let records = library
        .load_records(&store)
        .map_err(|e| record_error(&result_file, e))?;
    let digest = digest_records(&records, options.hash_output);
    info!(
        file = %result_file.display(),
        records = records.len(),
        hashed = digest.is_hashed(),
        "extracted results"
    );

    let derived_store = if options.export {
        Some(export_records(dir, &records)?)
    } else {
        None
    };

    Ok(Extraction {
        result_file,
        records,
        digest,
        derived_store,
    })
}

/// Check that `summary` declares every domain of `library`.
///
/// # Errors
///
/// Returns [`HarnessError::MissingKey`] naming the first undeclared domain.
pub fn link_summary(
    summary: &Summary,
    library: &Library,
    summary_path: &Path,
) -> Result<(), HarnessError> {
    let domain_type = library.domain_type();
    match library
        .domains()
        .iter()
        .find(|&&id| !summary.declares(domain_type, id))
    {
        Some(id) => Err(HarnessError::MissingKey {
            path: summary_path.to_path_buf(),
            key: format!("{domain_type}/{id}"),
        }),
        None => Ok(()),
    }
}

fn export_records(dir: &Path, records: &[ResultRecord]) -> Result<PathBuf, HarnessError> {
    let path = dir.join(DERIVED_STORE_FILE);
    let store = Library::derived_store(records).map_err(|e| store_error(&path, e))?;
    let bytes = canonical_json_bytes(&store.to_json());
    std::fs::write(&path, &bytes).map_err(|e| HarnessError::io(&path, e))?;
    debug!(file = %path.display(), datasets = store.len(), "wrote derived store");
    Ok(path)
}

fn store_error(path: &Path, error: StoreError) -> HarnessError {
    match error {
        StoreError::Io { path, source } => HarnessError::io(path, source),
        other => HarnessError::MalformedOutput {
            path: path.to_path_buf(),
            detail: other.to_string(),
        },
    }
}

fn record_error(path: &Path, error: RecordError) -> HarnessError {
    match error {
        RecordError::MissingKey { key } => HarnessError::MissingKey {
            path: path.to_path_buf(),
            key,
        },
        other @ RecordError::ShapeMismatch { .. } => HarnessError::MalformedOutput {
            path: path.to_path_buf(),
            detail: other.to_string(),
        },
    }
}

//! Typed harness errors.
//!
//! [`ConfigError`] covers everything detectable before a file is written.
//! [`HarnessError`] is the taxonomy surfaced to callers: none of its
//! variants are recovered locally, and the runner's cleanup guard still
//! releases working-directory artifacts whichever stage failed.

use std::path::PathBuf;

use xsdigest_kernel::groups::GroupError;
use xsdigest_kernel::key::{DomainType, KeyError};

use crate::contract::EngineError;

/// Bad input, detected before any run.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configuration is not valid JSON or has unknown / missing keys.
    #[error("invalid configuration: {detail}")]
    Parse { detail: String },
    /// Energy group boundaries are invalid.
    #[error(transparent)]
    Groups(#[from] GroupError),
    /// Unknown domain type or result category.
    #[error(transparent)]
    Key(#[from] KeyError),
    /// No result categories were requested.
    #[error("no result categories requested")]
    EmptyCategories,
    /// A result category was requested twice.
    #[error("result category {name:?} requested more than once")]
    DuplicateCategory { name: String },
    /// The base model declares no domain of the requested type.
    #[error("base model declares no {domain_type} domains")]
    NoDomains { domain_type: DomainType },
    /// Two domains of one type share an id.
    #[error("duplicate {domain_type} id {id} in base model")]
    DuplicateDomain { domain_type: DomainType, id: u32 },
    /// A cell fills a material the model does not declare.
    #[error("cell {cell} is filled with undeclared material {material}")]
    UndeclaredFill { cell: u32, material: u32 },
    /// Run settings are out of range.
    #[error("invalid settings: {detail}")]
    Settings { detail: String },
    /// The result-file pattern would also match a reference file.
    #[error("statepoint pattern {pattern:?} matches reference file {reference}")]
    PatternMatchesReference {
        pattern: String,
        reference: &'static str,
    },
}

/// A failed harness run.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Bad input before the run started.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
    /// The external program could not be started or exited unsuccessfully.
    #[error("external run failed: {0}")]
    ExternalRun(#[from] EngineError),
    /// An expected output file is absent, or more than one file matches.
    #[error("missing output: {detail}")]
    MissingOutput { detail: String },
    /// An expected entry is absent from an otherwise valid output file.
    #[error("missing result entry {key} in {path}")]
    MissingKey { path: PathBuf, key: String },
    /// An output file exists but cannot be interpreted.
    #[error("malformed output {path}: {detail}")]
    MalformedOutput { path: PathBuf, detail: String },
    /// The test output differs from the stored reference.
    #[error("results mismatch: {test} differs from reference {reference}")]
    ResultsMismatch { test: PathBuf, reference: PathBuf },
    /// Reading or writing a working-directory file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HarnessError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

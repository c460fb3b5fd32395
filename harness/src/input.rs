//! Input builder: persist the base model plus derived tallies for the
//! external program.
//!
//! # Directory layout
//!
//! ```text
//! <work_dir>/
//!   settings.json   : run settings, summary output forced on
//!   geometry.json   : geometry reference and cells
//!   materials.json  : materials
//!   tallies.json    : one derived tally per (domain, category)
//! ```
//!
//! All files are canonical JSON, so identical configurations produce
//! byte-identical inputs and a stable [`InputSet::digest`].

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use xsdigest_kernel::digest::canon::canonical_json_bytes;
use xsdigest_kernel::digest::hash::sha512_hex_parts;

use crate::error::HarnessError;
use crate::library::Library;
use crate::model::BaseModel;

pub const SETTINGS_FILE: &str = "settings.json";
pub const GEOMETRY_FILE: &str = "geometry.json";
pub const MATERIALS_FILE: &str = "materials.json";
pub const TALLIES_FILE: &str = "tallies.json";

/// Generated input files, in the order they are hashed.
pub const INPUT_FILES: &[&str] = &[SETTINGS_FILE, GEOMETRY_FILE, MATERIALS_FILE, TALLIES_FILE];

/// The persisted inputs of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSet {
    /// Written files, in [`INPUT_FILES`] order.
    pub files: Vec<PathBuf>,
    contents: Vec<Vec<u8>>,
}

impl InputSet {
    /// SHA-512 over the concatenated file contents in [`INPUT_FILES`] order.
    #[must_use]
    pub fn digest(&self) -> String {
        sha512_hex_parts(self.contents.iter().map(Vec::as_slice))
    }
}

/// Render the four input documents without touching the filesystem.
///
/// The summary output flag is forced on: extraction resolves domain ids
/// through the summary file.
#[must_use]
pub fn render_inputs(model: &BaseModel, library: &Library) -> Vec<(&'static str, Vec<u8>)> {
    let settings = &model.settings;
    let settings_doc = serde_json::json!({
        "run_mode": "eigenvalue",
        "batches": settings.batches,
        "inactive": settings.inactive,
        "particles": settings.particles,
        "output": {
            "summary": true,
            "tallies": settings.output.tallies,
        },
        "energy_mode": "continuous-energy",
    });
    let geometry_doc = serde_json::json!({
        "source": model.geometry.source,
        "cells": model.geometry.cells,
    });
    let materials_doc = serde_json::json!({
        "materials": model.materials,
    });
    let tallies_doc = serde_json::json!({
        "library": {
            "domain_type": library.domain_type().as_str(),
            "energy_groups": library.groups(),
            "mgxs_types": library
                .categories()
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>(),
        },
        "tallies": library.tallies(),
    });

    [
        (SETTINGS_FILE, settings_doc),
        (GEOMETRY_FILE, geometry_doc),
        (MATERIALS_FILE, materials_doc),
        (TALLIES_FILE, tallies_doc),
    ]
    .into_iter()
    .map(|(name, doc)| (name, canonical_json_bytes(&doc)))
    .collect()
}

/// Write the input files into `dir`.
///
/// # Errors
///
/// Returns [`HarnessError::Io`] if `dir` is missing or a file cannot be written.
pub fn build_inputs(
    model: &BaseModel,
    library: &Library,
    dir: &Path,
) -> Result<InputSet, HarnessError> {
    let mut files = Vec::with_capacity(INPUT_FILES.len());
    let mut contents = Vec::with_capacity(INPUT_FILES.len());
    for (name, bytes) in render_inputs(model, library) {
        let path = dir.join(name);
        std::fs::write(&path, &bytes).map_err(|e| HarnessError::io(&path, e))?;
        debug!(file = %path.display(), bytes = bytes.len(), "wrote input file");
        files.push(path);
        contents.push(bytes);
    }
    info!(
        dir = %dir.display(),
        tallies = library.domains().len() * library.categories().len(),
        "built inputs"
    );
    Ok(InputSet { files, contents })
}

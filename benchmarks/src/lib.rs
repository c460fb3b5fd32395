//! Shared helpers for xsdigest benchmark suites.
//!
//! Builds synthetic libraries and result documents of a chosen size so the
//! benches time extraction and digesting, not setup.

use xsdigest_harness::library::{Library, LibrarySpec};
use xsdigest_harness::model::BaseModel;
use xsdigest_kernel::array::NdArray;
use xsdigest_kernel::key::DomainType;
use xsdigest_kernel::record::ResultRecord;

/// Categories used by every synthetic library: two vectors and one matrix.
pub const BENCH_CATEGORIES: &[&str] = &["transport", "nu-fission", "nu-scatter matrix"];

/// Evenly spaced group boundaries for `groups` groups.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn group_edges(groups: usize) -> Vec<f64> {
    (0..=groups).map(|i| i as f64 * 0.5).collect()
}

/// A model with `materials` materials (ids from 1) and one cell each.
///
/// # Panics
///
/// Panics if the generated document is not a valid model. Benchmark setup
/// failures are fatal.
#[must_use]
pub fn synthetic_model(materials: u32) -> BaseModel {
    let mats: Vec<_> = (1..=materials)
        .map(|id| serde_json::json!({"id": id, "name": format!("m{id}"), "density": 1.0}))
        .collect();
    let cells: Vec<_> = (1..=materials)
        .map(|id| serde_json::json!({"id": 1000 + id, "fill": id}))
        .collect();
    serde_json::from_value(serde_json::json!({
        "geometry": {"source": "synthetic", "cells": cells},
        "materials": mats,
        "settings": {"batches": 10, "inactive": 5, "particles": 1000}
    }))
    .expect("synthetic model is valid")
}

/// A material library over [`synthetic_model`].
///
/// # Panics
///
/// Panics if the library does not validate.
#[must_use]
pub fn synthetic_library(materials: u32, groups: usize) -> Library {
    let spec = LibrarySpec {
        energy_groups: group_edges(groups),
        mgxs_types: BENCH_CATEGORIES.iter().map(|s| (*s).to_string()).collect(),
        domain_type: "material".into(),
    };
    Library::build(&spec, &synthetic_model(materials)).expect("synthetic library is valid")
}

/// Records for every pair of `library`, with non-trivial values.
///
/// # Panics
///
/// Panics if a generated shape is inconsistent.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn synthetic_records(library: &Library) -> Vec<ResultRecord> {
    let groups = library.groups().num_groups();
    library
        .pairs()
        .map(|(id, category)| {
            let shape = if category.is_matrix() {
                vec![groups, groups]
            } else {
                vec![groups]
            };
            let len = shape.iter().product::<usize>();
            let average: Vec<f64> = (0..len)
                .map(|i| f64::from(id) / 3.0 + i as f64 * 1.0e-3)
                .collect();
            let std_dev: Vec<f64> = average.iter().map(|v| v * 0.017).collect();
            ResultRecord::new(
                DomainType::Material,
                id,
                category,
                NdArray::new(shape.clone(), average).expect("shape matches"),
                NdArray::new(shape, std_dev).expect("shape matches"),
            )
            .expect("moments agree")
        })
        .collect()
}

/// Serialized nested result document holding `records`.
///
/// # Panics
///
/// Panics if serialization fails.
#[must_use]
pub fn result_document(records: &[ResultRecord]) -> Vec<u8> {
    let store = Library::derived_store(records).expect("records are unique");
    serde_json::to_vec(&store.to_json()).expect("store serializes")
}


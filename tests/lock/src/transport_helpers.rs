//! Helpers shared by `fake_transport`, `pipeline_fixture` and the lock tests.
//!
//! The fake engine's values come from [`fake_moments`], so tests can
//! predict exact digests without re-implementing extraction.

use std::path::{Path, PathBuf};

use xsdigest_harness::config::HarnessConfig;

/// Average and std. dev. the fake engine reports for element `index` of
/// the `category_index`-th requested category of `domain_id`.
///
/// All values are short binary fractions, so their rendering is exact.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fake_moments(domain_id: u32, category_index: usize, index: usize) -> (f64, f64) {
    let step = (category_index + 1) as f64;
    let average = f64::from(domain_id) + step * 0.25 + index as f64 * 0.0625;
    let std_dev = step * 0.125;
    (average, std_dev)
}

/// Path of a binary built alongside the running test executable.
///
/// # Panics
///
/// Panics if the test executable's directory cannot be resolved.
#[must_use]
pub fn fixture_binary(name: &str) -> PathBuf {
    let mut path = std::env::current_exe()
        .expect("can resolve test binary path")
        .parent()
        .expect("binary dir exists")
        .to_path_buf();
    // Test executables live in `deps/`; binaries one level up.
    if path.ends_with("deps") {
        path.pop();
    }
    path.push(name);
    path
}

/// Two-material pin-cell configuration running `transport` with `args`.
///
/// # Panics
///
/// Panics if the assembled document is not a valid configuration, which
/// would be a bug in this helper.
#[must_use]
pub fn pin_cell_config(
    transport: &Path,
    args: &[&str],
    categories: &[&str],
    energy_groups: &[f64],
) -> HarnessConfig {
    let value = serde_json::json!({
        "model": {
            "geometry": {
                "source": "pin-cell",
                "cells": [
                    {"id": 10, "name": "fuel", "fill": 1},
                    {"id": 11, "name": "moderator", "fill": 2, "universe": 1}
                ]
            },
            "materials": [
                {"id": 1, "name": "UO2", "density": 10.29,
                 "nuclides": [{"name": "U235", "fraction": 0.02}, {"name": "U238", "fraction": 0.98}]},
                {"id": 2, "name": "water", "density": 0.74,
                 "nuclides": [{"name": "H1", "fraction": 0.667}, {"name": "O16", "fraction": 0.333}]}
            ],
            "settings": {"batches": 10, "inactive": 5, "particles": 1000}
        },
        "library": {
            "energy_groups": energy_groups,
            "mgxs_types": categories,
            "domain_type": "material"
        },
        "engine": {
            "kind": "process",
            "executable": transport,
            "args": args
        }
    });
    serde_json::from_value(value).expect("pin-cell configuration is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moments_are_exact_fractions() {
        assert_eq!(fake_moments(1, 0, 0), (1.25, 0.125));
        assert_eq!(fake_moments(2, 1, 3), (2.6875, 0.25));
    }

    #[test]
    fn config_validates() {
        let config = pin_cell_config(Path::new("transport"), &[], &["transport", "chi"], &[0.0, 20.0]);
        let library = config.validate().unwrap();
        assert_eq!(library.domains(), &[1, 2]);
    }
}

//! Base model: the geometry, materials and run settings a library is built on.
//!
//! Every struct rejects unknown keys, so a misspelled option fails when the
//! configuration is loaded instead of being silently ignored.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use xsdigest_kernel::key::DomainType;

use crate::error::ConfigError;

fn default_true() -> bool {
    true
}

/// A nuclide and its atom fraction within a material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NuclideSpec {
    pub name: String,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialSpec {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    /// Density in g/cm³.
    pub density: f64,
    #[serde(default)]
    pub nuclides: Vec<NuclideSpec>,
}

/// A geometric cell. `fill` names a material; `None` is void.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellSpec {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fill: Option<u32>,
    /// Universe the cell belongs to (0 is the root universe).
    #[serde(default)]
    pub universe: u32,
}

/// Geometry reference plus the cells it declares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeometrySpec {
    /// Name or path of the geometry definition the external program loads.
    pub source: String,
    #[serde(default)]
    pub cells: Vec<CellSpec>,
}

/// Output artifacts requested from the external program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputFlags {
    #[serde(default)]
    pub summary: bool,
    #[serde(default = "default_true")]
    pub tallies: bool,
}

impl Default for OutputFlags {
    fn default() -> Self {
        Self {
            summary: false,
            tallies: true,
        }
    }
}

/// Run settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsSpec {
    pub batches: u32,
    #[serde(default)]
    pub inactive: u32,
    pub particles: u64,
    #[serde(default)]
    pub output: OutputFlags,
}

/// The base model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaseModel {
    pub geometry: GeometrySpec,
    pub materials: Vec<MaterialSpec>,
    pub settings: SettingsSpec,
}

impl BaseModel {
    /// Check structural consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for duplicate material or cell ids, cells
    /// filled with undeclared materials, or out-of-range settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut materials = BTreeSet::new();
        for material in &self.materials {
            if !materials.insert(material.id) {
                return Err(ConfigError::DuplicateDomain {
                    domain_type: DomainType::Material,
                    id: material.id,
                });
            }
        }
        let mut cells = BTreeSet::new();
        for cell in &self.geometry.cells {
            if !cells.insert(cell.id) {
                return Err(ConfigError::DuplicateDomain {
                    domain_type: DomainType::Cell,
                    id: cell.id,
                });
            }
            if let Some(material) = cell.fill {
                if !materials.contains(&material) {
                    return Err(ConfigError::UndeclaredFill {
                        cell: cell.id,
                        material,
                    });
                }
            }
        }
        let settings = &self.settings;
        if settings.batches == 0 || settings.particles == 0 {
            return Err(ConfigError::Settings {
                detail: "batches and particles must be positive".into(),
            });
        }
        if settings.inactive >= settings.batches {
            return Err(ConfigError::Settings {
                detail: format!(
                    "inactive batches ({}) must be fewer than batches ({})",
                    settings.inactive, settings.batches
                ),
            });
        }
        Ok(())
    }

    /// Domain ids of `domain_type` in declaration order.
    ///
    /// Universes are listed in order of first appearance among the cells.
    #[must_use]
    pub fn domain_ids(&self, domain_type: DomainType) -> Vec<u32> {
        match domain_type {
            DomainType::Material => self.materials.iter().map(|m| m.id).collect(),
            DomainType::Cell => self.geometry.cells.iter().map(|c| c.id).collect(),
            DomainType::Universe => {
                let mut seen = BTreeSet::new();
                self.geometry
                    .cells
                    .iter()
                    .map(|c| c.universe)
                    .filter(|u| seen.insert(*u))
                    .collect()
            }
        }
    }
}

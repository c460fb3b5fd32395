//! Energy group structures.
//!
//! An [`EnergyGroups`] value is a validated, strictly increasing sequence of
//! group boundaries. `n` boundaries define `n - 1` groups. Construction is
//! the only place the invariant is checked; every other consumer may rely
//! on it.

use serde::{Deserialize, Serialize};

/// Why a boundary sequence was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GroupError {
    /// Fewer than two boundaries (no complete group).
    #[error("energy group structure needs at least 2 boundaries, got {count}")]
    TooFewEdges { count: usize },
    /// A boundary is NaN or infinite.
    #[error("energy group boundary {index} is not finite: {value}")]
    NonFiniteEdge { index: usize, value: f64 },
    /// Boundary `index` is not strictly greater than boundary `index - 1`.
    #[error("energy group boundaries must be strictly increasing: edge {index} ({value}) does not exceed {previous}")]
    NotIncreasing {
        index: usize,
        previous: f64,
        value: f64,
    },
}

/// Strictly increasing group boundaries (at least two).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EnergyGroups {
    edges: Vec<f64>,
}

impl EnergyGroups {
    /// Validate and wrap a boundary sequence.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError`] if fewer than two boundaries are given, any
    /// boundary is non-finite, or the sequence is not strictly increasing.
    pub fn new(edges: Vec<f64>) -> Result<Self, GroupError> {
        if edges.len() < 2 {
            return Err(GroupError::TooFewEdges { count: edges.len() });
        }
        for (index, &value) in edges.iter().enumerate() {
            if !value.is_finite() {
                return Err(GroupError::NonFiniteEdge { index, value });
            }
            if index > 0 {
                let previous = edges[index - 1];
                if value <= previous {
                    return Err(GroupError::NotIncreasing {
                        index,
                        previous,
                        value,
                    });
                }
            }
        }
        Ok(Self { edges })
    }

    /// The boundaries, lowest first.
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of groups (`edges - 1`, always at least 1).
    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.edges.len() - 1
    }
}

impl<'de> Deserialize<'de> for EnergyGroups {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let edges = Vec::<f64>::deserialize(deserializer)?;
        Self::new(edges).map_err(serde::de::Error::custom)
    }
}

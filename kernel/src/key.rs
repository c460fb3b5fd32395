//! Result addressing: domain types, result categories, and key paths.
//!
//! Every dataset in a result store is addressed by
//! `<domain_type>/<domain_id>/<category>/<moment>`, where `moment` is
//! `average` or `std. dev.`. This module is the single authority for the
//! spelling of each segment.

use std::fmt;
use std::str::FromStr;

/// An unrecognized domain type or category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// The domain type is not one of [`DomainType::ALL`].
    #[error("unknown domain type {name:?} (expected one of: {expected})")]
    UnknownDomainType { name: String, expected: String },
    /// The category is not one of [`Category::ALL`].
    #[error("unknown result category {name:?}")]
    UnknownCategory { name: String },
}

/// Kind of domain results are attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DomainType {
    /// A material (composition-defined domain).
    Material,
    /// A geometric cell (spatial region).
    Cell,
    /// A universe (spatial region composed of cells).
    Universe,
}

impl DomainType {
    /// All domain types in declaration order.
    pub const ALL: &[DomainType] = &[Self::Material, Self::Cell, Self::Universe];

    /// Key-path spelling (`"material"`, `"cell"`, `"universe"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Material => "material",
            Self::Cell => "cell",
            Self::Universe => "universe",
        }
    }
}

impl fmt::Display for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainType {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| KeyError::UnknownDomainType {
                name: s.to_string(),
                expected: Self::ALL
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Which half of a result record a dataset holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Moment {
    /// Sample mean.
    Average,
    /// Standard deviation of the mean.
    StdDev,
}

impl Moment {
    /// Key-path spelling (`"average"`, `"std. dev."`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::StdDev => "std. dev.",
        }
    }
}

/// Declares `Category`, its name table, score table and `ALL` from one list.
macro_rules! define_categories {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $name:literal, matrix = $matrix:literal, scores = [$($score:literal),+ $(,)?]
        ),+ $(,)?
    ) => {
        /// A recognized multi-group result category.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Category {
            $(
                $(#[$meta])*
                $variant,
            )+
        }

        impl Category {
            /// All categories in declaration order.
            ///
            /// Generated from the same macro invocation as the enum, so it cannot diverge.
            pub const ALL: &[Category] = &[
                $( Self::$variant, )+
            ];

            /// Canonical name as it appears in key paths and digest headers.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )+
                }
            }

            /// Whether results carry an outgoing-group axis (`[G, G]` shape).
            #[must_use]
            pub const fn is_matrix(self) -> bool {
                match self {
                    $( Self::$variant => $matrix, )+
                }
            }

            /// Tally scores the external program must accumulate.
            #[must_use]
            pub const fn scores(self) -> &'static [&'static str] {
                match self {
                    $( Self::$variant => &[$($score),+], )+
                }
            }
        }
    };
}

define_categories! {
    /// Total cross section.
    Total => "total", matrix = false, scores = ["flux", "total"],
    /// Transport-corrected total cross section.
    Transport => "transport", matrix = false, scores = ["flux", "total", "scatter-1"],
    /// Transport cross section using the multiplicity-weighted P1 moment.
    NuTransport => "nu-transport", matrix = false, scores = ["flux", "total", "nu-scatter-1"],
    Absorption => "absorption", matrix = false, scores = ["flux", "absorption"],
    Capture => "capture", matrix = false, scores = ["flux", "absorption", "fission"],
    Fission => "fission", matrix = false, scores = ["flux", "fission"],
    NuFission => "nu-fission", matrix = false, scores = ["flux", "nu-fission"],
    KappaFission => "kappa-fission", matrix = false, scores = ["flux", "kappa-fission"],
    Scatter => "scatter", matrix = false, scores = ["flux", "scatter"],
    NuScatter => "nu-scatter", matrix = false, scores = ["flux", "nu-scatter"],
    /// Group-to-group scattering.
    ScatterMatrix => "scatter matrix", matrix = true, scores = ["flux", "scatter"],
    NuScatterMatrix => "nu-scatter matrix", matrix = true, scores = ["flux", "nu-scatter"],
    /// Ratio of nu-scatter to scatter per group pair.
    MultiplicityMatrix => "multiplicity matrix", matrix = true, scores = ["nu-scatter", "scatter"],
    NuFissionMatrix => "nu-fission matrix", matrix = true, scores = ["flux", "nu-fission"],
    /// Fission emission spectrum. Tallied per outgoing group, reported as `[G]`.
    Chi => "chi", matrix = false, scores = ["nu-fission"],
    ChiPrompt => "chi-prompt", matrix = false, scores = ["prompt-nu-fission"],
    InverseVelocity => "inverse-velocity", matrix = false, scores = ["flux", "inverse-velocity"],
    PromptNuFission => "prompt-nu-fission", matrix = false, scores = ["flux", "prompt-nu-fission"],
}

impl Category {
    /// Whether the tally needs an outgoing-energy filter.
    ///
    /// True for matrices and for the emission spectra, which bin the
    /// secondary particle energy.
    #[must_use]
    pub const fn needs_energyout(self) -> bool {
        self.is_matrix() || matches!(self, Self::Chi | Self::ChiPrompt)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| KeyError::UnknownCategory {
                name: s.to_string(),
            })
    }
}

/// Dataset key path for one moment of a domain/category pair.
///
/// Format: `<domain_type>/<domain_id>/<category>/<moment>`.
#[must_use]
pub fn key_path(domain_type: DomainType, domain_id: u32, category: Category, moment: Moment) -> String {
    format!(
        "{}/{}/{}/{}",
        domain_type.as_str(),
        domain_id,
        category.as_str(),
        moment.as_str()
    )
}

//! Multi-group result library: which domains, which categories, which groups.
//!
//! A [`Library`] is built once from a [`LibrarySpec`] and the base model. It
//! fixes the iteration order used everywhere downstream: domains in the
//! model's declaration order, categories in the order the caller listed
//! them. Neither is ever re-sorted.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use xsdigest_kernel::array::NdArray;
use xsdigest_kernel::groups::EnergyGroups;
use xsdigest_kernel::key::{key_path, Category, DomainType, Moment};
use xsdigest_kernel::record::{RecordError, ResultRecord};
use xsdigest_kernel::store::{JsonStore, ResultStore, StoreError};

use crate::error::ConfigError;
use crate::model::BaseModel;

/// Library options as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibrarySpec {
    /// Group boundaries, strictly increasing.
    pub energy_groups: Vec<f64>,
    /// Result category names, in digest order.
    pub mgxs_types: Vec<String>,
    /// `"material"`, `"cell"` or `"universe"`.
    pub domain_type: String,
}

/// A validated library.
#[derive(Debug, Clone, PartialEq)]
pub struct Library {
    domain_type: DomainType,
    groups: EnergyGroups,
    categories: Vec<Category>,
    domains: Vec<u32>,
}

/// What a derived tally is accumulated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TallyTarget {
    pub domain_type: String,
    pub domain_id: u32,
    pub category: String,
}

/// A tally filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum FilterSpec {
    /// Restrict to one domain.
    Domain { domain_type: String, bins: Vec<u32> },
    /// Incoming-energy bins.
    Energy { bins: Vec<f64> },
    /// Outgoing-energy bins.
    Energyout { bins: Vec<f64> },
}

/// One derived tally definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TallySpec {
    pub id: u32,
    pub name: String,
    pub target: TallyTarget,
    pub filters: Vec<FilterSpec>,
    pub scores: Vec<String>,
}

impl Library {
    /// Validate `spec` against `model`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the group boundaries are invalid, a
    /// category or the domain type is unknown, a category repeats, no
    /// category is given, or the model has no domain of the requested type.
    pub fn build(spec: &LibrarySpec, model: &BaseModel) -> Result<Self, ConfigError> {
        let groups = EnergyGroups::new(spec.energy_groups.clone())?;
        let domain_type: DomainType = spec.domain_type.parse()?;

        if spec.mgxs_types.is_empty() {
            return Err(ConfigError::EmptyCategories);
        }
        let mut seen = BTreeSet::new();
        let mut categories = Vec::with_capacity(spec.mgxs_types.len());
        for name in &spec.mgxs_types {
            let category: Category = name.parse()?;
            if !seen.insert(category) {
                return Err(ConfigError::DuplicateCategory { name: name.clone() });
            }
            categories.push(category);
        }

        let domains = model.domain_ids(domain_type);
        if domains.is_empty() {
            return Err(ConfigError::NoDomains { domain_type });
        }

        Ok(Self {
            domain_type,
            groups,
            categories,
            domains,
        })
    }

    #[must_use]
    pub fn domain_type(&self) -> DomainType {
        self.domain_type
    }

    #[must_use]
    pub fn groups(&self) -> &EnergyGroups {
        &self.groups
    }

    /// Categories in digest order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Domain ids in digest order.
    #[must_use]
    pub fn domains(&self) -> &[u32] {
        &self.domains
    }

    /// Every (domain, category) pair in digest order: domain-major.
    pub fn pairs(&self) -> impl Iterator<Item = (u32, Category)> + '_ {
        self.domains
            .iter()
            .flat_map(move |&id| self.categories.iter().map(move |&c| (id, c)))
    }

    /// Derived tallies, one per (domain, category) pair, ids from 1.
    #[must_use]
    pub fn tallies(&self) -> Vec<TallySpec> {
        let edges = self.groups.edges().to_vec();
        self.pairs()
            .zip(1u32..)
            .map(|((domain_id, category), id)| {
                let mut filters = vec![
                    FilterSpec::Domain {
                        domain_type: self.domain_type.as_str().to_string(),
                        bins: vec![domain_id],
                    },
                    FilterSpec::Energy {
                        bins: edges.clone(),
                    },
                ];
                if category.needs_energyout() {
                    filters.push(FilterSpec::Energyout {
                        bins: edges.clone(),
                    });
                }
                TallySpec {
                    id,
                    name: format!("{} {} {}", self.domain_type, domain_id, category),
                    target: TallyTarget {
                        domain_type: self.domain_type.as_str().to_string(),
                        domain_id,
                        category: category.as_str().to_string(),
                    },
                    filters,
                    scores: category.scores().iter().map(|s| (*s).to_string()).collect(),
                }
            })
            .collect()
    }

    /// Resolve every configured pair from `store`, in digest order.
    ///
    /// # Errors
    ///
    /// Returns the first [`RecordError`]; a missing pair is never skipped.
    pub fn load_records(&self, store: &dyn ResultStore) -> Result<Vec<ResultRecord>, RecordError> {
        self.pairs()
            .map(|(id, category)| ResultRecord::load(store, self.domain_type, id, category))
            .collect()
    }

    /// Build the derived store holding exactly `records`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] if two records share a pair.
    pub fn derived_store(records: &[ResultRecord]) -> Result<JsonStore, StoreError> {
        let mut store = JsonStore::new();
        for record in records {
            for moment in [Moment::Average, Moment::StdDev] {
                let key = key_path(record.domain_type, record.domain_id, record.category, moment);
                let array: NdArray = record.moment(moment).clone();
                store.insert(key, array)?;
            }
        }
        Ok(store)
    }
}

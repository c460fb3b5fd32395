//! Result records: the paired average / std. dev. arrays of one domain and
//! category.

use crate::array::NdArray;
use crate::key::{key_path, Category, DomainType, Moment};
use crate::store::ResultStore;

/// Error resolving a record from a store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// A required dataset is absent.
    #[error("missing result entry {key}")]
    MissingKey { key: String },
    /// Average and std. dev. arrays disagree in shape.
    #[error("shape mismatch for {domain_type}/{domain_id}/{category}: average {average:?}, std. dev. {std_dev:?}")]
    ShapeMismatch {
        domain_type: DomainType,
        domain_id: u32,
        category: Category,
        average: Vec<usize>,
        std_dev: Vec<usize>,
    },
}

/// Average and standard deviation for one domain/category pair.
///
/// Invariant: `average` and `std_dev` have the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub domain_type: DomainType,
    pub domain_id: u32,
    pub category: Category,
    average: NdArray,
    std_dev: NdArray,
}

impl ResultRecord {
    /// Pair two arrays, checking the shape invariant.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::ShapeMismatch`] if the shapes differ.
    pub fn new(
        domain_type: DomainType,
        domain_id: u32,
        category: Category,
        average: NdArray,
        std_dev: NdArray,
    ) -> Result<Self, RecordError> {
        if average.shape() != std_dev.shape() {
            return Err(RecordError::ShapeMismatch {
                domain_type,
                domain_id,
                category,
                average: average.shape().to_vec(),
                std_dev: std_dev.shape().to_vec(),
            });
        }
        Ok(Self {
            domain_type,
            domain_id,
            category,
            average,
            std_dev,
        })
    }

    /// Resolve both moments of a pair from `store`.
    ///
    /// The average is looked up first; when both are missing the error names
    /// the average key.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingKey`] naming the first absent key path,
    /// or [`RecordError::ShapeMismatch`].
    pub fn load(
        store: &dyn ResultStore,
        domain_type: DomainType,
        domain_id: u32,
        category: Category,
    ) -> Result<Self, RecordError> {
        let fetch = |moment: Moment| {
            let key = key_path(domain_type, domain_id, category, moment);
            store
                .dataset(&key)
                .cloned()
                .ok_or(RecordError::MissingKey { key })
        };
        let average = fetch(Moment::Average)?;
        let std_dev = fetch(Moment::StdDev)?;
        Self::new(domain_type, domain_id, category, average, std_dev)
    }

    #[must_use]
    pub fn average(&self) -> &NdArray {
        &self.average
    }

    #[must_use]
    pub fn std_dev(&self) -> &NdArray {
        &self.std_dev
    }

    /// The array stored under `moment`.
    #[must_use]
    pub fn moment(&self, moment: Moment) -> &NdArray {
        match moment {
            Moment::Average => &self.average,
            Moment::StdDev => &self.std_dev,
        }
    }
}

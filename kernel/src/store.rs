//! Key-path addressed result stores.
//!
//! A result file is a JSON document. Nested objects are flattened into
//! `/`-joined key paths, so both of these address
//! `material/1/transport/average`:
//!
//! ```text
//! {"material": {"1": {"transport": {"average": [1.0]}}}}
//! {"material/1/transport/average": [1.0]}
//! ```
//!
//! Numbers and rectangular numeric arrays are datasets. String, boolean and
//! null leaves are metadata and are not addressable, and so are arrays with
//! no numeric element (`"nuclides": ["total"]`). A malformed numeric leaf
//! fails the whole load: a partially readable result file is not a result
//! file.

use std::collections::BTreeMap;
use std::path::Path;

use crate::array::{ArrayError, NdArray};

/// Error loading or writing a result store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid JSON.
    #[error("result store is not valid JSON: {detail}")]
    Parse { detail: String },
    /// The document root is not a JSON object.
    #[error("result store root must be an object, found {found}")]
    NotAnObject { found: String },
    /// A numeric leaf is not a rectangular array.
    #[error("dataset {key}: {source}")]
    Dataset {
        key: String,
        #[source]
        source: ArrayError,
    },
    /// The same key path is defined twice (flat and nested spelling).
    #[error("duplicate dataset key {key}")]
    DuplicateKey { key: String },
}

/// Read-only access to datasets by key path.
pub trait ResultStore {
    /// The dataset at `key`, if present.
    fn dataset(&self, key: &str) -> Option<&NdArray>;

    /// Whether `key` addresses a dataset.
    fn contains(&self, key: &str) -> bool {
        self.dataset(key).is_some()
    }
}

/// An in-memory store backed by a flattened JSON document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonStore {
    datasets: BTreeMap<String, NdArray>,
}

impl JsonStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and flatten the file at `path`.
    ///
    /// The file is read completely and closed before parsing starts.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read, otherwise any
    /// error of [`JsonStore::from_slice`].
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let bytes = std::fs::read(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_slice(&bytes)
    }

    /// Parse and flatten a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the bytes are not a JSON object, a numeric
    /// leaf is malformed, or a key path is defined twice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, StoreError> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| StoreError::Parse {
                detail: e.to_string(),
            })?;
        Self::from_value(&value)
    }

    /// Flatten an already-parsed document.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::from_slice`].
    pub fn from_value(value: &serde_json::Value) -> Result<Self, StoreError> {
        let serde_json::Value::Object(map) = value else {
            return Err(StoreError::NotAnObject {
                found: kind_name(value).to_string(),
            });
        };
        let mut store = Self::new();
        for (key, child) in map {
            store.flatten(key.clone(), child)?;
        }
        Ok(store)
    }

    fn flatten(&mut self, prefix: String, value: &serde_json::Value) -> Result<(), StoreError> {
        match value {
            serde_json::Value::Object(map) => {
                for (key, child) in map {
                    self.flatten(format!("{prefix}/{key}"), child)?;
                }
                Ok(())
            }
            serde_json::Value::Array(_) if is_metadata_array(value) => Ok(()),
            serde_json::Value::Number(_) | serde_json::Value::Array(_) => {
                let array = NdArray::from_json(value).map_err(|source| StoreError::Dataset {
                    key: prefix.clone(),
                    source,
                })?;
                self.insert(prefix, array)
            }
            serde_json::Value::String(_) | serde_json::Value::Bool(_) | serde_json::Value::Null => {
                Ok(())
            }
        }
    }

    /// Add a dataset.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateKey`] if `key` already holds a dataset.
    pub fn insert(&mut self, key: String, array: NdArray) -> Result<(), StoreError> {
        if self.datasets.contains_key(&key) {
            return Err(StoreError::DuplicateKey { key });
        }
        self.datasets.insert(key, array);
        Ok(())
    }

    /// Number of datasets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Dataset key paths in byte order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    /// Flat JSON object (`{"<key path>": <array>}`) readable by [`JsonStore::from_value`].
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .datasets
            .iter()
            .map(|(key, array)| (key.clone(), array.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl ResultStore for JsonStore {
    fn dataset(&self, key: &str) -> Option<&NdArray> {
        self.datasets.get(key)
    }
}

/// An array whose leaves include no number. Empty arrays stay datasets.
fn is_metadata_array(value: &serde_json::Value) -> bool {
    fn scan(value: &serde_json::Value, seen_leaf: &mut bool) -> bool {
        match value {
            serde_json::Value::Number(_) => false,
            serde_json::Value::Array(items) => items.iter().all(|item| scan(item, seen_leaf)),
            _ => {
                *seen_leaf = true;
                true
            }
        }
    }
    let mut seen_leaf = false;
    scan(value, &mut seen_leaf) && seen_leaf
}

fn kind_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

//! xsdigest kernel: the deterministic data layer of the result-digest harness.
//!
//! # API Surface
//!
//! - [`groups::EnergyGroups`] -- validated group boundaries
//! - [`key::key_path`] -- the `<domain_type>/<id>/<category>/<moment>` convention
//! - [`store::JsonStore`] -- key-path addressed datasets loaded from a result file
//! - [`record::ResultRecord::load`] -- resolve one domain/category pair
//! - [`digest::digest_records`] -- canonical buffer, optionally SHA-512 hashed
//!
//! # Module Dependency Direction
//!
//! `groups`, `key`, `array` ← `store` ← `record` ← `digest`
//!
//! One-way only. The kernel performs no process execution and writes no
//! files; that is the harness's job.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod array;
pub mod digest;
pub mod groups;
pub mod key;
pub mod record;
pub mod store;

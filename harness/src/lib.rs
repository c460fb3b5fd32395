//! xsdigest harness: runs a transport engine and digests its results.
//!
//! The harness builds an input deck from a base model and a multi-group
//! library definition, runs an external engine on it, extracts every
//! configured (domain, category) result, and reduces them to a canonical
//! digest compared against a stored reference.
//!
//! The harness does NOT interpret physics. Canonical rendering and hashing
//! live in the kernel; the harness owns files, processes and ordering.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod contract;
pub mod engines;
pub mod error;
pub mod extract;
pub mod input;
pub mod library;
pub mod logging;
pub mod model;
pub mod results;
pub mod runner;
pub mod workdir;

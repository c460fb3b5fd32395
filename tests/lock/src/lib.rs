//! Shared support for the lock tests and their fixture binaries.

pub mod transport_helpers;

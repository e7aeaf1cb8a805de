//! Shared test helpers
//!
//! Tolerance assertions and topology fixtures used by the integration tests.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

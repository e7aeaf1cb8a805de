//! Common utilities shared by the geometry, sampling and belief modules.
//!
//! This module contains the deterministic random source and the numerical
//! constants used by the update engine.

pub mod constants;
pub mod rng;

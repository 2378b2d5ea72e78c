//! CLI command implementations.

pub mod fetch;
pub mod hash;
pub mod languages;

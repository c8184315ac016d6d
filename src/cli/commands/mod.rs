//! CLI command implementations.

pub mod regions;
pub mod screen;
pub mod validate;

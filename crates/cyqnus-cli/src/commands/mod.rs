//! CLI command implementations.

pub mod common;
pub mod params;
pub mod patch;
pub mod render;

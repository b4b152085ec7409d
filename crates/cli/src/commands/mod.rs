//! CLI command implementations.

pub mod product;

//! Copper Kettle Core - Shared types library.
//!
//! This crate provides the common types used across the Copper Kettle admin
//! client components:
//!
//! - `client` - The authenticated product-submission client
//! - `cli` - Command-line front end for operators
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no identity
//! provider access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - The product draft form buffer, its validation rules, and the
//!   submission outcome taxonomy

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

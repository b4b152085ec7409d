//! Core types for the Copper Kettle admin client.
//!
//! This module provides the product draft buffer and the outcome taxonomy
//! shared between the submission client and its presentation layers.

pub mod draft;
pub mod outcome;

pub use draft::{DraftError, DraftField, ImageFile, ProductDraft, ValidatedProduct};
pub use outcome::SubmissionOutcome;

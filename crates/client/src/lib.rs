//! Copper Kettle Client - authenticated product submission.
//!
//! This crate is the client-side half of the admin product-management
//! feature: it acquires a bearer credential from an identity provider, builds
//! a multipart `POST /product/create` request from the operator's product
//! draft, and classifies the backend's response into a
//! [`SubmissionOutcome`](copper_kettle_core::SubmissionOutcome) for the
//! presentation layer.
//!
//! # Components
//!
//! - [`identity`] - The [`IdentityProvider`](identity::IdentityProvider) seam,
//!   the [`TokenProvider`](identity::TokenProvider) that turns a session into
//!   a bearer credential, and adapters (Firebase-style REST, static).
//! - [`transport`] - The [`MultipartTransport`](transport::MultipartTransport)
//!   seam and its reqwest-backed implementation.
//! - [`product`] - The [`SubmissionController`](product::SubmissionController)
//!   owning the draft buffer and the Idle/Submitting state machine.
//! - [`config`] - Environment-based configuration.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod identity;
pub mod product;
pub mod transport;

pub use config::{ClientConfig, ConfigError, FirebaseConfig};
pub use identity::firebase::FirebaseIdentity;
pub use identity::static_provider::StaticIdentity;
pub use identity::{AuthError, IdToken, IdentityError, IdentityProvider, Session, TokenProvider};
pub use product::{CREATE_PRODUCT_PATH, SubmissionController};
pub use transport::{
    FormPart, HttpTransport, MultipartForm, MultipartTransport, PartBody, TransportError,
    TransportResponse,
};

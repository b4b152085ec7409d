//! Identity provider seam and bearer credential acquisition.
//!
//! The identity provider is an external collaborator: it knows whether an
//! operator is signed in and can mint short-lived ID tokens for them. This
//! module defines the [`IdentityProvider`] port, the [`TokenProvider`] that
//! turns an active session into a bearer credential, and the error taxonomy
//! between them.
//!
//! # Adapters
//!
//! - [`firebase::FirebaseIdentity`] - Firebase-style secure-token REST
//!   adapter with a cached, expiry-buffered ID token.
//! - [`static_provider::StaticIdentity`] - deterministic provider for tests
//!   and offline use.

pub mod firebase;
pub mod static_provider;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

/// A signed-in operator session, as reported by the identity provider.
///
/// Passed explicitly into token requests rather than read from ambient
/// global state, so credential acquisition is a function of its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Provider-assigned user identifier.
    pub user_id: String,
    /// Operator email, when the provider exposes one.
    pub email: Option<String>,
}

impl Session {
    /// Create a session for the given user.
    #[must_use]
    pub const fn new(user_id: String, email: Option<String>) -> Self {
        Self { user_id, email }
    }
}

/// An opaque bearer credential minted by the identity provider.
///
/// The raw token only leaves this type when written into an `Authorization`
/// header; `Debug` output is redacted.
#[derive(Debug, Clone)]
pub struct IdToken {
    raw: SecretString,
}

impl IdToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: SecretString::from(raw.into()),
        }
    }

    /// Expose the raw token for header construction.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.raw.expose_secret()
    }
}

/// Errors surfaced by identity provider adapters.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The provider could not be reached.
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the token request (revoked session, bad key).
    #[error("identity provider rejected the token request: {0}")]
    Rejected(String),

    /// The provider answered with a body we could not interpret.
    #[error("malformed identity provider response: {0}")]
    Parse(String),
}

/// Port to the external identity provider.
///
/// # Contract
///
/// Implementations must:
/// - Return `None` from [`current_session`](Self::current_session) when no
///   operator is signed in.
/// - Pass `force_refresh` through verbatim: `true` must bypass any
///   provider-side token cache.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The active session, if an operator is signed in.
    fn current_session(&self) -> Option<Session>;

    /// Mint an ID token for the given session.
    async fn id_token(
        &self,
        session: &Session,
        force_refresh: bool,
    ) -> Result<IdToken, IdentityError>;
}

/// Errors produced while acquiring a credential.
///
/// The provider's own message is preserved for diagnostics; presentation
/// layers are expected to show a generic notice instead.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    /// No operator is signed in.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The identity provider failed or rejected the request.
    #[error("identity provider error: {0}")]
    Provider(String),
}

/// Produces a current, valid bearer credential for the signed-in operator.
pub struct TokenProvider<P> {
    provider: P,
}

impl<P: IdentityProvider> TokenProvider<P> {
    /// Wrap an identity provider.
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Access the wrapped provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Acquire a bearer credential for the active session.
    ///
    /// `force_refresh` is passed through to the provider verbatim; the
    /// submission flow always uses `false`, while explicit re-authentication
    /// actions may force a fresh token unaffected by clock skew or
    /// near-expiry edge cases.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] when no session exists, and
    /// [`AuthError::Provider`] when the provider fails; the provider message
    /// is logged and carried for diagnostics.
    #[instrument(skip(self))]
    pub async fn acquire(&self, force_refresh: bool) -> Result<IdToken, AuthError> {
        let session = self
            .provider
            .current_session()
            .ok_or(AuthError::NotAuthenticated)?;

        self.provider
            .id_token(&session, force_refresh)
            .await
            .map_err(|err| {
                tracing::warn!(user_id = %session.user_id, error = %err, "token request failed");
                AuthError::Provider(err.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::static_provider::StaticIdentity;
    use super::*;

    #[tokio::test]
    async fn test_acquire_without_session_is_not_authenticated() {
        let tokens = TokenProvider::new(StaticIdentity::signed_out());

        let err = tokens.acquire(false).await.expect_err("no session exists");
        assert!(matches!(err, AuthError::NotAuthenticated));
        assert_eq!(err.to_string(), "not authenticated");
    }

    #[tokio::test]
    async fn test_acquire_returns_provider_token() {
        let provider = StaticIdentity::signed_in("op-1", "token-abc");
        let tokens = TokenProvider::new(provider);

        let token = tokens.acquire(false).await.expect("session is active");
        assert_eq!(token.expose(), "token-abc");
    }

    #[tokio::test]
    async fn test_force_refresh_passed_through_verbatim() {
        let provider = StaticIdentity::signed_in("op-1", "token-abc");
        let tokens = TokenProvider::new(provider);

        tokens.acquire(true).await.expect("session is active");
        tokens.acquire(false).await.expect("session is active");

        assert_eq!(tokens.provider.force_refresh_calls(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_provider_failure_preserves_message_for_diagnostics() {
        let provider = StaticIdentity::signed_in("op-1", "token-abc")
            .with_failure("TOKEN_EXPIRED: session revoked");
        let tokens = TokenProvider::new(provider);

        let err = tokens.acquire(false).await.expect_err("provider fails");
        match err {
            AuthError::Provider(reason) => assert!(reason.contains("TOKEN_EXPIRED")),
            AuthError::NotAuthenticated => panic!("expected a provider error"),
        }
    }

    #[test]
    fn test_id_token_debug_is_redacted() {
        let token = IdToken::new("very-secret-jwt");
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("very-secret-jwt"));
    }
}

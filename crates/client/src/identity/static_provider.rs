//! Deterministic identity provider for tests and offline use.

use std::sync::Mutex;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use super::{IdToken, IdentityError, IdentityProvider, Session};

/// An identity provider with a fixed session and token.
///
/// Useful for exercising the submission flow without a live identity
/// provider: a signed-in instance always mints the configured token, a
/// signed-out one reports no session, and [`with_failure`](Self::with_failure)
/// turns every token request into a rejection.
///
/// Every `force_refresh` flag received is recorded for inspection.
#[derive(Debug, Default)]
pub struct StaticIdentity {
    session: Option<Session>,
    token: Option<SecretString>,
    failure: Option<String>,
    refresh_flags: Mutex<Vec<bool>>,
}

impl StaticIdentity {
    /// A provider with an active session that mints `token`.
    #[must_use]
    pub fn signed_in(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            session: Some(Session::new(user_id.into(), None)),
            token: Some(SecretString::from(token.into())),
            ..Self::default()
        }
    }

    /// A provider with no active session.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Reject every token request with the given provider message.
    #[must_use]
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// The `force_refresh` flags received so far, in call order.
    #[must_use]
    pub fn force_refresh_calls(&self) -> Vec<bool> {
        match self.refresh_flags.lock() {
            Ok(flags) => flags.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    fn current_session(&self) -> Option<Session> {
        self.session.clone()
    }

    async fn id_token(
        &self,
        _session: &Session,
        force_refresh: bool,
    ) -> Result<IdToken, IdentityError> {
        match self.refresh_flags.lock() {
            Ok(mut flags) => flags.push(force_refresh),
            Err(poisoned) => poisoned.into_inner().push(force_refresh),
        }

        if let Some(message) = &self.failure {
            return Err(IdentityError::Rejected(message.clone()));
        }

        self.token
            .as_ref()
            .map(|token| IdToken::new(token.expose_secret()))
            .ok_or_else(|| IdentityError::Rejected("no token configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signed_out_provider_has_no_session() {
        let provider = StaticIdentity::signed_out();
        assert!(provider.current_session().is_none());
    }

    #[tokio::test]
    async fn test_signed_in_provider_mints_configured_token() {
        let provider = StaticIdentity::signed_in("op-1", "fixed-token");
        let session = provider.current_session().expect("signed in");
        assert_eq!(session.user_id, "op-1");

        let token = provider
            .id_token(&session, false)
            .await
            .expect("token configured");
        assert_eq!(token.expose(), "fixed-token");
    }

    #[tokio::test]
    async fn test_failure_rejects_every_request() {
        let provider = StaticIdentity::signed_in("op-1", "fixed-token").with_failure("revoked");
        let session = provider.current_session().expect("signed in");

        let err = provider
            .id_token(&session, false)
            .await
            .expect_err("configured to fail");
        assert!(matches!(err, IdentityError::Rejected(_)));
    }
}

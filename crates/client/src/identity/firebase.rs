//! Firebase-style secure-token identity adapter.
//!
//! Exchanges a long-lived refresh token for short-lived ID tokens at the
//! secure-token REST endpoint and caches the current token until it nears
//! expiry. A `force_refresh` request bypasses the cache and always performs
//! a fresh exchange.

use std::sync::Mutex;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use super::{IdToken, IdentityError, IdentityProvider, Session};

/// Secure-token exchange endpoint.
const TOKEN_ENDPOINT: &str = "https://securetoken.googleapis.com/v1/token";

/// Tokens within this many seconds of expiry are treated as expired.
const EXPIRY_BUFFER_SECS: i64 = 60;

/// An ID token with its absolute expiry timestamp.
#[derive(Clone)]
struct CachedToken {
    id_token: SecretString,
    /// Unix timestamp when the token expires.
    expires_at: i64,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at - EXPIRY_BUFFER_SECS
    }
}

/// Successful response from the secure-token endpoint.
///
/// The endpoint serializes numbers as strings.
#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    /// Token lifetime in seconds, as decimal text.
    expires_in: String,
}

/// Error response from the secure-token endpoint.
#[derive(Deserialize)]
struct RefreshErrorResponse {
    #[serde(default)]
    error: Option<RefreshErrorBody>,
}

#[derive(Deserialize)]
struct RefreshErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Identity provider backed by the Firebase secure-token REST API.
///
/// Holds the operator's session alongside the refresh token that proves it;
/// both are supplied explicitly at construction rather than read from any
/// ambient signed-in state.
pub struct FirebaseIdentity {
    client: reqwest::Client,
    api_key: SecretString,
    refresh_token: SecretString,
    session: Session,
    cached: Mutex<Option<CachedToken>>,
}

impl FirebaseIdentity {
    /// Create an adapter for the given operator session.
    #[must_use]
    pub fn new(api_key: SecretString, refresh_token: SecretString, session: Session) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            refresh_token,
            session,
            cached: Mutex::new(None),
        }
    }

    /// Use a preconfigured reqwest client (proxies, timeouts).
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn cached_token(&self) -> Option<CachedToken> {
        let slot = match self.cached.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        slot.clone().filter(|token| !token.is_expired())
    }

    fn store(&self, token: CachedToken) {
        let mut slot = match self.cached.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = Some(token);
    }

    /// Exchange the refresh token for a fresh ID token.
    async fn exchange(&self) -> Result<CachedToken, IdentityError> {
        let now = chrono::Utc::now().timestamp();

        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .query(&[("key", self.api_key.expose_secret())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.refresh_token.expose_secret()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let refresh: RefreshResponse = response
                .json()
                .await
                .map_err(|err| IdentityError::Parse(err.to_string()))?;

            let expires_in: i64 = refresh.expires_in.parse().map_err(|_| {
                IdentityError::Parse(format!("non-numeric expires_in: {}", refresh.expires_in))
            })?;

            Ok(CachedToken {
                id_token: SecretString::from(refresh.id_token),
                expires_at: now + expires_in,
            })
        } else {
            let message = response
                .json::<RefreshErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.error)
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("HTTP {status}"));

            Err(IdentityError::Rejected(message))
        }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    fn current_session(&self) -> Option<Session> {
        Some(self.session.clone())
    }

    #[instrument(skip(self, _session))]
    async fn id_token(
        &self,
        _session: &Session,
        force_refresh: bool,
    ) -> Result<IdToken, IdentityError> {
        if !force_refresh {
            if let Some(cached) = self.cached_token() {
                return Ok(IdToken::new(cached.id_token.expose_secret()));
            }
        }

        let fresh = self.exchange().await?;
        let token = IdToken::new(fresh.id_token.expose_secret());
        self.store(fresh);
        Ok(token)
    }
}

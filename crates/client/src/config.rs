//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CK_API_BASE_URL` - Base URL of the Copper Kettle backend
//!   (e.g., `https://api.copperkettle.shop`)
//! - `FIREBASE_API_KEY` - Identity provider web API key
//! - `FIREBASE_REFRESH_TOKEN` - Operator's long-lived refresh token
//! - `FIREBASE_OPERATOR_ID` - Provider-assigned ID of the signed-in operator
//!
//! ## Optional
//! - `FIREBASE_OPERATOR_EMAIL` - Operator email, for log context only

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL; always carries a trailing slash so request paths
    /// join as children of the configured path.
    pub api_base_url: Url,
    /// Identity provider configuration.
    pub firebase: FirebaseConfig,
}

/// Identity provider configuration.
///
/// Implements `Debug` manually to redact the API key and refresh token.
#[derive(Clone)]
pub struct FirebaseConfig {
    /// Web API key for the secure-token endpoint.
    pub api_key: SecretString,
    /// Long-lived refresh token proving the operator's session.
    pub refresh_token: SecretString,
    /// Provider-assigned operator ID.
    pub operator_id: String,
    /// Operator email, when known.
    pub operator_email: Option<String>,
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("api_key", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("operator_id", &self.operator_id)
            .field("operator_email", &self.operator_email)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is missing or fails to
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = parse_base_url("CK_API_BASE_URL", &require_env("CK_API_BASE_URL")?)?;

        let firebase = FirebaseConfig {
            api_key: SecretString::from(require_env("FIREBASE_API_KEY")?),
            refresh_token: SecretString::from(require_env("FIREBASE_REFRESH_TOKEN")?),
            operator_id: require_env("FIREBASE_OPERATOR_ID")?,
            operator_email: std::env::var("FIREBASE_OPERATOR_EMAIL").ok(),
        };

        Ok(Self {
            api_base_url,
            firebase,
        })
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

/// Parse a base URL, normalizing it to end with a trailing slash so that
/// `Url::join` treats request paths as children of the configured path.
fn parse_base_url(name: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(value)
        .map_err(|err| ConfigError::InvalidEnvVar(name.to_string(), err.to_string()))?;

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

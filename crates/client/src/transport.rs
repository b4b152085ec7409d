//! Multipart transport seam and its reqwest-backed implementation.
//!
//! The submission core describes its outbound request in transport-neutral
//! terms ([`MultipartForm`]) and hands it to a [`MultipartTransport`]. The
//! production implementation is [`HttpTransport`]; tests substitute an
//! in-memory recorder.

use async_trait::async_trait;
use tracing::instrument;
use url::Url;

use crate::identity::IdToken;

/// One part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    /// Part name (e.g., `price`).
    pub name: String,
    pub body: PartBody,
}

/// The payload of a form part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartBody {
    /// A scalar field serialized as text.
    Text(String),
    /// A binary file part.
    File {
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// A transport-neutral multipart form description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    /// An empty form.
    #[must_use]
    pub const fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Append a text part.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            body: PartBody::Text(value.into()),
        });
        self
    }

    /// Append a binary file part.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            body: PartBody::File {
                file_name: file_name.into(),
                content_type: content_type.into(),
                bytes,
            },
        });
        self
    }

    /// The parts in append order.
    #[must_use]
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Consume the form, yielding its parts.
    #[must_use]
    pub fn into_parts(self) -> Vec<FormPart> {
        self.parts
    }
}

/// Status and raw body of a completed request.
///
/// Classification of the body is the caller's job; the transport only
/// reports what came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Errors raised before a response could be obtained.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request never completed (connection, TLS, body streaming).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The path could not be joined onto the base URL.
    #[error("invalid request target {path}: {source}")]
    Target {
        path: String,
        source: url::ParseError,
    },
}

/// Port to the HTTP transport layer.
///
/// Implementations post `form` to `path` with `bearer` attached as an
/// `Authorization: Bearer` header and report the status and raw body of
/// whatever comes back. Non-2xx responses are not errors at this layer.
#[async_trait]
pub trait MultipartTransport: Send + Sync {
    /// Issue one `POST` with a multipart body.
    async fn post_multipart(
        &self,
        path: &str,
        form: MultipartForm,
        bearer: &IdToken,
    ) -> Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport for the Copper Kettle backend.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Use a preconfigured reqwest client (proxies, timeouts).
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn target(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| TransportError::Target {
                path: path.to_string(),
                source,
            })
    }
}

#[async_trait]
impl MultipartTransport for HttpTransport {
    #[instrument(skip(self, form, bearer), fields(parts = form.parts().len()))]
    async fn post_multipart(
        &self,
        path: &str,
        form: MultipartForm,
        bearer: &IdToken,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.target(path)?;

        let mut multipart = reqwest::multipart::Form::new();
        for part in form.into_parts() {
            multipart = match part.body {
                PartBody::Text(value) => multipart.text(part.name, value),
                PartBody::File {
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let file = reqwest::multipart::Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&content_type)?;
                    multipart.part(part.name, file)
                }
            };
        }

        let response = self
            .client
            .post(url)
            .bearer_auth(bearer.expose())
            .multipart(multipart)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_preserves_append_order() {
        let form = MultipartForm::new()
            .text("name", "Kettle")
            .text("price", "39.99")
            .file("image", "kettle.jpg", "image/jpeg", vec![1, 2, 3]);

        let names: Vec<_> = form.parts().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["name", "price", "image"]);
    }

    #[test]
    fn test_response_success_range() {
        let ok = TransportResponse {
            status: 201,
            body: Vec::new(),
        };
        assert!(ok.is_success());

        let redirect = TransportResponse {
            status: 302,
            body: Vec::new(),
        };
        assert!(!redirect.is_success());

        let server_error = TransportResponse {
            status: 500,
            body: Vec::new(),
        };
        assert!(!server_error.is_success());
    }

    #[test]
    fn test_target_joins_relative_to_base() {
        let transport = HttpTransport::new(
            Url::parse("https://api.copperkettle.shop/").expect("static URL is valid"),
        );

        let url = transport
            .target("/product/create")
            .expect("path joins cleanly");
        assert_eq!(url.as_str(), "https://api.copperkettle.shop/product/create");
    }
}

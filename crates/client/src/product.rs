//! Product creation: the authenticated submission flow.
//!
//! [`SubmissionController`] owns the draft buffer and the Idle/Submitting
//! state machine for one "create product" action: it validates the frozen
//! draft, acquires a bearer credential, posts the multipart payload, and
//! classifies the response into a [`SubmissionOutcome`].

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;
use tracing::instrument;

use copper_kettle_core::{ProductDraft, SubmissionOutcome, ValidatedProduct};

use crate::identity::{IdentityProvider, TokenProvider};
use crate::transport::{MultipartForm, MultipartTransport, TransportResponse};

/// Backend endpoint for product creation.
pub const CREATE_PRODUCT_PATH: &str = "/product/create";

/// Success label used when the backend accepted the product but returned no
/// structured name.
const FALLBACK_PRODUCT_NAME: &str = "Product";

/// Operator-facing message when the request never completed; the underlying
/// error goes to the log, not the notice.
const GENERIC_FAILURE_MESSAGE: &str = "Failed to create product. Please try again.";

/// Response envelope for a created product.
///
/// The backend contract is loose: any 2xx counts as success, and this shape
/// only upgrades the notice. Do not tighten this tolerance.
#[derive(Debug, Default, Deserialize)]
struct CreateProductResponse {
    #[serde(default)]
    product: Option<ProductEnvelope>,
    /// Human-readable cache-invalidation notice.
    #[serde(default)]
    cache: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductEnvelope {
    #[serde(default)]
    name: Option<String>,
}

/// Error envelope the backend may attach to non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Owns one "create product" action from draft entry to outcome.
///
/// At most one submission is in flight per controller instance. The
/// Idle/Submitting guard is a single atomic flag checked synchronously before
/// any suspension, so re-entrant [`submit`](Self::submit) calls are rejected
/// without issuing a second request.
///
/// The draft buffer is edited through [`edit_draft`](Self::edit_draft),
/// frozen at submit time, and reset to empty only after a successful
/// submission; every failure leaves it unchanged for correction.
pub struct SubmissionController<P, T> {
    tokens: TokenProvider<P>,
    transport: T,
    draft: Mutex<ProductDraft>,
    in_flight: AtomicBool,
}

impl<P, T> SubmissionController<P, T>
where
    P: IdentityProvider,
    T: MultipartTransport,
{
    /// Create an idle controller with an empty draft.
    pub fn new(provider: P, transport: T) -> Self {
        Self {
            tokens: TokenProvider::new(provider),
            transport,
            draft: Mutex::new(ProductDraft::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Apply an edit to the draft buffer.
    pub fn edit_draft(&self, edit: impl FnOnce(&mut ProductDraft)) {
        edit(&mut self.lock_draft());
    }

    /// A snapshot of the current draft.
    #[must_use]
    pub fn draft(&self) -> ProductDraft {
        self.lock_draft().clone()
    }

    /// Whether a submission is currently in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit the current draft.
    ///
    /// Returns `None` when a submission is already in flight (the re-entrant
    /// call is a no-op: no request is issued and the draft is untouched).
    /// Otherwise returns exactly one [`SubmissionOutcome`] and leaves the
    /// controller idle again. Once a credential has been acquired the
    /// submission runs to completion; there is no cancellation.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> Option<SubmissionOutcome> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("submit ignored: a submission is already in flight");
            return None;
        }

        let outcome = self.run_submission().await;

        if outcome.is_success() {
            *self.lock_draft() = ProductDraft::default();
        }
        self.in_flight.store(false, Ordering::Release);

        Some(outcome)
    }

    async fn run_submission(&self) -> SubmissionOutcome {
        // Freeze the buffer; the lock is never held across an await.
        let frozen = self.lock_draft().clone();

        let validated = match frozen.validate() {
            Ok(validated) => validated,
            Err(err) => {
                tracing::debug!(field = %err.field(), "draft failed validation");
                return SubmissionOutcome::ValidationFailure {
                    field: err.field(),
                    reason: err.to_string(),
                };
            }
        };

        // The submission flow never forces a refresh; that is reserved for
        // explicit re-authentication actions.
        let token = match self.tokens.acquire(false).await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, "credential acquisition failed");
                return SubmissionOutcome::AuthFailure {
                    reason: err.to_string(),
                };
            }
        };

        let form = build_form(validated);

        match self
            .transport
            .post_multipart(CREATE_PRODUCT_PATH, form, &token)
            .await
        {
            Ok(response) => classify_response(&response),
            Err(err) => {
                tracing::error!(error = %err, "product submission never completed");
                SubmissionOutcome::TransportFailure {
                    message: GENERIC_FAILURE_MESSAGE.to_string(),
                }
            }
        }
    }

    fn lock_draft(&self) -> std::sync::MutexGuard<'_, ProductDraft> {
        match self.draft.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Serialize the frozen draft as the six-part multipart payload.
fn build_form(product: ValidatedProduct) -> MultipartForm {
    MultipartForm::new()
        .text("name", product.name)
        .text("description", product.description)
        .text("category", product.category)
        .text("price", product.price.to_string())
        .text("stock", product.stock.to_string())
        .file(
            "image",
            product.image.file_name,
            product.image.content_type,
            product.image.bytes,
        )
}

/// Map a completed response to an outcome.
///
/// Trusts the status code over the body shape: any 2xx is a success even if
/// the body is malformed or absent, falling back to a generic product label.
fn classify_response(response: &TransportResponse) -> SubmissionOutcome {
    if response.is_success() {
        let envelope: CreateProductResponse =
            serde_json::from_slice(&response.body).unwrap_or_default();

        let created_name = envelope
            .product
            .and_then(|product| product.name)
            .unwrap_or_else(|| FALLBACK_PRODUCT_NAME.to_string());

        SubmissionOutcome::Success {
            created_name,
            cache_notice: envelope.cache,
        }
    } else {
        let server_message = serde_json::from_slice::<ErrorBody>(&response.body)
            .ok()
            .and_then(|body| body.message.or(body.error));

        tracing::warn!(
            status = response.status,
            has_server_message = server_message.is_some(),
            "product creation rejected"
        );

        SubmissionOutcome::TransportFailure {
            message: server_message.unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
        }
    }
}

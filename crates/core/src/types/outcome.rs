//! The submission outcome taxonomy.

use serde::{Deserialize, Serialize};

use super::draft::DraftField;

/// The result of one submission attempt.
///
/// Exactly one variant is produced per attempt. Every failure variant leaves
/// the draft buffer intact so the operator can correct and resubmit; only
/// [`Success`](Self::Success) resets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// The backend accepted the product.
    Success {
        /// Name echoed back by the backend, or a generic fallback label when
        /// the response body carried no structured product.
        created_name: String,
        /// Server-side cache-invalidation notice, when the backend sent one.
        /// Its absence is not an error.
        cache_notice: Option<String>,
    },
    /// The draft failed client-side validation; no request was issued.
    ValidationFailure {
        /// First field that failed, in the fixed check order.
        field: DraftField,
        reason: String,
    },
    /// No active session, or the identity provider rejected the token request.
    AuthFailure { reason: String },
    /// The backend rejected the request, or it never arrived.
    TransportFailure { message: String },
}

impl SubmissionOutcome {
    /// Whether this outcome represents an accepted submission.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_success_counts_as_success() {
        let success = SubmissionOutcome::Success {
            created_name: "Widget".to_string(),
            cache_notice: None,
        };
        assert!(success.is_success());

        let failure = SubmissionOutcome::ValidationFailure {
            field: DraftField::Name,
            reason: "name is required".to_string(),
        };
        assert!(!failure.is_success());
    }
}

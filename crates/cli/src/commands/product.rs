//! Product management commands.
//!
//! # Usage
//!
//! ```bash
//! ck-cli product create --name "Stovetop Kettle" --description "2L kettle" \
//!     --category Kitchen --price 39.99 --stock 12 --image ./kettle.jpg
//! ```
//!
//! # Environment Variables
//!
//! - `CK_API_BASE_URL` - Base URL of the Copper Kettle backend
//! - `FIREBASE_API_KEY` / `FIREBASE_REFRESH_TOKEN` / `FIREBASE_OPERATOR_ID` -
//!   Identity provider credentials for the signed-in operator

use std::path::{Path, PathBuf};

use thiserror::Error;

use copper_kettle_client::{
    ClientConfig, ConfigError, FirebaseIdentity, HttpTransport, Session, SubmissionController,
};
use copper_kettle_core::{ImageFile, SubmissionOutcome};

/// Errors that can occur while creating a product.
#[derive(Debug, Error)]
pub enum ProductError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The image file could not be read.
    #[error("Could not read image {path}: {source}")]
    Image {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The submission completed with a failure outcome.
    #[error("{notice}")]
    Failed { notice: String },
}

/// Arguments for `product create`.
#[derive(Debug)]
pub struct CreateArgs {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub stock: String,
    pub image: PathBuf,
}

/// Create a new product from the command line.
///
/// Loads configuration from the environment, reads the image from disk,
/// submits the draft once, and reports the outcome. The raw failure details
/// are logged; the returned error carries only the operator-facing notice.
///
/// # Errors
///
/// Returns an error when configuration is incomplete, the image cannot be
/// read, or the submission ends in any failure outcome.
pub async fn create(args: CreateArgs) -> Result<(), ProductError> {
    let config = ClientConfig::from_env()?;

    let session = Session::new(
        config.firebase.operator_id.clone(),
        config.firebase.operator_email.clone(),
    );
    let identity = FirebaseIdentity::new(
        config.firebase.api_key.clone(),
        config.firebase.refresh_token.clone(),
        session,
    );
    let transport = HttpTransport::new(config.api_base_url.clone());
    let controller = SubmissionController::new(identity, transport);

    let image = read_image(&args.image).await?;

    controller.edit_draft(|draft| {
        draft.name = args.name;
        draft.description = args.description;
        draft.category = args.category;
        draft.price = args.price;
        draft.stock = args.stock;
        draft.image = Some(image);
    });

    tracing::info!("Submitting product to {}", config.api_base_url);

    // A fresh controller is always idle, so the re-entrancy no-op cannot
    // occur here; treat it as a failure anyway rather than panic.
    let Some(outcome) = controller.submit().await else {
        return Err(ProductError::Failed {
            notice: "A submission is already in flight".to_string(),
        });
    };

    match outcome {
        SubmissionOutcome::Success {
            created_name,
            cache_notice,
        } => {
            tracing::info!("{created_name} created successfully");
            if let Some(notice) = cache_notice {
                tracing::info!("{notice}");
            }
            Ok(())
        }
        SubmissionOutcome::ValidationFailure { field, reason } => {
            tracing::warn!(%field, "draft rejected before submission");
            Err(ProductError::Failed { notice: reason })
        }
        SubmissionOutcome::AuthFailure { reason } => {
            tracing::warn!(%reason, "authentication failed");
            Err(ProductError::Failed {
                notice: "Authentication failed. Please sign in again.".to_string(),
            })
        }
        SubmissionOutcome::TransportFailure { message } => {
            Err(ProductError::Failed { notice: message })
        }
    }
}

/// Read the product image from disk, inferring its MIME type from the
/// file extension.
async fn read_image(path: &Path) -> Result<ImageFile, ProductError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ProductError::Image {
            path: path.to_path_buf(),
            source,
        })?;

    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_string(), |name| name.to_string_lossy().into_owned());

    Ok(ImageFile {
        content_type: content_type_for(path).to_string(),
        file_name,
        bytes,
    })
}

/// MIME type for the accepted image formats; anything unrecognized is sent
/// as an opaque byte stream and left to the backend to judge.
fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

//! The product draft form buffer and its validation rules.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The required fields of a product draft, in the order they are checked.
///
/// The order matches the operator's top-to-bottom scan of the form; the image
/// is checked last because it is the most expensive field to backfill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Name,
    Description,
    Category,
    Price,
    Stock,
    Image,
}

impl DraftField {
    /// All required fields, in validation order.
    pub const CHECK_ORDER: [Self; 6] = [
        Self::Name,
        Self::Description,
        Self::Category,
        Self::Price,
        Self::Stock,
        Self::Image,
    ];

    /// The multipart form part name for this field.
    #[must_use]
    pub const fn form_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Category => "category",
            Self::Price => "price",
            Self::Stock => "stock",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_name())
    }
}

/// Errors that can occur when validating a [`ProductDraft`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// A required field is empty or absent.
    #[error("{0} is required")]
    Missing(DraftField),
    /// The price does not parse as a non-negative decimal.
    #[error("price must be a non-negative number")]
    InvalidPrice,
    /// The stock does not parse as a non-negative whole number.
    #[error("stock must be a non-negative whole number")]
    InvalidStock,
}

impl DraftError {
    /// The field this error refers to.
    #[must_use]
    pub const fn field(&self) -> DraftField {
        match self {
            Self::Missing(field) => *field,
            Self::InvalidPrice => DraftField::Price,
            Self::InvalidStock => DraftField::Stock,
        }
    }
}

/// An image selected for upload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFile {
    /// File name as picked by the operator (e.g., `kettle.jpg`).
    pub file_name: String,
    /// MIME type of the file contents (e.g., `image/jpeg`).
    pub content_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .finish()
    }
}

/// The product creation form buffer.
///
/// A draft is built incrementally from operator input, frozen at submit time,
/// and reset to [`ProductDraft::default`] only after a successful submission.
/// After any failure it is retained unchanged so the operator can correct and
/// resubmit.
///
/// The scalar fields hold the operator's text as entered; `price` and `stock`
/// are parsed during [`validate`](Self::validate), not while typing.
///
/// ## Examples
///
/// ```
/// use copper_kettle_core::{DraftField, ProductDraft};
///
/// let mut draft = ProductDraft::default();
/// draft.name = "Stovetop Kettle".to_string();
///
/// // Description is the first field still missing.
/// let err = draft.validate().unwrap_err();
/// assert_eq!(err.field(), DraftField::Description);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    /// Price as entered; must parse as a non-negative decimal.
    pub price: String,
    /// Stock as entered; must parse as a non-negative integer.
    pub stock: String,
    pub image: Option<ImageFile>,
}

impl ProductDraft {
    /// Whether every field is back to its initial empty state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.description.is_empty()
            && self.category.is_empty()
            && self.price.is_empty()
            && self.stock.is_empty()
            && self.image.is_none()
    }

    /// Validate the draft, producing a frozen [`ValidatedProduct`].
    ///
    /// Fields are checked in the fixed order name, description, category,
    /// price, stock, image; the first missing or invalid field wins.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::Missing`] for the first empty field,
    /// [`DraftError::InvalidPrice`] if the price is not a non-negative
    /// decimal, or [`DraftError::InvalidStock`] if the stock is not a
    /// non-negative whole number.
    pub fn validate(&self) -> Result<ValidatedProduct, DraftError> {
        require(&self.name, DraftField::Name)?;
        require(&self.description, DraftField::Description)?;
        require(&self.category, DraftField::Category)?;

        let price: Decimal = require(&self.price, DraftField::Price)?
            .parse()
            .map_err(|_| DraftError::InvalidPrice)?;
        if price < Decimal::ZERO {
            return Err(DraftError::InvalidPrice);
        }

        let stock: u64 = require(&self.stock, DraftField::Stock)?
            .parse()
            .map_err(|_| DraftError::InvalidStock)?;

        let image = self
            .image
            .clone()
            .ok_or(DraftError::Missing(DraftField::Image))?;

        Ok(ValidatedProduct {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            price,
            stock,
            image,
        })
    }
}

/// A scalar field must be non-empty after trimming; the trimmed text feeds
/// the numeric parses.
fn require(text: &str, field: DraftField) -> Result<&str, DraftError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(DraftError::Missing(field))
    } else {
        Ok(trimmed)
    }
}

/// A draft that passed validation, frozen for submission.
///
/// Numbers are normalized: the price is a decimal and the stock a whole
/// number, ready to be serialized back to text as multipart parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProduct {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub stock: u64,
    pub image: ImageFile,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_draft() -> ProductDraft {
        ProductDraft {
            name: "Stovetop Kettle".to_string(),
            description: "2L enameled steel kettle".to_string(),
            category: "Kitchen".to_string(),
            price: "39.99".to_string(),
            stock: "12".to_string(),
            image: Some(ImageFile {
                file_name: "kettle.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                bytes: vec![0xFF, 0xD8, 0xFF],
            }),
        }
    }

    #[test]
    fn test_full_draft_validates() {
        let validated = full_draft().validate().expect("draft should validate");
        assert_eq!(validated.name, "Stovetop Kettle");
        assert_eq!(validated.price, Decimal::new(3999, 2));
        assert_eq!(validated.stock, 12);
        assert_eq!(validated.image.file_name, "kettle.jpg");
    }

    #[test]
    fn test_missing_fields_reported_in_check_order() {
        let cases: [(DraftField, fn(&mut ProductDraft)); 6] = [
            (DraftField::Name, |d| d.name.clear()),
            (DraftField::Description, |d| d.description.clear()),
            (DraftField::Category, |d| d.category.clear()),
            (DraftField::Price, |d| d.price.clear()),
            (DraftField::Stock, |d| d.stock.clear()),
            (DraftField::Image, |d| d.image = None),
        ];

        for (field, clear) in cases {
            let mut draft = full_draft();
            clear(&mut draft);
            let err = draft.validate().expect_err("field should be missing");
            assert_eq!(err, DraftError::Missing(field));
            assert_eq!(err.field(), field);
        }
    }

    #[test]
    fn test_first_missing_field_wins() {
        let mut draft = full_draft();
        draft.description.clear();
        draft.stock.clear();
        draft.image = None;

        let err = draft.validate().expect_err("draft is incomplete");
        assert_eq!(err.field(), DraftField::Description);
    }

    #[test]
    fn test_invalid_price_reported_before_missing_stock() {
        let mut draft = full_draft();
        draft.price = "free".to_string();
        draft.stock.clear();

        // Price sits before stock in the check order, so its parse failure wins.
        assert_eq!(draft.validate(), Err(DraftError::InvalidPrice));
    }

    #[test]
    fn test_check_order_matches_form_layout() {
        let names: Vec<_> = DraftField::CHECK_ORDER
            .iter()
            .map(|f| f.form_name())
            .collect();
        assert_eq!(
            names,
            ["name", "description", "category", "price", "stock", "image"]
        );
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let mut draft = full_draft();
        draft.category = "   ".to_string();
        assert_eq!(
            draft.validate(),
            Err(DraftError::Missing(DraftField::Category))
        );
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut draft = full_draft();
        draft.price = "-1.50".to_string();
        assert_eq!(draft.validate(), Err(DraftError::InvalidPrice));
    }

    #[test]
    fn test_unparsable_price_rejected() {
        let mut draft = full_draft();
        draft.price = "about five".to_string();
        assert_eq!(draft.validate(), Err(DraftError::InvalidPrice));
    }

    #[test]
    fn test_zero_price_allowed() {
        let mut draft = full_draft();
        draft.price = "0".to_string();
        let validated = draft.validate().expect("zero price is non-negative");
        assert_eq!(validated.price, Decimal::ZERO);
    }

    #[test]
    fn test_negative_stock_rejected() {
        let mut draft = full_draft();
        draft.stock = "-3".to_string();
        assert_eq!(draft.validate(), Err(DraftError::InvalidStock));
    }

    #[test]
    fn test_fractional_stock_rejected() {
        let mut draft = full_draft();
        draft.stock = "2.5".to_string();
        assert_eq!(draft.validate(), Err(DraftError::InvalidStock));
    }

    #[test]
    fn test_default_draft_is_empty() {
        assert!(ProductDraft::default().is_empty());
        assert!(!full_draft().is_empty());
    }

    #[test]
    fn test_image_debug_elides_bytes() {
        let image = full_draft().image.expect("full draft has an image");
        let rendered = format!("{image:?}");
        assert!(rendered.contains("3 bytes"));
        assert!(!rendered.contains("255"));
    }
}

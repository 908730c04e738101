//! Product records as exchanged with the product service.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier assigned by the product service.
pub type ProductId = i64;

/// A product as returned by the product service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Service-assigned identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price, always positive.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Category label.
    pub category: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Creation timestamp.
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp, absent for never-updated products.
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Writable product fields: the body of create/update calls and the
/// element of a bulk upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Trimmed product name.
    pub name: String,
    /// Positive unit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Trimmed category label.
    pub category: String,
    /// Trimmed description, empty when not provided.
    #[serde(default)]
    pub description: String,
}

/// A normalized, validated import row. Same shape as a create body.
pub type CanonicalRecord = ProductDraft;

/// One page of the product list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Products on this page.
    pub data: Vec<Product>,
    /// Page number echoed by the service.
    pub page: u32,
    /// Page size echoed by the service.
    pub limit: u32,
    /// Total matching products.
    pub total: u64,
    /// Total pages as computed by the service.
    pub total_pages: u32,
}

/// Fields of the create/edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    /// Product name input.
    Name,
    /// Price input.
    Price,
    /// Category select.
    Category,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Price => write!(f, "price"),
            Self::Category => write!(f, "category"),
        }
    }
}

/// A single field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The offending field.
    pub field: FormField,
    /// Message shown next to the field.
    pub message: &'static str,
}

/// Field-level validation failures of a product form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    fn push(&mut self, field: FormField, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    /// Returns the message for a field, if that field failed.
    #[must_use]
    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }

    /// Returns all failures in form order.
    #[must_use]
    pub fn all(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns true if no field failed.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message).collect();
        write!(f, "{}", messages.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

/// Raw text of the create/edit form before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    /// Name input.
    pub name: String,
    /// Price input, as typed.
    pub price: String,
    /// Selected category.
    pub category: String,
    /// Description textarea.
    pub description: String,
}

impl ProductForm {
    /// Prefills the form from an existing product for editing.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            category: product.category.clone(),
            description: product.description.clone().unwrap_or_default(),
        }
    }

    /// Validates the form and converts it into a draft.
    ///
    /// # Errors
    ///
    /// Returns every failing field; nothing should be sent to the product
    /// service in that case.
    pub fn validate(&self) -> Result<ProductDraft, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(FormField::Name, "Product name is required");
        }

        let price = Decimal::from_str(self.price.trim())
            .ok()
            .filter(|p| *p > Decimal::ZERO);
        if price.is_none() {
            errors.push(FormField::Price, "Price must be a positive number");
        }

        let category = self.category.trim();
        if category.is_empty() {
            errors.push(FormField::Category, "Category is required");
        }

        match price {
            Some(price) if errors.is_empty() => Ok(ProductDraft {
                name: name.to_string(),
                price,
                category: category.to_string(),
                description: self.description.trim().to_string(),
            }),
            _ => Err(errors),
        }
    }
}

/// Lenient timestamp parsing: the service may send RFC 3339 or naive
/// ISO-8601 timestamps; naive ones are taken as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, de::Error};

    fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(d)? {
            None => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}"))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn form(name: &str, price: &str, category: &str) -> ProductForm {
        ProductForm {
            name: name.to_string(),
            price: price.to_string(),
            category: category.to_string(),
            description: "  soft cotton ".to_string(),
        }
    }

    #[test]
    fn test_valid_form_produces_trimmed_draft() {
        let draft = form("  T-Shirt ", "19.90", " Clothing ").validate().unwrap();
        assert_eq!(draft.name, "T-Shirt");
        assert_eq!(draft.price, Decimal::new(1990, 2));
        assert_eq!(draft.category, "Clothing");
        assert_eq!(draft.description, "soft cotton");
    }

    #[test]
    fn test_form_reports_every_failing_field() {
        let errors = form(" ", "0", "").validate().unwrap_err();
        assert_eq!(errors.get(FormField::Name), Some("Product name is required"));
        assert_eq!(
            errors.get(FormField::Price),
            Some("Price must be a positive number")
        );
        assert_eq!(errors.get(FormField::Category), Some("Category is required"));
        assert_eq!(errors.all().len(), 3);
    }

    #[test]
    fn test_non_numeric_price_is_rejected() {
        let errors = form("Lamp", "cheap", "Home & Garden").validate().unwrap_err();
        assert_eq!(errors.all().len(), 1);
        assert!(errors.get(FormField::Price).is_some());
    }

    #[test]
    fn test_product_accepts_naive_timestamps() {
        let json = r#"{
            "id": 7,
            "name": "Desk",
            "price": 120.5,
            "category": "Home & Garden",
            "description": null,
            "created_at": "2024-03-01T10:15:00",
            "updated_at": "2024-03-02T08:00:00Z"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, 7);
        assert_eq!(product.price, Decimal::new(1205, 1));
        assert_eq!(product.created_at.to_rfc3339(), "2024-03-01T10:15:00+00:00");
        assert!(product.updated_at.is_some());
    }

    #[test]
    fn test_draft_serializes_price_as_number() {
        let draft = ProductDraft {
            name: "Pen".to_string(),
            price: Decimal::new(250, 2),
            category: "Other".to_string(),
            description: String::new(),
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["price"], serde_json::json!(2.5));
    }
}

//! Product edit form: multipart parsing, validation and pure form helpers.
//!
//! Validation runs entirely client-side of the backend: an invalid form is
//! re-rendered with every field marked touched and nothing is sent over the
//! network.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

use axum::extract::Multipart;
use regex::Regex;
use rust_decimal::Decimal;

use vesta_core::{Gender, Size};

use crate::backend::{ImageFile, ProductPayload};
use crate::error::AppError;

/// Slug constraint: lowercase tokens separated by single dashes.
static SLUG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9_]+(?:-[a-z0-9_]+)*$").expect("slug pattern must compile")
});

/// Raw edit form fields, exactly as posted.
#[derive(Debug, Default)]
pub struct ProductForm {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub price: String,
    pub stock: String,
    pub gender: String,
    /// One comma-separated string, parsed on submit.
    pub tags: String,
    /// Comma-separated size tokens maintained by the size picker.
    pub sizes: String,
    /// Comma-separated stored image names already on the product.
    pub images: String,
    /// Newly selected image files, replacing any previous pending set.
    pub files: Vec<ImageFile>,
}

/// Per-field validation errors.
///
/// A failed validation marks the whole form touched; the map holds a message
/// for each offending field.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<&'static str, String>,
}

impl FormErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    /// Message for one field, if it failed validation.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl ProductForm {
    /// Drain an `axum` multipart body into the form.
    ///
    /// Text fields overwrite previous values. Every `files` part is
    /// collected into the pending upload set; empty parts are skipped, as
    /// browsers send one nameless part for an untouched file input.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the multipart stream is malformed.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == "files" {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;

                if !file_name.is_empty() && !bytes.is_empty() {
                    form.files.push(ImageFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            match name.as_str() {
                "title" => form.title = value,
                "description" => form.description = value,
                "slug" => form.slug = value,
                "price" => form.price = value,
                "stock" => form.stock = value,
                "gender" => form.gender = value,
                "tags" => form.tags = value,
                "sizes" => form.sizes = value,
                "images" => form.images = value,
                _ => {}
            }
        }

        Ok(form)
    }

    /// Validate every field, producing the write payload.
    ///
    /// # Errors
    ///
    /// Returns the per-field errors; the caller re-renders the form with all
    /// fields marked touched and issues no network call.
    pub fn validate(&self) -> Result<ProductPayload, FormErrors> {
        let mut errors = FormErrors::default();

        if self.title.trim().is_empty() {
            errors.push("title", "Title is required");
        }
        if self.description.trim().is_empty() {
            errors.push("description", "Description is required");
        }
        if self.slug.trim().is_empty() {
            errors.push("slug", "Slug is required");
        } else if !SLUG_PATTERN.is_match(self.slug.trim()) {
            errors.push(
                "slug",
                "Slug may only contain lowercase letters, digits, underscores and dashes",
            );
        }

        let price = match self.price.trim().parse::<Decimal>() {
            Ok(price) if price >= Decimal::ZERO => price,
            Ok(_) => {
                errors.push("price", "Price must be zero or greater");
                Decimal::ZERO
            }
            Err(_) => {
                errors.push("price", "Price must be a number");
                Decimal::ZERO
            }
        };

        let stock = self.stock.trim().parse::<u32>().unwrap_or_else(|_| {
            errors.push("stock", "Stock must be a non-negative whole number");
            0
        });

        let gender = Gender::from_str(self.gender.trim()).unwrap_or_else(|_| {
            errors.push("gender", "Gender must be men, women, kid or unisex");
            Gender::Kid
        });

        let sizes = match parse_sizes(&self.sizes) {
            Ok(sizes) => sizes,
            Err(token) => {
                errors.push("sizes", format!("Unknown size: {token}"));
                Vec::new()
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ProductPayload {
            title: self.title.clone(),
            price,
            description: self.description.clone(),
            slug: self.slug.trim().to_owned(),
            stock,
            sizes,
            gender,
            tags: parse_tags(&self.tags),
            images: parse_names(&self.images),
        })
    }
}

/// Parse the tags field: lowercase, split on commas, trim each segment.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.to_lowercase()
        .split(',')
        .map(|tag| tag.trim().to_owned())
        .collect()
}

/// Comma-separated size tokens; fails on the first unknown token.
///
/// # Errors
///
/// Returns the offending token.
pub fn parse_sizes(raw: &str) -> Result<Vec<Size>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| Size::from_str(token).map_err(|_| token.to_owned()))
        .collect()
}

/// Comma-separated stored image names from the hidden field.
fn parse_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Toggle one size in the selection.
///
/// Returns a fresh list: an already-selected size is removed preserving the
/// order of the rest, an absent one is appended at the end. The input is
/// never mutated.
#[must_use]
pub fn toggle_size(current: &[Size], clicked: Size) -> Vec<Size> {
    if current.contains(&clicked) {
        current
            .iter()
            .copied()
            .filter(|&size| size != clicked)
            .collect()
    } else {
        let mut next = current.to_vec();
        next.push(clicked);
        next
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> ProductForm {
        ProductForm {
            title: "Cybertruck Hat".to_string(),
            description: "A hat".to_string(),
            slug: "cybertruck_hat".to_string(),
            price: "30".to_string(),
            stock: "10".to_string(),
            gender: "men".to_string(),
            tags: "hats".to_string(),
            sizes: "M,L".to_string(),
            images: "a.jpg,b.jpg".to_string(),
            files: Vec::new(),
        }
    }

    #[test]
    fn test_valid_form_builds_payload() {
        let payload = valid_form().validate().unwrap();
        assert_eq!(payload.title, "Cybertruck Hat");
        assert_eq!(payload.stock, 10);
        assert_eq!(payload.gender, Gender::Men);
        assert_eq!(payload.sizes, vec![Size::M, Size::L]);
        assert_eq!(payload.images, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_empty_title_fails_validation() {
        let form = ProductForm {
            title: "  ".to_string(),
            ..valid_form()
        };

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert!(errors.get("slug").is_none());
    }

    #[test]
    fn test_slug_pattern() {
        for slug in ["mens_chill_crew_neck", "chill-crew-neck", "a1-b2_c3"] {
            let form = ProductForm {
                slug: slug.to_string(),
                ..valid_form()
            };
            assert!(form.validate().is_ok(), "{slug} should be valid");
        }

        for slug in ["Mens Hat", "UPPER", "double--dash", "-leading", "trailing-"] {
            let form = ProductForm {
                slug: slug.to_string(),
                ..valid_form()
            };
            assert!(
                form.validate().unwrap_err().get("slug").is_some(),
                "{slug} should be rejected"
            );
        }
    }

    #[test]
    fn test_negative_price_fails() {
        let form = ProductForm {
            price: "-1".to_string(),
            ..valid_form()
        };
        assert!(form.validate().unwrap_err().get("price").is_some());

        let form = ProductForm {
            price: "abc".to_string(),
            ..valid_form()
        };
        assert!(form.validate().unwrap_err().get("price").is_some());
    }

    #[test]
    fn test_negative_stock_fails() {
        let form = ProductForm {
            stock: "-3".to_string(),
            ..valid_form()
        };
        assert!(form.validate().unwrap_err().get("stock").is_some());
    }

    #[test]
    fn test_unknown_gender_fails() {
        let form = ProductForm {
            gender: "boys".to_string(),
            ..valid_form()
        };
        assert!(form.validate().unwrap_err().get("gender").is_some());
    }

    #[test]
    fn test_parse_tags_lowercases_and_trims() {
        assert_eq!(
            parse_tags("Shoes, RED , running"),
            vec!["shoes", "red", "running"]
        );
        assert_eq!(parse_tags(""), Vec::<String>::new());
        assert_eq!(parse_tags("  "), Vec::<String>::new());
    }

    #[test]
    fn test_parse_sizes_rejects_unknown_token() {
        assert_eq!(parse_sizes("M, L ,XS").unwrap(), vec![Size::M, Size::L, Size::Xs]);
        assert_eq!(parse_sizes("").unwrap(), Vec::<Size>::new());
        assert_eq!(parse_sizes("M,huge").unwrap_err(), "huge");
    }

    #[test]
    fn test_toggle_size_removes_preserving_order() {
        let current = vec![Size::Xs, Size::M, Size::Xl];
        assert_eq!(toggle_size(&current, Size::M), vec![Size::Xs, Size::Xl]);
        // Input is untouched.
        assert_eq!(current, vec![Size::Xs, Size::M, Size::Xl]);
    }

    #[test]
    fn test_toggle_size_appends_absent() {
        let current = vec![Size::Xs, Size::M];
        assert_eq!(
            toggle_size(&current, Size::Xxl),
            vec![Size::Xs, Size::M, Size::Xxl]
        );
    }
}

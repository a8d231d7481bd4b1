//! Wire types for the catalog backend API.
//!
//! The REST payloads map 1:1 onto these structs (camelCase field names on
//! the wire), so they double as the app's domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vesta_core::{Gender, ProductId, Size, UserId};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    pub slug: String,
    pub stock: u32,
    /// Selected sizes, order-preserving.
    #[serde(default)]
    pub sizes: Vec<Size>,
    pub gender: Gender,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Stored image names, served by the backend under `/files/product/`.
    #[serde(default)]
    pub images: Vec<String>,
    /// Owning user; absent on the unsaved template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Product {
    /// The synthetic, non-persisted template returned for the sentinel id
    /// `new`: fresh defaults, empty collections, zeroed numeric fields.
    #[must_use]
    pub fn template() -> Self {
        Self {
            id: ProductId::draft(),
            title: String::new(),
            price: Decimal::ZERO,
            description: String::new(),
            slug: String::new(),
            stock: 0,
            sizes: Vec::new(),
            gender: Gender::Kid,
            tags: Vec::new(),
            images: Vec::new(),
            user: None,
        }
    }
}

/// One page of products plus paging metadata.
///
/// The metadata is owned by the backend; beyond `products` the response is
/// treated as opaque and echoed back from the cache as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub count: u64,
    pub limit: u32,
    pub offset: u32,
    pub products: Vec<Product>,
}

/// Backend user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Response from the authentication endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Payload for product create and update requests.
///
/// `images` holds the already-stored names; freshly uploaded names are
/// appended by the client before the write is issued.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: String,
    pub slug: String,
    pub stock: u32,
    pub sizes: Vec<Size>,
    pub gender: Gender,
    pub tags: Vec<String>,
    pub images: Vec<String>,
}

/// An image file selected for upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

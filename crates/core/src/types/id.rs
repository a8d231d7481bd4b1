//! Newtype IDs for type-safe entity references.
//!
//! The catalog backend uses opaque string identifiers, so IDs are stored as
//! owned strings. Use the `define_id!` macro to create type-safe wrappers
//! that prevent accidentally mixing IDs from different entity types.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Accessors: `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, `AsRef<str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use vesta_core::define_id;
/// define_id!(OrderId);
///
/// let order_id = OrderId::from("ord-1");
/// assert_eq!(order_id.as_str(), "ord-1");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(UserId);

impl ProductId {
    /// Sentinel value for a product that has not been saved yet.
    pub const DRAFT: &'static str = "new";

    /// The id of the unsaved draft product.
    #[must_use]
    pub fn draft() -> Self {
        Self::from(Self::DRAFT)
    }

    /// Whether this is the unsaved draft sentinel rather than a stored
    /// product.
    #[must_use]
    pub fn is_draft(&self) -> bool {
        self.as_str() == Self::DRAFT
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_sentinel() {
        let id = ProductId::draft();
        assert_eq!(id.as_str(), "new");
        assert!(id.is_draft());
        assert!(!ProductId::from("b8a6e7a2").is_draft());
    }

    #[test]
    fn test_display() {
        let id = ProductId::from("b8a6e7a2");
        assert_eq!(format!("{id}"), "b8a6e7a2");
    }

    #[test]
    fn test_serde_transparent() {
        let id = UserId::from("u-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"u-42\"");

        let parsed: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_ids_are_distinct_types() {
        // ProductId and UserId with equal contents are different types;
        // equality only exists within one type.
        let product = ProductId::from("same");
        assert_eq!(product, ProductId::from("same"));
    }
}

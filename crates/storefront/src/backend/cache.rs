//! Cache keys and list-patch helpers for memoized backend responses.

use vesta_core::Gender;

use super::types::{Product, ProductsResponse};

/// Key for a memoized list request: the exact `(limit, offset, gender)`
/// triple. The unfiltered listing uses an empty gender token, matching the
/// wire query.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub(super) struct ListKey {
    limit: u32,
    offset: u32,
    gender: &'static str,
}

impl ListKey {
    pub(super) fn new(limit: u32, offset: u32, gender: Option<Gender>) -> Self {
        Self {
            limit,
            offset,
            gender: gender.map_or("", Gender::as_str),
        }
    }
}

/// Replace every product in `page` whose id matches `updated`, in position.
///
/// Non-matching entries and list order are untouched. Returns `None` when
/// the page does not contain the product, so callers can skip re-inserting
/// unchanged entries.
pub(super) fn patch_page(page: &ProductsResponse, updated: &Product) -> Option<ProductsResponse> {
    if !page.products.iter().any(|p| p.id == updated.id) {
        return None;
    }

    let mut patched = page.clone();
    for slot in &mut patched.products {
        if slot.id == updated.id {
            *slot = updated.clone();
        }
    }
    Some(patched)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use vesta_core::ProductId;

    use super::*;

    fn product(id: &str, title: &str) -> Product {
        Product {
            id: ProductId::from(id),
            title: title.to_string(),
            slug: id.to_string(),
            ..Product::template()
        }
    }

    fn page_of(products: Vec<Product>) -> ProductsResponse {
        ProductsResponse {
            count: products.len() as u64,
            limit: 9,
            offset: 0,
            products,
        }
    }

    #[test]
    fn test_list_key_identity() {
        assert_eq!(ListKey::new(9, 0, None), ListKey::new(9, 0, None));
        assert_ne!(ListKey::new(9, 0, None), ListKey::new(9, 9, None));
        assert_ne!(
            ListKey::new(9, 0, Some(Gender::Men)),
            ListKey::new(9, 0, Some(Gender::Women))
        );
        assert_ne!(ListKey::new(9, 0, Some(Gender::Men)), ListKey::new(9, 0, None));
    }

    #[test]
    fn test_patch_page_replaces_in_position() {
        let page = page_of(vec![
            product("a", "Alpha"),
            product("b", "Beta"),
            product("c", "Gamma"),
        ]);

        let mut updated = product("b", "Beta v2");
        updated.price = Decimal::new(500, 2);

        let patched = patch_page(&page, &updated).unwrap();
        assert_eq!(patched.products.len(), 3);
        assert_eq!(patched.products[0].title, "Alpha");
        assert_eq!(patched.products[1], updated);
        assert_eq!(patched.products[2].title, "Gamma");
        // Metadata is untouched.
        assert_eq!(patched.count, page.count);
    }

    #[test]
    fn test_patch_page_misses_return_none() {
        let page = page_of(vec![product("a", "Alpha")]);
        assert!(patch_page(&page, &product("zzz", "Other")).is_none());
    }

    #[test]
    fn test_patch_page_replaces_every_occurrence() {
        let page = page_of(vec![product("a", "Alpha"), product("a", "Alpha copy")]);
        let patched = patch_page(&page, &product("a", "Alpha v2")).unwrap();
        assert!(patched.products.iter().all(|p| p.title == "Alpha v2"));
    }
}

//! Home page: the full catalog, paginated.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::backend::ProductsResponse;
use crate::error::Result;
use crate::filters;
use crate::middleware::CurrentAuth;
use crate::models::AuthSession;
use crate::state::AppState;

/// Fixed page size shared by every listing page.
pub const PAGE_SIZE: u32 = 9;

/// 1-based pagination query.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
}

impl PaginationQuery {
    /// Current 1-based page, clamped to at least 1.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// 0-based record offset for the backend request.
    #[must_use]
    pub fn offset(&self) -> u32 {
        (self.page() - 1) * PAGE_SIZE
    }
}

/// Product display data for listing cards.
pub struct ProductCard {
    pub title: String,
    pub slug: String,
    pub price: Decimal,
    pub image: Option<String>,
}

/// Home listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user_name: Option<String>,
    pub products: Vec<ProductCard>,
    pub page: u32,
    pub total_pages: u32,
    pub base_path: String,
}

/// Display the home listing page.
pub async fn home(
    State(state): State<AppState>,
    CurrentAuth(auth): CurrentAuth,
    Query(query): Query<PaginationQuery>,
) -> Result<HomeTemplate> {
    let response = state
        .backend()
        .get_products(Some(PAGE_SIZE), Some(query.offset()), None)
        .await?;

    Ok(HomeTemplate {
        user_name: session_name(&auth),
        products: product_cards(&state, &response),
        page: query.page(),
        total_pages: total_pages(response.count),
        base_path: "/".to_string(),
    })
}

/// Display name of the signed-in user, if any.
pub(crate) fn session_name(auth: &AuthSession) -> Option<String> {
    auth.user().map(|user| user.full_name.clone())
}

/// Build listing cards from a backend response, resolving image URLs.
pub(crate) fn product_cards(state: &AppState, response: &ProductsResponse) -> Vec<ProductCard> {
    response
        .products
        .iter()
        .map(|product| ProductCard {
            title: product.title.clone(),
            slug: product.slug.clone(),
            price: product.price,
            image: product.images.first().map(|name| state.image_url(name)),
        })
        .collect()
}

/// Total page count for the pagination bar, at least 1.
pub(crate) fn total_pages(count: u64) -> u32 {
    let pages = count.div_ceil(u64::from(PAGE_SIZE)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults_to_one() {
        let query = PaginationQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_offset_is_zero_based() {
        let query = PaginationQuery { page: Some(3) };
        assert_eq!(query.offset(), 18);
    }

    #[test]
    fn test_page_zero_is_clamped() {
        let query = PaginationQuery { page: Some(0) };
        assert_eq!(query.page(), 1);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0), 1);
        assert_eq!(total_pages(9), 1);
        assert_eq!(total_pages(10), 2);
        assert_eq!(total_pages(27), 3);
    }
}

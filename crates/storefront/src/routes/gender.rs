//! Gender-filtered listing pages.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};

use vesta_core::Gender;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CurrentAuth;
use crate::routes::home::{PAGE_SIZE, PaginationQuery, ProductCard, product_cards, session_name, total_pages};
use crate::state::AppState;

/// Gender listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "gender.html")]
pub struct GenderTemplate {
    pub user_name: Option<String>,
    pub gender: Gender,
    pub products: Vec<ProductCard>,
    pub page: u32,
    pub total_pages: u32,
    pub base_path: String,
}

/// Display a gender-filtered listing page.
///
/// The filter is derived from the route segment; unknown tokens are a 404.
pub async fn show(
    State(state): State<AppState>,
    CurrentAuth(auth): CurrentAuth,
    Path(gender): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<GenderTemplate> {
    let gender = Gender::from_str(&gender)
        .map_err(|_| AppError::NotFound(format!("unknown gender: {gender}")))?;

    let response = state
        .backend()
        .get_products(Some(PAGE_SIZE), Some(query.offset()), Some(gender))
        .await?;

    Ok(GenderTemplate {
        user_name: session_name(&auth),
        gender,
        products: product_cards(&state, &response),
        page: query.page(),
        total_pages: total_pages(response.count),
        base_path: format!("/gender/{gender}"),
    })
}

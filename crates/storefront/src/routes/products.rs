//! Product detail page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use rust_decimal::Decimal;

use crate::backend::Product;
use crate::error::Result;
use crate::filters;
use crate::middleware::CurrentAuth;
use crate::state::AppState;

/// Product display data for the detail page.
pub struct ProductView {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub stock: u32,
    pub sizes: Vec<&'static str>,
    pub tags: Vec<String>,
    pub images: Vec<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub user_name: Option<String>,
    pub product: ProductView,
}

/// Display a product detail page, looked up by slug or id.
pub async fn show(
    State(state): State<AppState>,
    CurrentAuth(auth): CurrentAuth,
    Path(id_slug): Path<String>,
) -> Result<ProductShowTemplate> {
    let product = state.backend().get_product_by_slug(&id_slug).await?;

    Ok(ProductShowTemplate {
        user_name: super::home::session_name(&auth),
        product: product_view(&state, &product),
    })
}

fn product_view(state: &AppState, product: &Product) -> ProductView {
    ProductView {
        title: product.title.clone(),
        description: product.description.clone(),
        price: product.price,
        stock: product.stock,
        sizes: product.sizes.iter().map(|size| size.as_str()).collect(),
        tags: product.tags.clone(),
        images: product
            .images
            .iter()
            .map(|name| state.image_url(name))
            .collect(),
    }
}

//! Admin product management pages.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use vesta_core::{Gender, ProductId, Size};

use super::form::{FormErrors, ProductForm, parse_sizes, toggle_size};
use crate::backend::Product;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::home::{PAGE_SIZE, PaginationQuery, session_name, total_pages};
use crate::state::AppState;

/// The saved-confirmation banner dismisses itself after this delay.
const SAVED_BANNER_MS: u32 = 2000;

/// Query parameter carried by the post-save redirect.
#[derive(Debug, Deserialize)]
pub struct EditQuery {
    pub saved: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Row in the admin product table.
pub struct ProductRow {
    pub id: String,
    pub title: String,
    pub price: Decimal,
    pub stock: u32,
    pub gender: &'static str,
}

/// Admin product table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/index.html")]
pub struct AdminProductsTemplate {
    pub user_name: Option<String>,
    pub products: Vec<ProductRow>,
    pub page: u32,
    pub total_pages: u32,
    pub base_path: String,
}

/// Current field values and errors rendered into the edit form.
pub struct FormState {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub price: String,
    pub stock: String,
    pub gender: String,
    pub tags: String,
    pub images: String,
    /// Whether every field should display its validation state.
    pub touched: bool,
    pub errors: FormErrors,
}

impl FormState {
    /// Pristine form state populated from a product (or the template
    /// product for a new draft).
    fn from_product(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
            slug: product.slug.clone(),
            price: product.price.to_string(),
            stock: product.stock.to_string(),
            gender: product.gender.as_str().to_owned(),
            tags: product.tags.join(","),
            images: product.images.join(","),
            touched: false,
            errors: FormErrors::default(),
        }
    }

    /// Rejected submission echoed back with every field marked touched.
    fn from_form(form: &ProductForm, errors: FormErrors) -> Self {
        Self {
            title: form.title.clone(),
            description: form.description.clone(),
            slug: form.slug.clone(),
            price: form.price.clone(),
            stock: form.stock.clone(),
            gender: form.gender.clone(),
            tags: form.tags.clone(),
            images: form.images.clone(),
            touched: true,
            errors,
        }
    }
}

/// One button in the size picker.
pub struct SizeOption {
    pub token: &'static str,
    pub selected: bool,
}

/// Standalone size picker fragment (HTMX response).
#[derive(Template, WebTemplate)]
#[template(path = "partials/size_picker.html")]
pub struct SizePickerTemplate {
    pub id: String,
    pub size_options: Vec<SizeOption>,
    pub sizes_csv: String,
}

/// Product edit page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/edit.html")]
pub struct ProductEditTemplate {
    pub user_name: Option<String>,
    pub id: String,
    pub is_new: bool,
    pub form: FormState,
    pub size_options: Vec<SizeOption>,
    pub sizes_csv: String,
    pub image_urls: Vec<String>,
    pub genders: [Gender; 4],
    pub saved_message: Option<&'static str>,
    pub saved_banner_ms: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the admin product table.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Query(query): Query<PaginationQuery>,
) -> Result<AdminProductsTemplate> {
    let response = state
        .backend()
        .get_products(Some(PAGE_SIZE), Some(query.offset()), None)
        .await?;

    let products = response
        .products
        .iter()
        .map(|product| ProductRow {
            id: product.id.as_str().to_owned(),
            title: product.title.clone(),
            price: product.price,
            stock: product.stock,
            gender: product.gender.as_str(),
        })
        .collect();

    Ok(AdminProductsTemplate {
        user_name: session_name(&auth),
        products,
        page: query.page(),
        total_pages: total_pages(response.count),
        base_path: "/admin/products".to_string(),
    })
}

/// Display the edit form for a product, or a blank form for `new`.
pub async fn edit(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
    Query(query): Query<EditQuery>,
) -> Result<ProductEditTemplate> {
    let id = ProductId::from(id);
    let product = state.backend().get_product_by_id(&id).await?;

    Ok(edit_template(
        &state,
        session_name(&auth),
        &id,
        FormState::from_product(&product),
        &product.sizes,
        saved_message(query.saved.as_deref()),
    ))
}

/// Handle the edit form submission (multipart: fields plus image files).
///
/// An invalid form is re-rendered with every field marked touched and no
/// backend call. A create redirects to the new product's edit page; an
/// update stays on the same view. Both carry the `saved` flag for the
/// confirmation banner.
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    let id = ProductId::from(id);
    let form = ProductForm::from_multipart(multipart).await?;

    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => {
            let sizes = parse_sizes(&form.sizes).unwrap_or_default();
            let template = edit_template(
                &state,
                session_name(&auth),
                &id,
                FormState::from_form(&form, errors),
                &sizes,
                None,
            );
            return Ok(template.into_response());
        }
    };

    if id.is_draft() {
        let product = state.backend().create_product(payload, form.files).await?;
        Ok(Redirect::to(&format!("/admin/products/{}?saved=created", product.id)).into_response())
    } else {
        state
            .backend()
            .update_product(&id, payload, form.files)
            .await?;
        Ok(Redirect::to(&format!("/admin/products/{id}?saved=updated")).into_response())
    }
}

/// Size picker toggle fragment (HTMX).
///
/// Receives the current selection and the clicked size, returns the
/// re-rendered picker with the toggled selection.
pub async fn toggle_sizes(
    RequireAuth(_auth): RequireAuth,
    Path(id): Path<String>,
    Form(form): Form<SizeToggleForm>,
) -> Result<SizePickerTemplate> {
    let clicked = Size::from_str(form.size.trim())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let current = parse_sizes(&form.sizes)
        .map_err(|token| AppError::BadRequest(format!("unknown size: {token}")))?;

    let next = toggle_size(&current, clicked);
    Ok(size_picker(&id, &next))
}

/// Form body of the size toggle fragment request.
#[derive(Debug, Deserialize)]
pub struct SizeToggleForm {
    /// Comma-separated current selection.
    pub sizes: String,
    /// The clicked size token.
    pub size: String,
}

// =============================================================================
// Helpers
// =============================================================================

fn saved_message(saved: Option<&str>) -> Option<&'static str> {
    match saved? {
        "created" => Some("Product created successfully"),
        "updated" => Some("Product updated successfully"),
        _ => None,
    }
}

fn size_picker(id: &str, selected: &[Size]) -> SizePickerTemplate {
    SizePickerTemplate {
        id: id.to_owned(),
        size_options: Size::ALL
            .iter()
            .map(|&size| SizeOption {
                token: size.as_str(),
                selected: selected.contains(&size),
            })
            .collect(),
        sizes_csv: join_sizes(selected),
    }
}

fn join_sizes(sizes: &[Size]) -> String {
    sizes
        .iter()
        .map(|size| size.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn edit_template(
    state: &AppState,
    user_name: Option<String>,
    id: &ProductId,
    form: FormState,
    sizes: &[Size],
    saved_message: Option<&'static str>,
) -> ProductEditTemplate {
    let picker = size_picker(id.as_str(), sizes);
    let image_urls = form
        .images
        .split(',')
        .filter(|name| !name.trim().is_empty())
        .map(|name| state.image_url(name.trim()))
        .collect();

    ProductEditTemplate {
        user_name,
        id: id.as_str().to_owned(),
        is_new: id.is_draft(),
        form,
        size_options: picker.size_options,
        sizes_csv: picker.sizes_csv,
        image_urls,
        genders: Gender::ALL,
        saved_message,
        saved_banner_ms: SAVED_BANNER_MS,
    }
}

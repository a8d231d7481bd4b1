//! Integration test support for Vesta.
//!
//! Hosts an in-process mock of the catalog backend API plus helpers to run
//! the storefront app against it. The mock counts requests per endpoint so
//! tests can assert cache behaviour (a cached read must not produce a
//! request), and staggers upload completion so batch ordering is exercised
//! under out-of-order completion.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::cast_possible_truncation
)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use uuid::Uuid;

use vesta_core::{Gender, ProductId, Size};
use vesta_storefront::backend::{BackendClient, ImageFile, Product, ProductPayload};
use vesta_storefront::config::{ApiConfig, AppConfig};
use vesta_storefront::middleware::create_session_layer;
use vesta_storefront::routes;
use vesta_storefront::state::AppState;

/// Password the mock backend accepts for any account.
pub const TEST_PASSWORD: &str = "Password1";

/// Display name of the mock backend's user.
pub const TEST_USER_NAME: &str = "Ada Lovelace";

// =============================================================================
// Mock backend
// =============================================================================

/// Per-endpoint request counters.
#[derive(Debug, Default)]
pub struct Counters {
    pub list: AtomicUsize,
    pub get: AtomicUsize,
    pub create: AtomicUsize,
    pub update: AtomicUsize,
    pub upload: AtomicUsize,
    pub login: AtomicUsize,
    pub register: AtomicUsize,
    pub check_status: AtomicUsize,
}

/// Shared state of the mock catalog backend.
#[derive(Debug)]
pub struct MockBackend {
    pub products: Mutex<Vec<Product>>,
    pub counters: Counters,
    /// Body of the most recent create/update request.
    pub last_product_payload: Mutex<Option<Value>>,
}

/// A spawned mock backend.
pub struct TestBackend {
    pub state: Arc<MockBackend>,
    pub url: String,
}

impl TestBackend {
    /// A fresh storefront backend client pointed at this mock.
    #[must_use]
    pub fn client(&self) -> BackendClient {
        BackendClient::new(&ApiConfig {
            base_url: self.url.clone(),
        })
    }
}

/// Spawn the mock backend on an ephemeral port.
pub async fn spawn_backend(products: Vec<Product>) -> TestBackend {
    let state = Arc::new(MockBackend {
        products: Mutex::new(products),
        counters: Counters::default(),
        last_product_payload: Mutex::new(None),
    });

    let app = Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/{term}", get(get_product).patch(update_product))
        .route("/files/product", post(upload_file))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/check-status", get(check_status))
        .with_state(Arc::clone(&state));

    let url = serve(app).await;
    TestBackend { state, url }
}

/// Spawn the storefront app against a backend URL, returning its base URL.
pub async fn spawn_app(backend_url: &str) -> String {
    let config = AppConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost".to_string(),
        api: ApiConfig {
            base_url: backend_url.to_string(),
        },
        sentry_dsn: None,
    };

    let state = AppState::new(config);
    let session_layer = create_session_layer(state.config());

    let app = Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .with_state(state);

    serve(app).await
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has no local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server error");
    });

    format!("http://{addr}")
}

// =============================================================================
// Fixtures
// =============================================================================

/// A stored product with distinct id and slug.
#[must_use]
pub fn sample_product(id: &str, title: &str, gender: Gender) -> Product {
    Product {
        id: ProductId::from(id),
        title: title.to_string(),
        price: Decimal::new(3000, 2),
        description: format!("{title} description"),
        slug: format!("{id}-slug"),
        stock: 7,
        sizes: vec![Size::M, Size::L],
        gender,
        tags: vec!["shirt".to_string()],
        images: vec![format!("{id}.jpg")],
        user: None,
    }
}

/// Write payload carrying a product's current fields.
#[must_use]
pub fn payload_from(product: &Product) -> ProductPayload {
    ProductPayload {
        title: product.title.clone(),
        price: product.price,
        description: product.description.clone(),
        slug: product.slug.clone(),
        stock: product.stock,
        sizes: product.sizes.clone(),
        gender: product.gender,
        tags: product.tags.clone(),
        images: product.images.clone(),
    }
}

/// An in-memory image file for upload tests.
#[must_use]
pub fn image_file(name: &str) -> ImageFile {
    ImageFile {
        file_name: name.to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, 0x50, 0x4E, 0x47],
    }
}

fn test_user() -> Value {
    json!({
        "id": "u1",
        "email": "ada@example.com",
        "fullName": TEST_USER_NAME,
        "isActive": true,
        "roles": ["admin"]
    })
}

// =============================================================================
// Product handlers
// =============================================================================

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    offset: Option<u32>,
    #[serde(default)]
    gender: Option<String>,
}

async fn list_products(
    State(state): State<Arc<MockBackend>>,
    Query(query): Query<ListQuery>,
) -> Json<Value> {
    state.counters.list.fetch_add(1, Ordering::SeqCst);

    let limit = query.limit.unwrap_or(10) as usize;
    let offset = query.offset.unwrap_or(0) as usize;
    let gender = query.gender.unwrap_or_default();

    let products = state.products.lock().await;
    let filtered: Vec<&Product> = products
        .iter()
        .filter(|p| gender.is_empty() || p.gender.as_str() == gender)
        .collect();

    let page: Vec<&Product> = filtered.iter().skip(offset).take(limit).copied().collect();

    Json(json!({
        "count": filtered.len(),
        "limit": limit,
        "offset": offset,
        "products": page,
    }))
}

async fn get_product(
    State(state): State<Arc<MockBackend>>,
    Path(term): Path<String>,
) -> Response {
    state.counters.get.fetch_add(1, Ordering::SeqCst);

    let products = state.products.lock().await;
    products
        .iter()
        .find(|p| p.id.as_str() == term || p.slug == term)
        .map_or_else(
            || not_found(&term),
            |product| Json(product.clone()).into_response(),
        )
}

async fn create_product(
    State(state): State<Arc<MockBackend>>,
    Json(payload): Json<Value>,
) -> Response {
    state.counters.create.fetch_add(1, Ordering::SeqCst);
    *state.last_product_payload.lock().await = Some(payload.clone());

    let id = format!("prod-{}", Uuid::new_v4());
    let product = product_from_payload(payload, &id);

    state.products.lock().await.push(product.clone());
    Json(product).into_response()
}

async fn update_product(
    State(state): State<Arc<MockBackend>>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    state.counters.update.fetch_add(1, Ordering::SeqCst);
    *state.last_product_payload.lock().await = Some(payload.clone());

    let mut products = state.products.lock().await;
    let Some(slot) = products.iter_mut().find(|p| p.id.as_str() == id) else {
        return not_found(&id);
    };

    *slot = product_from_payload(payload, &id);
    Json(slot.clone()).into_response()
}

fn product_from_payload(mut payload: Value, id: &str) -> Product {
    payload["id"] = json!(id);
    payload["user"] = test_user();
    serde_json::from_value(payload).expect("payload must deserialize into a product")
}

fn not_found(term: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("Product with {term} not found") })),
    )
        .into_response()
}

// =============================================================================
// Upload handler
// =============================================================================

/// Accepts one `file` part. File names containing `fail` are rejected, and
/// completion is staggered by the trailing digit of the name so later files
/// in a batch finish first.
async fn upload_file(State(state): State<Arc<MockBackend>>, mut multipart: Multipart) -> Response {
    state.counters.upload.fetch_add(1, Ordering::SeqCst);

    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let _bytes = field.bytes().await.expect("multipart bytes");

        if file_name.contains("fail") {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "upload rejected" })),
            )
                .into_response();
        }

        tokio::time::sleep(stagger_delay(&file_name)).await;
        return Json(json!({ "fileName": file_name })).into_response();
    }

    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "message": "missing file part" })),
    )
        .into_response()
}

/// Delay inverse to the trailing digit: `img-0` finishes last, `img-9`
/// first, so completion order is the reverse of input order.
fn stagger_delay(file_name: &str) -> Duration {
    let digit = file_name
        .chars()
        .filter(char::is_ascii_digit)
        .last()
        .and_then(|c| c.to_digit(10))
        .unwrap_or(0) as u64;
    Duration::from_millis((9 - digit.min(9)) * 25)
}

// =============================================================================
// Auth handlers
// =============================================================================

async fn login(State(state): State<Arc<MockBackend>>, Json(body): Json<Value>) -> Response {
    state.counters.login.fetch_add(1, Ordering::SeqCst);

    if body["password"] == TEST_PASSWORD {
        Json(json!({ "user": test_user(), "token": "tok-login" })).into_response()
    } else {
        unauthorized()
    }
}

async fn register(State(state): State<Arc<MockBackend>>, Json(body): Json<Value>) -> Response {
    state.counters.register.fetch_add(1, Ordering::SeqCst);

    let mut user = test_user();
    user["fullName"] = body["fullName"].clone();
    user["email"] = body["email"].clone();
    Json(json!({ "user": user, "token": "tok-register" })).into_response()
}

async fn check_status(State(state): State<Arc<MockBackend>>, headers: HeaderMap) -> Response {
    state.counters.check_status.fetch_add(1, Ordering::SeqCst);

    let authorized = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("Bearer tok-"));

    if authorized {
        Json(json!({ "user": test_user(), "token": "tok-rotated" })).into_response()
    } else {
        unauthorized()
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Invalid credentials" })),
    )
        .into_response()
}

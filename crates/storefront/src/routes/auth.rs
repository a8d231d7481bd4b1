//! Authentication route handlers.
//!
//! Login and registration delegate to the backend token API through
//! `AuthService`; failures are reported back through `?error=` query codes
//! rather than error pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use vesta_core::Email;

use crate::filters;
use crate::middleware::CurrentAuth;
use crate::routes::home::session_name;
use crate::services::AuthService;
use crate::state::AppState;

/// Minimum password length accepted by the backend.
const MIN_PASSWORD_LENGTH: usize = 6;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub user_name: Option<String>,
    pub error: Option<&'static str>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub user_name: Option<String>,
    pub error: Option<&'static str>,
}

/// Map an `?error=` code to its display message.
fn error_message(code: Option<&str>) -> Option<&'static str> {
    match code? {
        "credentials" => Some("Invalid email or password"),
        "password_mismatch" => Some("Passwords do not match"),
        "password_too_short" => Some("Password must be at least 6 characters"),
        "invalid_email" => Some("Enter a valid email address"),
        "failed" => Some("Could not create the account"),
        _ => Some("Something went wrong, please try again"),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    CurrentAuth(auth): CurrentAuth,
    Query(query): Query<MessageQuery>,
) -> LoginTemplate {
    LoginTemplate {
        user_name: session_name(&auth),
        error: error_message(query.error.as_deref()),
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let service = AuthService::new(state.backend(), &session);

    if service.login(&form.email, &form.password).await {
        Redirect::to("/").into_response()
    } else {
        Redirect::to("/auth/login?error=credentials").into_response()
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    CurrentAuth(auth): CurrentAuth,
    Query(query): Query<MessageQuery>,
) -> RegisterTemplate {
    RegisterTemplate {
        user_name: session_name(&auth),
        error: error_message(query.error.as_deref()),
    }
}

/// Handle registration form submission.
///
/// Local constraints are checked before anything is sent to the backend.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=password_mismatch").into_response();
    }

    if form.password.len() < MIN_PASSWORD_LENGTH {
        return Redirect::to("/auth/register?error=password_too_short").into_response();
    }

    if Email::parse(&form.email).is_err() {
        return Redirect::to("/auth/register?error=invalid_email").into_response();
    }

    let service = AuthService::new(state.backend(), &session);

    if service
        .register(&form.full_name, &form.email, &form.password)
        .await
    {
        Redirect::to("/").into_response()
    } else {
        Redirect::to("/auth/register?error=failed").into_response()
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout: clears the session unit, no backend call.
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    let service = AuthService::new(state.backend(), &session);
    service.logout().await;

    Redirect::to("/").into_response()
}

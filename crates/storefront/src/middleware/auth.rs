//! Authentication extractors.
//!
//! `CurrentAuth` resolves the session unit for any page, running the
//! initial token validation exactly once per browser session while the unit
//! is still in its `checking` state. `RequireAuth` additionally redirects
//! anonymous visitors to the login page.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{AuthSession, AuthStatus};
use crate::services::AuthService;
use crate::state::AppState;

/// Extractor that resolves the current authentication state.
///
/// Never rejects for anonymous visitors; pages use it to render the session
/// identity in the header.
pub struct CurrentAuth(pub AuthSession);

impl FromRequestParts<AppState> for CurrentAuth {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

        let service = AuthService::new(state.backend(), &session);
        let mut unit = service.load().await;

        // First request of a browser session: resolve the stored token once.
        // With no token this clears the unit without a network call.
        if unit.status() == AuthStatus::Checking {
            service.check_status().await;
            unit = service.load().await;
        }

        Ok(Self(unit))
    }
}

/// Extractor that requires an authenticated session.
///
/// # Example
///
/// ```rust,ignore
/// async fn admin_handler(RequireAuth(auth): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", auth.user().map_or("", |u| &u.full_name))
/// }
/// ```
pub struct RequireAuth(pub AuthSession);

/// Rejection for [`RequireAuth`].
pub enum AuthRejection {
    /// Redirect anonymous visitors to the login page.
    RedirectToLogin,
    /// The session layer is missing.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentAuth(unit) = CurrentAuth::from_request_parts(parts, state)
            .await
            .map_err(|_| AuthRejection::Internal)?;

        if unit.is_authenticated() {
            Ok(Self(unit))
        } else {
            Err(AuthRejection::RedirectToLogin)
        }
    }
}

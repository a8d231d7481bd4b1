//! Authentication session service.
//!
//! Wraps the backend auth endpoints and the per-browser session unit.
//! Every operation resolves to a plain success flag: any failure clears the
//! session and is logged, never propagated to the caller.

use secrecy::SecretString;
use tower_sessions::Session;
use tracing::warn;

use crate::backend::{AuthResponse, BackendClient};
use crate::models::{AUTH_SESSION_KEY, AuthSession};

/// Per-request authentication service.
pub struct AuthService<'a> {
    backend: &'a BackendClient,
    session: &'a Session,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service for one request.
    #[must_use]
    pub const fn new(backend: &'a BackendClient, session: &'a Session) -> Self {
        Self { backend, session }
    }

    /// Log in with email and password.
    ///
    /// On success the session unit is established and persisted; on any
    /// failure the unit is cleared and `false` is returned.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        match self.backend.login(email, password).await {
            Ok(response) => self.handle_success(response).await,
            Err(err) => {
                warn!(error = %err, "login failed");
                self.handle_failure().await
            }
        }
    }

    /// Register a new account; the backend signs the user straight in.
    ///
    /// Same success/failure contract as [`Self::login`].
    pub async fn register(&self, full_name: &str, email: &str, password: &str) -> bool {
        match self.backend.register(full_name, email, password).await {
            Ok(response) => self.handle_success(response).await,
            Err(err) => {
                warn!(error = %err, "registration failed");
                self.handle_failure().await
            }
        }
    }

    /// Validate the stored token against the backend.
    ///
    /// With no stored token this resolves to `false` immediately, clearing
    /// the unit without a network call. Otherwise the token is validated
    /// (and rotated) with the same success/failure handling as login.
    pub async fn check_status(&self) -> bool {
        let stored = self.load().await;
        let Some(token) = stored.token().map(str::to_owned) else {
            return self.handle_failure().await;
        };

        match self.backend.check_status(&SecretString::from(token)).await {
            Ok(response) => self.handle_success(response).await,
            Err(err) => {
                warn!(error = %err, "token validation failed");
                self.handle_failure().await
            }
        }
    }

    /// Drop the session unit unconditionally. No network call.
    pub async fn logout(&self) {
        let _ = self.handle_failure().await;
    }

    /// Current session unit, defaulting to the initial `checking` state.
    pub async fn load(&self) -> AuthSession {
        self.session
            .get::<AuthSession>(AUTH_SESSION_KEY)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    async fn handle_success(&self, response: AuthResponse) -> bool {
        let mut unit = AuthSession::default();
        unit.establish(response.user, response.token);

        if let Err(err) = self.session.insert(AUTH_SESSION_KEY, &unit).await {
            warn!(error = %err, "failed to persist auth session");
            return self.handle_failure().await;
        }
        true
    }

    /// Full session clear; always resolves to `false`.
    async fn handle_failure(&self) -> bool {
        let mut unit = AuthSession::default();
        unit.clear();

        if let Err(err) = self.session.insert(AUTH_SESSION_KEY, &unit).await {
            warn!(error = %err, "failed to clear auth session");
        }
        false
    }
}

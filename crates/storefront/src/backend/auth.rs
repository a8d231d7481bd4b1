//! Authentication endpoints of the backend API.
//!
//! These are plain wire calls; session bookkeeping lives in
//! `services::auth`.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::instrument;

use super::types::AuthResponse;
use super::{BackendClient, BackendError};

impl BackendClient {
    /// Exchange credentials for a bearer token and user profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request
    /// fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Create an account; the backend signs the new user straight in.
    ///
    /// # Errors
    ///
    /// Returns an error if the account cannot be created or the request
    /// fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, BackendError> {
        let response = self
            .inner
            .client
            .post(self.url("/auth/register"))
            .json(&json!({
                "fullName": full_name,
                "email": email,
                "password": password,
            }))
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Validate a bearer token, receiving a rotated token and the user
    /// profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip_all)]
    pub async fn check_status(&self, token: &SecretString) -> Result<AuthResponse, BackendError> {
        let response = self
            .inner
            .client
            .get(self.url("/auth/check-status"))
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        Self::read_json(response).await
    }
}

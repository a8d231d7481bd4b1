//! Session-held authentication state.
//!
//! The whole unit (raw flag, user, token) is serialized under a single
//! session key so the three fields can only ever change together.

use serde::{Deserialize, Serialize};

use crate::backend::User;

/// Fixed session key for the [`AuthSession`] unit.
pub const AUTH_SESSION_KEY: &str = "auth_session";

/// Authentication status derived from the session unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// The stored token has not been validated or rejected yet.
    Checking,
    Authenticated,
    NotAuthenticated,
}

/// Raw resolution flag. Starts at `Checking` and flips once the stored
/// token has been validated or rejected for this browser session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum RawStatus {
    #[default]
    Checking,
    Authenticated,
    NotAuthenticated,
}

/// The session unit: status flag, user and bearer token.
///
/// Fields are private; the public status is always derived from them and can
/// never be set directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSession {
    status: RawStatus,
    user: Option<User>,
    token: Option<String>,
}

impl AuthSession {
    /// Derived status: `Checking` while unresolved, `Authenticated` iff a
    /// user is present, otherwise `NotAuthenticated`.
    #[must_use]
    pub const fn status(&self) -> AuthStatus {
        match self.status {
            RawStatus::Checking => AuthStatus::Checking,
            RawStatus::Authenticated | RawStatus::NotAuthenticated => {
                if self.user.is_some() {
                    AuthStatus::Authenticated
                } else {
                    AuthStatus::NotAuthenticated
                }
            }
        }
    }

    /// Whether the derived status is `Authenticated`.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status() == AuthStatus::Authenticated
    }

    /// The current user, present only while authenticated.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The stored bearer token, present only while authenticated.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Establish the unit after a successful backend response; user, token
    /// and flag move together.
    pub fn establish(&mut self, user: User, token: String) {
        self.status = RawStatus::Authenticated;
        self.user = Some(user);
        self.token = Some(token);
    }

    /// Clear the unit: flag to not-authenticated, user and token removed.
    pub fn clear(&mut self) {
        self.status = RawStatus::NotAuthenticated;
        self.user = None;
        self.token = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vesta_core::UserId;

    use super::*;

    fn user() -> User {
        User {
            id: UserId::from("u1"),
            email: "user@example.com".to_string(),
            full_name: "Test User".to_string(),
            is_active: true,
            roles: vec!["user".to_string()],
        }
    }

    #[test]
    fn test_starts_checking() {
        let unit = AuthSession::default();
        assert_eq!(unit.status(), AuthStatus::Checking);
        assert!(unit.user().is_none());
        assert!(unit.token().is_none());
    }

    #[test]
    fn test_establish_sets_everything_together() {
        let mut unit = AuthSession::default();
        unit.establish(user(), "tok-1".to_string());

        assert_eq!(unit.status(), AuthStatus::Authenticated);
        assert!(unit.is_authenticated());
        assert_eq!(unit.user().unwrap().email, "user@example.com");
        assert_eq!(unit.token(), Some("tok-1"));
    }

    #[test]
    fn test_clear_removes_everything_together() {
        let mut unit = AuthSession::default();
        unit.establish(user(), "tok-1".to_string());
        unit.clear();

        assert_eq!(unit.status(), AuthStatus::NotAuthenticated);
        assert!(unit.user().is_none());
        assert!(unit.token().is_none());
    }

    #[test]
    fn test_serde_roundtrip_preserves_unit() {
        let mut unit = AuthSession::default();
        unit.establish(user(), "tok-1".to_string());

        let json = serde_json::to_string(&unit).unwrap();
        let restored: AuthSession = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.status(), AuthStatus::Authenticated);
        assert_eq!(restored.token(), Some("tok-1"));
    }
}

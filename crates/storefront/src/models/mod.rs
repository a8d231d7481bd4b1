//! Application models.

pub mod session;

pub use session::{AUTH_SESSION_KEY, AuthSession, AuthStatus};

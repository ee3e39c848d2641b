//! Demo login against the two built-in accounts.
//!
//! There is no credential store: usernames are matched case-insensitively
//! against fixed pairs and the token is a placeholder.

use chrono::Utc;
use thiserror::Error;

use super::{Role, SessionData};

const DEMO_ACCOUNTS: [(&str, &str, Role); 2] = [
    ("admin", "admin123", Role::Admin),
    ("officer", "officer123", Role::Officer),
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please enter both username and password")]
    MissingCredentials,

    #[error("Invalid username or password")]
    InvalidCredentials,
}

/// Match a username/password pair and build the session for it.
pub fn login(username: &str, password: &str) -> Result<SessionData, AuthError> {
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let role = DEMO_ACCOUNTS
        .iter()
        .find(|(user, pass, _)| username.eq_ignore_ascii_case(user) && password == *pass)
        .map(|(_, _, role)| *role)
        .ok_or(AuthError::InvalidCredentials)?;

    let now = Utc::now();
    Ok(SessionData {
        username: username.to_string(),
        role,
        token: format!("dummy-jwt-token-{}-{}", role, now.timestamp_millis()),
        created_at: now,
    })
}

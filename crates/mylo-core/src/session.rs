//! Authenticated identity carried into post-login routes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Provider-assigned user identifier.
///
/// Stable for the lifetime of the account; used as the profile document key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An authenticated session (email + provider user id).
///
/// Created on successful sign-in or sign-up and dropped on sign-out.
/// The email is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    email: String,
    user_id: UserId,
}

impl Session {
    /// Builds a session, returning `None` when the email is blank.
    pub fn new(email: impl Into<String>, user_id: UserId) -> Option<Self> {
        let email = email.into();
        if email.trim().is_empty() {
            return None;
        }
        Some(Self { email, user_id })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_rejects_blank_email() {
        assert!(Session::new("", UserId::new("u1")).is_none());
        assert!(Session::new("   ", UserId::new("u1")).is_none());
    }

    #[test]
    fn test_session_keeps_email_and_user_id() {
        let session = Session::new("ana@example.com", UserId::new("u1")).unwrap();
        assert_eq!(session.email(), "ana@example.com");
        assert_eq!(session.user_id().as_str(), "u1");
    }

    #[test]
    fn test_user_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&UserId::new("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }
}

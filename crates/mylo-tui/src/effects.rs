//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent client calls and task spawning only; the reducer never
//! performs I/O itself.

use std::fmt;

use mylo_core::profile::Profile;
use mylo_core::session::UserId;

use crate::common::TaskId;

/// Email/password pair submitted from the Login or Register screen.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Sign in through the auth client.
    SignIn {
        task: TaskId,
        credentials: Credentials,
    },

    /// Create an account through the auth client.
    SignUp {
        task: TaskId,
        credentials: Credentials,
    },

    /// Local sign-out; fire and forget.
    SignOut,

    /// Fetch the profile for the Home screen's session.
    LoadProfile { task: TaskId, user_id: UserId },

    /// Replace the stored profile.
    SaveProfile {
        task: TaskId,
        user_id: UserId,
        profile: Profile,
    },
}

impl UiEffect {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            UiEffect::Quit => "quit",
            UiEffect::SignIn { .. } => "sign_in",
            UiEffect::SignUp { .. } => "sign_up",
            UiEffect::SignOut => "sign_out",
            UiEffect::LoadProfile { .. } => "load_profile",
            UiEffect::SaveProfile { .. } => "save_profile",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials {
            email: "ana@example.com".into(),
            password: "hunter22".into(),
        };
        let debug = format!("{credentials:?}");
        assert!(debug.contains("ana@example.com"));
        assert!(!debug.contains("hunter22"));
    }
}

//! Auth and profile store client interfaces.
//!
//! Both collaborators are external: the identity provider and the document
//! store are consumed through these traits. Concrete implementations live in
//! `providers` (Firebase REST and in-memory).

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Backend, Config};
use crate::profile::Profile;
use crate::providers::firebase::{FirebaseAuth, FirebaseAuthConfig, IdTokenSource};
use crate::providers::firestore::{FirestoreConfig, FirestoreStore};
use crate::providers::memory::{MemoryAuth, MemoryProfileStore};
use crate::session::{Session, UserId};

/// Sign-in or sign-up rejection. The only failure class shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The provider refused the request; carries the provider's message.
    #[error("{0}")]
    Rejected(String),

    /// The provider could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Email is required")]
    MissingEmail,

    /// Sign-up succeeded but the provider reports no current user.
    #[error("Account created but no active session")]
    NoActiveSession,
}

/// Profile load/save failure. Never surfaced as a fatal error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("No signed-in user for profile access")]
    Unauthenticated,

    #[error("Profile store rejected the request: {0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed profile document: {0}")]
    Malformed(String),
}

/// Successful sign-in. Providers that do not echo the user id leave it empty;
/// callers then fall back to `AuthClient::current_user_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedIn {
    pub user_id: Option<UserId>,
}

/// Identity provider client.
#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AuthError>;

    /// Creates an account. On success the new account becomes the current user.
    async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError>;

    /// Local sign-out; cannot fail.
    fn sign_out(&self);

    fn current_user_id(&self) -> Option<UserId>;
}

/// Document store holding one profile per user id.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns `Ok(None)` when no profile exists yet.
    async fn get(&self, user_id: &UserId) -> Result<Option<Profile>, ProfileError>;

    /// Replaces the profile document for `user_id`.
    async fn put(&self, user_id: &UserId, profile: &Profile) -> Result<(), ProfileError>;
}

/// Signs in and resolves the resulting session.
///
/// # Errors
/// Returns the provider's rejection, or `NoActiveSession` if no user id can be resolved.
pub async fn sign_in_session(
    auth: &dyn AuthClient,
    email: &str,
    password: &str,
) -> Result<Session, AuthError> {
    let signed_in = auth.sign_in(email, password).await?;
    let user_id = signed_in
        .user_id
        .or_else(|| auth.current_user_id())
        .ok_or(AuthError::NoActiveSession)?;
    Session::new(email, user_id).ok_or(AuthError::MissingEmail)
}

/// Creates an account and resolves the session through the current user accessor.
///
/// # Errors
/// Returns the provider's rejection, or `NoActiveSession` if the provider has no current user.
pub async fn sign_up_session(
    auth: &dyn AuthClient,
    email: &str,
    password: &str,
) -> Result<Session, AuthError> {
    auth.sign_up(email, password).await?;
    let user_id = auth.current_user_id().ok_or(AuthError::NoActiveSession)?;
    Session::new(email, user_id).ok_or(AuthError::MissingEmail)
}

/// The pair of external collaborators the front-end talks to.
#[derive(Clone)]
pub struct Clients {
    pub auth: Arc<dyn AuthClient>,
    pub profiles: Arc<dyn ProfileStore>,
}

impl Clients {
    /// In-process clients with no network access.
    pub fn memory() -> Self {
        Self {
            auth: Arc::new(MemoryAuth::new()),
            profiles: Arc::new(MemoryProfileStore::new()),
        }
    }

    /// Builds the clients selected by `config.backend`.
    ///
    /// # Errors
    /// Returns an error if the Firebase settings are incomplete or invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.backend {
            Backend::Memory => Ok(Self::memory()),
            Backend::Firebase => {
                config.validate()?;
                let auth = Arc::new(FirebaseAuth::new(FirebaseAuthConfig {
                    api_key: config.firebase.api_key.clone(),
                    base_url: config.firebase.auth_base_url.clone(),
                    token_base_url: config.firebase.token_base_url.clone(),
                }));
                let tokens: Arc<dyn IdTokenSource> = Arc::clone(&auth) as Arc<dyn IdTokenSource>;
                let store = FirestoreStore::new(
                    FirestoreConfig {
                        base_url: config.firebase.firestore_base_url.clone(),
                        project_id: config.firebase.project_id.clone(),
                        collection: config.firebase.collection.clone(),
                    },
                    tokens,
                )?;
                Ok(Self {
                    auth,
                    profiles: Arc::new(store),
                })
            }
        }
    }
}

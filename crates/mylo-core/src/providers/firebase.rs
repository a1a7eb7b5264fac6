//! Firebase Authentication over the Identity Toolkit REST API.
//!
//! Email/password accounts only. The signed-in user (id + id token) is held
//! here, the same way the mobile SDK keeps its current user; the Firestore
//! store reads the id token through `IdTokenSource`.
//!
//! Id tokens expire after an hour. `refresh_id_token` trades the stored
//! refresh token for a new one at the Secure Token endpoint.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::google_error_message;
use crate::clients::{AuthClient, AuthError, SignedIn};
use crate::session::UserId;

/// Supplies the bearer token for document store requests.
#[async_trait]
pub trait IdTokenSource: Send + Sync {
    fn id_token(&self) -> Option<String>;

    /// Replaces an expired id token. Returns the new token, or `None` if
    /// no user is signed in or the refresh was refused.
    async fn refresh_id_token(&self) -> Option<String>;
}

/// Identity Toolkit connection settings.
#[derive(Debug, Clone)]
pub struct FirebaseAuthConfig {
    pub api_key: String,
    pub base_url: String,
    /// Secure Token service base URL (token refresh).
    pub token_base_url: String,
}

#[derive(Debug, Clone)]
struct CurrentUser {
    user_id: UserId,
    id_token: String,
    refresh_token: Option<String>,
}

/// Firebase email/password auth client.
pub struct FirebaseAuth {
    config: FirebaseAuthConfig,
    http: reqwest::Client,
    current: RwLock<Option<CurrentUser>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    id_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
}

/// Secure Token responses use snake_case, unlike Identity Toolkit.
#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    user_id: String,
}

impl FirebaseAuth {
    pub fn new(config: FirebaseAuthConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            current: RwLock::new(None),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1/accounts:{action}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Posts an email/password request and records the returned user as current.
    async fn password_request(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<UserId, AuthError> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };

        let response = self
            .http
            .post(self.endpoint(action))
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = google_error_message(status, &text);
            tracing::info!(action, %status, %message, "auth request rejected");
            return Err(AuthError::Rejected(message));
        }

        let account: AccountResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Network(format!("invalid auth response: {e}")))?;

        let user_id = UserId::new(account.local_id);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(CurrentUser {
            user_id: user_id.clone(),
            id_token: account.id_token,
            refresh_token: account.refresh_token,
        });
        tracing::info!(action, user_id = %user_id, "auth request succeeded");
        Ok(user_id)
    }

    fn current(&self) -> Option<CurrentUser> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<RefreshResponse, String> {
        let url = format!(
            "{}/v1/token",
            self.config.token_base_url.trim_end_matches('/')
        );
        let response = self
            .http
            .post(url)
            .query(&[("key", self.config.api_key.as_str())])
            .form(&RefreshRequest {
                grant_type: "refresh_token",
                refresh_token,
            })
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(google_error_message(status, &text));
        }
        response
            .json()
            .await
            .map_err(|e| format!("invalid token response: {e}"))
    }
}

#[async_trait]
impl AuthClient for FirebaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AuthError> {
        let user_id = self
            .password_request("signInWithPassword", email, password)
            .await?;
        Ok(SignedIn {
            user_id: Some(user_id),
        })
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.password_request("signUp", email, password).await?;
        Ok(())
    }

    fn sign_out(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn current_user_id(&self) -> Option<UserId> {
        self.current().map(|user| user.user_id)
    }
}

#[async_trait]
impl IdTokenSource for FirebaseAuth {
    fn id_token(&self) -> Option<String> {
        self.current().map(|user| user.id_token)
    }

    async fn refresh_id_token(&self) -> Option<String> {
        let user = self.current()?;
        let refresh_token = user.refresh_token?;

        let refreshed = match self.exchange_refresh_token(&refresh_token).await {
            Ok(refreshed) => refreshed,
            Err(message) => {
                tracing::warn!(user_id = %user.user_id, %message, "id token refresh failed");
                return None;
            }
        };

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        // A sign-out or account switch during the exchange wins.
        let slot = current
            .as_mut()
            .filter(|slot| slot.user_id.as_str() == refreshed.user_id)?;
        slot.id_token = refreshed.id_token.clone();
        slot.refresh_token = Some(refreshed.refresh_token);
        tracing::debug!(user_id = %slot.user_id, "id token refreshed");
        Some(refreshed.id_token)
    }
}

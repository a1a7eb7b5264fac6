//! Effect handlers for the TUI runtime.
//!
//! Handlers are pure async functions that call a client and return the
//! result as a `UiEvent`. They never touch `AppState`; the runtime spawns
//! them and sends the returned event to the inbox.

use std::sync::Arc;

use mylo_core::clients::{AuthClient, ProfileStore, sign_in_session, sign_up_session};
use mylo_core::profile::Profile;
use mylo_core::session::UserId;

use crate::effects::Credentials;
use crate::events::UiEvent;

pub async fn sign_in(auth: Arc<dyn AuthClient>, credentials: Credentials) -> UiEvent {
    let result = sign_in_session(auth.as_ref(), &credentials.email, &credentials.password).await;
    match &result {
        Ok(session) => tracing::info!(user_id = %session.user_id(), "Signed in"),
        Err(err) => tracing::info!(error = %err, "Sign-in rejected"),
    }
    UiEvent::SignInFinished(result)
}

pub async fn sign_up(auth: Arc<dyn AuthClient>, credentials: Credentials) -> UiEvent {
    let result = sign_up_session(auth.as_ref(), &credentials.email, &credentials.password).await;
    match &result {
        Ok(session) => tracing::info!(user_id = %session.user_id(), "Account created"),
        Err(err) => tracing::info!(error = %err, "Sign-up rejected"),
    }
    UiEvent::SignUpFinished(result)
}

pub fn sign_out(auth: &dyn AuthClient) {
    auth.sign_out();
    tracing::info!("Signed out");
}

pub async fn load_profile(profiles: Arc<dyn ProfileStore>, user_id: UserId) -> UiEvent {
    let result = profiles.get(&user_id).await;
    match &result {
        Ok(Some(_)) => tracing::debug!(%user_id, "Profile loaded"),
        Ok(None) => tracing::debug!(%user_id, "No profile stored yet"),
        Err(err) => tracing::warn!(%user_id, error = %err, "Profile load failed"),
    }
    UiEvent::ProfileLoaded(result)
}

pub async fn save_profile(
    profiles: Arc<dyn ProfileStore>,
    user_id: UserId,
    profile: Profile,
) -> UiEvent {
    let result = profiles.put(&user_id, &profile).await;
    match &result {
        Ok(()) => tracing::info!(%user_id, "Profile saved"),
        Err(err) => tracing::warn!(%user_id, error = %err, "Profile save failed"),
    }
    UiEvent::ProfileSaved { profile, result }
}

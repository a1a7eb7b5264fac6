//! In-process auth and profile stores.
//!
//! Used for `--offline` runs and as test doubles. Error messages follow the
//! identity provider's wording so the screens behave the same either way.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::clients::{AuthClient, AuthError, ProfileError, ProfileStore, SignedIn};
use crate::profile::Profile;
use crate::session::UserId;

/// Minimum password length accepted on sign-up.
const MIN_PASSWORD_LEN: usize = 6;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct Account {
    password: String,
    user_id: UserId,
}

#[derive(Debug, Default)]
struct AuthInner {
    accounts: HashMap<String, Account>,
    current: Option<UserId>,
}

/// In-memory identity provider.
#[derive(Debug, Default)]
pub struct MemoryAuth {
    inner: Mutex<AuthInner>,
    calls: AtomicUsize,
    unreachable: AtomicBool,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account directly, returning its user id.
    pub fn add_account(&self, email: &str, password: &str) -> UserId {
        let user_id = UserId::new(uuid::Uuid::new_v4().simple().to_string());
        lock(&self.inner).accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user_id: user_id.clone(),
            },
        );
        user_id
    }

    /// Makes every sign-in/sign-up fail with a network error.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Number of sign-in/sign-up requests received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin_call(&self) -> Result<(), AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(AuthError::Network("provider unreachable".to_string()));
        }
        Ok(())
    }
}

fn check_credentials(email: &str, password: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() {
        return Err(AuthError::Rejected("INVALID_EMAIL".to_string()));
    }
    if password.is_empty() {
        return Err(AuthError::Rejected("MISSING_PASSWORD".to_string()));
    }
    Ok(())
}

#[async_trait]
impl AuthClient for MemoryAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AuthError> {
        self.begin_call()?;
        check_credentials(email, password)?;

        let mut inner = lock(&self.inner);
        let user_id = match inner.accounts.get(email) {
            Some(account) if account.password == password => account.user_id.clone(),
            _ => return Err(AuthError::Rejected("INVALID_LOGIN_CREDENTIALS".to_string())),
        };
        inner.current = Some(user_id.clone());
        Ok(SignedIn {
            user_id: Some(user_id),
        })
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.begin_call()?;
        check_credentials(email, password)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Rejected(
                "WEAK_PASSWORD : Password should be at least 6 characters".to_string(),
            ));
        }

        let mut inner = lock(&self.inner);
        if inner.accounts.contains_key(email) {
            return Err(AuthError::Rejected("EMAIL_EXISTS".to_string()));
        }
        let user_id = UserId::new(uuid::Uuid::new_v4().simple().to_string());
        inner.accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user_id: user_id.clone(),
            },
        );
        inner.current = Some(user_id);
        Ok(())
    }

    fn sign_out(&self) {
        lock(&self.inner).current = None;
    }

    fn current_user_id(&self) -> Option<UserId> {
        lock(&self.inner).current.clone()
    }
}

/// In-memory profile document store.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    documents: Mutex<HashMap<UserId, Profile>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    puts: AtomicUsize,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user_id: UserId, profile: Profile) {
        lock(&self.documents).insert(user_id, profile);
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of put requests received (including failed ones).
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<Profile>, ProfileError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(ProfileError::Network("store unreachable".to_string()));
        }
        Ok(lock(&self.documents).get(user_id).cloned())
    }

    async fn put(&self, user_id: &UserId, profile: &Profile) -> Result<(), ProfileError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ProfileError::Network("store unreachable".to_string()));
        }
        lock(&self.documents).insert(user_id.clone(), profile.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_with_wrong_password_is_rejected() {
        let auth = MemoryAuth::new();
        auth.add_account("ana@example.com", "secret1");

        let err = auth.sign_in("ana@example.com", "nope").await.unwrap_err();
        assert_eq!(
            err,
            AuthError::Rejected("INVALID_LOGIN_CREDENTIALS".to_string())
        );
        assert!(auth.current_user_id().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_sets_current_user() {
        let auth = MemoryAuth::new();
        let id = auth.add_account("ana@example.com", "secret1");

        let signed_in = auth.sign_in("ana@example.com", "secret1").await.unwrap();
        assert_eq!(signed_in.user_id, Some(id.clone()));
        assert_eq!(auth.current_user_id(), Some(id));

        auth.sign_out();
        assert!(auth.current_user_id().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_rejects_existing_and_weak() {
        let auth = MemoryAuth::new();
        auth.add_account("ana@example.com", "secret1");

        let existing = auth.sign_up("ana@example.com", "secret2").await.unwrap_err();
        assert_eq!(existing, AuthError::Rejected("EMAIL_EXISTS".to_string()));

        let weak = auth.sign_up("bo@example.com", "123").await.unwrap_err();
        assert!(weak.to_string().starts_with("WEAK_PASSWORD"));
        assert_eq!(auth.calls(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_provider_reports_network_error() {
        let auth = MemoryAuth::new();
        auth.add_account("ana@example.com", "secret1");
        auth.set_unreachable(true);

        let err = auth.sign_in("ana@example.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AuthError::Network(_)));
    }

    #[tokio::test]
    async fn test_profile_store_round_trip() {
        let store = MemoryProfileStore::new();
        let id = UserId::new("u1");
        assert_eq!(store.get(&id).await.unwrap(), None);

        let profile = Profile {
            name: "Ana".to_string(),
            age: Some(30),
            city: "Lima".to_string(),
        };
        store.put(&id, &profile).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), Some(profile));
        assert_eq!(store.puts(), 1);
    }

    #[tokio::test]
    async fn test_profile_store_failure_injection() {
        let store = MemoryProfileStore::new();
        let id = UserId::new("u1");
        store.set_fail_saves(true);
        assert!(store.put(&id, &Profile::default()).await.is_err());
        store.set_fail_loads(true);
        assert!(store.get(&id).await.is_err());
        store.set_fail_loads(false);
        assert_eq!(store.get(&id).await.unwrap(), None);
    }
}

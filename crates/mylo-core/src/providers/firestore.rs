//! Profile documents in Cloud Firestore over REST.
//!
//! One document per user at `{collection}/{user_id}`. Field names match the
//! documents written by the mobile app: `nombre`, `edad`, `ciudad`.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;

use super::firebase::IdTokenSource;
use super::google_error_message;
use crate::clients::{ProfileError, ProfileStore};
use crate::profile::Profile;
use crate::session::UserId;

const FIELD_NAME: &str = "nombre";
const FIELD_AGE: &str = "edad";
const FIELD_CITY: &str = "ciudad";

/// Firestore connection settings.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    pub base_url: String,
    pub project_id: String,
    pub collection: String,
}

/// Firestore-backed profile store.
pub struct FirestoreStore {
    base_url: Url,
    project_id: String,
    collection: String,
    http: reqwest::Client,
    tokens: Arc<dyn IdTokenSource>,
}

/// Wire shape of a Firestore document (only `fields` is used).
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    fields: HashMap<String, Value>,
}

impl FirestoreStore {
    /// Creates a store.
    ///
    /// # Errors
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn new(config: FirestoreConfig, tokens: Arc<dyn IdTokenSource>) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid Firestore base URL: {}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("Invalid Firestore base URL: {}", config.base_url);
        }
        Ok(Self {
            base_url,
            project_id: config.project_id,
            collection: config.collection,
            http: reqwest::Client::new(),
            tokens,
        })
    }

    fn document_url(&self, user_id: &UserId) -> Result<Url, ProfileError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ProfileError::Malformed("base URL cannot hold a path".to_string()))?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                self.project_id.as_str(),
                "databases",
                "(default)",
                "documents",
                self.collection.as_str(),
                user_id.as_str(),
            ]);
        Ok(url)
    }

    /// Sends the request built by `build` with the current id token. On a 401
    /// the token is refreshed once and the request is sent again.
    async fn send_authorized(
        &self,
        build: impl Fn() -> reqwest::RequestBuilder + Send + Sync,
    ) -> Result<reqwest::Response, ProfileError> {
        let token = self.tokens.id_token().ok_or(ProfileError::Unauthenticated)?;
        let response = send(build().bearer_auth(token)).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let Some(token) = self.tokens.refresh_id_token().await else {
            return Ok(response);
        };
        tracing::debug!("retrying profile request with refreshed token");
        send(build().bearer_auth(token)).await
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, ProfileError> {
    request
        .send()
        .await
        .map_err(|e| ProfileError::Network(e.to_string()))
}

async fn rejection(response: reqwest::Response) -> ProfileError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    ProfileError::Rejected(google_error_message(status, &text))
}

#[async_trait]
impl ProfileStore for FirestoreStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<Profile>, ProfileError> {
        let url = self.document_url(user_id)?;
        let response = self
            .send_authorized(|| self.http.get(url.clone()))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let document: Document = response
            .json()
            .await
            .map_err(|e| ProfileError::Malformed(e.to_string()))?;
        Ok(Some(decode_profile(&document.fields)))
    }

    async fn put(&self, user_id: &UserId, profile: &Profile) -> Result<(), ProfileError> {
        let url = self.document_url(user_id)?;
        let body = encode_profile(profile);
        let response = self
            .send_authorized(|| self.http.patch(url.clone()).json(&body))
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(())
    }
}

/// Builds the `{"fields": ...}` body for a profile. Absent age is written as null.
fn encode_profile(profile: &Profile) -> Value {
    let age = profile.age.map_or_else(
        || json!({ "nullValue": null }),
        |age| json!({ "integerValue": age.to_string() }),
    );
    json!({
        "fields": {
            FIELD_NAME: { "stringValue": profile.name },
            FIELD_AGE: age,
            FIELD_CITY: { "stringValue": profile.city },
        }
    })
}

/// Reads a profile from document fields. Missing strings decode as empty,
/// non-integer or out-of-range ages as absent.
fn decode_profile(fields: &HashMap<String, Value>) -> Profile {
    Profile {
        name: string_field(fields, FIELD_NAME),
        age: integer_field(fields, FIELD_AGE),
        city: string_field(fields, FIELD_CITY),
    }
}

fn string_field(fields: &HashMap<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(|value| value.get("stringValue"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn integer_field(fields: &HashMap<String, Value>, key: &str) -> Option<i32> {
    let raw = fields.get(key)?.get("integerValue")?;
    // integerValue is an int64 encoded as a JSON string; tolerate bare numbers.
    match raw {
        Value::String(text) => text.parse().ok(),
        Value::Number(number) => number.as_i64().and_then(|n| i32::try_from(n).ok()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const DOC_PATH: &str = "/v1/projects/demo/databases/(default)/documents/usuarios/uid-1";

    struct FixedToken(Option<&'static str>);

    #[async_trait]
    impl IdTokenSource for FixedToken {
        fn id_token(&self) -> Option<String> {
            self.0.map(str::to_string)
        }

        async fn refresh_id_token(&self) -> Option<String> {
            None
        }
    }

    /// Hands out `stale` until refreshed, then `fresh`.
    struct ExpiringToken {
        refreshed: AtomicBool,
    }

    #[async_trait]
    impl IdTokenSource for ExpiringToken {
        fn id_token(&self) -> Option<String> {
            let token = if self.refreshed.load(Ordering::SeqCst) {
                "fresh"
            } else {
                "stale"
            };
            Some(token.to_string())
        }

        async fn refresh_id_token(&self) -> Option<String> {
            self.refreshed.store(true, Ordering::SeqCst);
            self.id_token()
        }
    }

    fn store(server: &MockServer, token: Option<&'static str>) -> FirestoreStore {
        FirestoreStore::new(
            FirestoreConfig {
                base_url: server.uri(),
                project_id: "demo".to_string(),
                collection: "usuarios".to_string(),
            },
            Arc::new(FixedToken(token)),
        )
        .unwrap()
    }

    fn fields(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_full_document() {
        let profile = decode_profile(&fields(json!({
            "nombre": {"stringValue": "Ana"},
            "edad": {"integerValue": "30"},
            "ciudad": {"stringValue": "Lima"}
        })));
        assert_eq!(
            profile,
            Profile {
                name: "Ana".to_string(),
                age: Some(30),
                city: "Lima".to_string()
            }
        );
    }

    #[test]
    fn test_decode_null_and_missing_fields() {
        let profile = decode_profile(&fields(json!({
            "nombre": {"stringValue": "Ana"},
            "edad": {"nullValue": null}
        })));
        assert_eq!(profile.age, None);
        assert_eq!(profile.city, "");
    }

    #[test]
    fn test_encode_absent_age_as_null() {
        let body = encode_profile(&Profile {
            name: "Ana".to_string(),
            age: None,
            city: "Lima".to_string(),
        });
        assert_eq!(body["fields"]["edad"], json!({"nullValue": null}));
        assert_eq!(body["fields"]["nombre"], json!({"stringValue": "Ana"}));
    }

    #[test]
    fn test_rejects_non_base_url() {
        let result = FirestoreStore::new(
            FirestoreConfig {
                base_url: "mailto:someone@example.com".to_string(),
                project_id: "demo".to_string(),
                collection: "usuarios".to_string(),
            },
            Arc::new(FixedToken(None)),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_missing_document_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DOC_PATH))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": 404, "message": "Document not found", "status": "NOT_FOUND"}
            })))
            .mount(&server)
            .await;

        let result = store(&server, Some("tok")).get(&UserId::new("uid-1")).await;
        assert_eq!(result.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_sends_fields_and_get_reads_them() {
        let server = MockServer::start().await;
        let document = json!({
            "fields": {
                "nombre": {"stringValue": "Ana"},
                "edad": {"integerValue": "30"},
                "ciudad": {"stringValue": "Lima"}
            }
        });
        Mock::given(method("PATCH"))
            .and(path(DOC_PATH))
            .and(body_json(document.clone()))
            .respond_with(ResponseTemplate::new(200).set_body_json(document.clone()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(DOC_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(document))
            .mount(&server)
            .await;

        let store = store(&server, Some("tok"));
        let id = UserId::new("uid-1");
        let profile = Profile {
            name: "Ana".to_string(),
            age: Some(30),
            city: "Lima".to_string(),
        };
        store.put(&id, &profile).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), Some(profile));
    }

    #[tokio::test]
    async fn test_permission_denied_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(DOC_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "Missing or insufficient permissions."}
            })))
            .mount(&server)
            .await;

        let err = store(&server, Some("tok"))
            .put(&UserId::new("uid-1"), &Profile::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProfileError::Rejected("Missing or insufficient permissions.".to_string())
        );
    }

    #[tokio::test]
    async fn test_requires_signed_in_user() {
        let server = MockServer::start().await;
        let err = store(&server, None)
            .get(&UserId::new("uid-1"))
            .await
            .unwrap_err();
        assert_eq!(err, ProfileError::Unauthenticated);
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed_and_request_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DOC_PATH))
            .and(header("Authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"code": 401, "message": "Request had invalid authentication credentials."}
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(DOC_PATH))
            .and(header("Authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "fields": {"nombre": {"stringValue": "Ana"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = FirestoreStore::new(
            FirestoreConfig {
                base_url: server.uri(),
                project_id: "demo".to_string(),
                collection: "usuarios".to_string(),
            },
            Arc::new(ExpiringToken {
                refreshed: AtomicBool::new(false),
            }),
        )
        .unwrap();

        let profile = store.get(&UserId::new("uid-1")).await.unwrap().unwrap();
        assert_eq!(profile.name, "Ana");
    }

    #[tokio::test]
    async fn test_unauthorized_without_refresh_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path(DOC_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"code": 401, "message": "Request had invalid authentication credentials."}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = store(&server, Some("tok"))
            .put(&UserId::new("uid-1"), &Profile::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::Rejected(_)));
    }
}

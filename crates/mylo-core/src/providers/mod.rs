//! Concrete auth and profile store implementations.

pub mod firebase;
pub mod firestore;
pub mod memory;

/// Extracts the provider message from a Google API error body.
///
/// Bodies look like `{"error": {"code": 400, "message": "EMAIL_EXISTS"}}`.
/// Falls back to the HTTP status when the body has no message.
pub(crate) fn google_error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"))
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn test_google_error_message_reads_nested_message() {
        let body = r#"{"error":{"code":400,"message":"EMAIL_EXISTS","errors":[]}}"#;
        assert_eq!(
            google_error_message(StatusCode::BAD_REQUEST, body),
            "EMAIL_EXISTS"
        );
    }

    #[test]
    fn test_google_error_message_falls_back_to_status() {
        assert_eq!(
            google_error_message(StatusCode::BAD_GATEWAY, "<html>"),
            "HTTP 502 Bad Gateway"
        );
    }
}

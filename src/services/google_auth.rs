use std::env;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GMAIL_SEND_SCOPE: &str = "https://www.googleapis.com/auth/gmail.send";
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME: Duration = Duration::from_secs(3600);

#[derive(Debug, Error)]
pub enum GoogleAuthError {
    #[error("missing configuration: {0}")]
    MissingConfiguration(&'static str),
    #[error("invalid service account key: {0}")]
    InvalidKey(String),
    #[error("token exchange failed: {0}")]
    TokenExchangeFailed(String),
    #[error("token response missing access_token")]
    InvalidTokenJson,
}

/// Service-account identity used to mint short-lived Google access tokens.
#[derive(Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    private_key: String,
}

impl ServiceAccountKey {
    pub fn from_env() -> Result<Self, GoogleAuthError> {
        let client_email = required_env_var("GOOGLE_SERVICE_ACCOUNT_CLIENT_EMAIL")?;
        let private_key = required_env_var("GOOGLE_SERVICE_ACCOUNT_PRIVATE_KEY")?;
        Ok(Self::new(client_email, private_key))
    }

    pub fn new(client_email: String, private_key: String) -> Self {
        // Keys pasted into env files usually carry escaped newlines.
        Self {
            client_email,
            private_key: private_key.replace("\\n", "\n"),
        }
    }

    fn encoding_key(&self) -> Result<EncodingKey, GoogleAuthError> {
        EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| GoogleAuthError::InvalidKey(e.to_string()))
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .finish_non_exhaustive()
    }
}

fn required_env_var(key: &'static str) -> Result<String, GoogleAuthError> {
    env::var(key).map_err(|_| GoogleAuthError::MissingConfiguration(key))
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<&'a str>,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

/// Exchanges a signed assertion for an access token. `subject` is the mailbox
/// the service account impersonates; pass `None` when acting as itself.
/// Tokens are fetched per call and never cached here.
pub async fn fetch_access_token(
    http: &Client,
    key: &ServiceAccountKey,
    scope: &str,
    subject: Option<&str>,
    token_url: &str,
) -> Result<String, GoogleAuthError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let claims = AssertionClaims {
        iss: &key.client_email,
        sub: subject,
        scope,
        aud: token_url,
        iat: now,
        exp: now + ASSERTION_LIFETIME.as_secs(),
    };

    let assertion = encode(&Header::new(Algorithm::RS256), &claims, &key.encoding_key()?)
        .map_err(|e| GoogleAuthError::InvalidKey(e.to_string()))?;

    let res = http
        .post(token_url)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
        .send()
        .await
        .map_err(|e| GoogleAuthError::TokenExchangeFailed(e.to_string()))?;

    if !res.status().is_success() {
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        return Err(GoogleAuthError::TokenExchangeFailed(format!(
            "{} {}",
            status, text
        )));
    }

    let token_json: Value = res
        .json()
        .await
        .map_err(|_| GoogleAuthError::InvalidTokenJson)?;
    token_json["access_token"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or(GoogleAuthError::InvalidTokenJson)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::ServiceAccountKey;

    pub const TEST_PRIVATE_KEY_PEM: &str =
        include_str!("../../tests/fixtures/test_rsa_key.pem");

    pub fn test_key() -> ServiceAccountKey {
        ServiceAccountKey::new(
            "svc@test-project.iam.gserviceaccount.com".into(),
            TEST_PRIVATE_KEY_PEM.into(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::test_key;
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn normalizes_escaped_newlines_in_the_key() {
        let key = ServiceAccountKey::new("svc@x.com".into(), "line1\\nline2".into());
        assert_eq!(key.private_key, "line1\nline2");
    }

    #[test]
    fn debug_output_redacts_the_private_key() {
        let rendered = format!("{:?}", test_key());
        assert!(rendered.contains("svc@test-project.iam.gserviceaccount.com"));
        assert!(!rendered.contains("PRIVATE KEY"));
    }

    #[tokio::test]
    async fn exchanges_a_signed_assertion_for_a_token() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/token")
                    .body_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer");
                then.status(200)
                    .json_body(json!({"access_token": "test-token", "expires_in": 3600}));
            })
            .await;

        let token = fetch_access_token(
            &Client::new(),
            &test_key(),
            GMAIL_SEND_SCOPE,
            Some("intakes@example.com"),
            &server.url("/token"),
        )
        .await
        .unwrap();

        assert_eq!(token, "test-token");
        token_mock.assert_async().await;
    }

    #[tokio::test]
    async fn surfaces_provider_rejections() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(400).body(r#"{"error":"invalid_grant"}"#);
            })
            .await;

        let err = fetch_access_token(
            &Client::new(),
            &test_key(),
            SHEETS_SCOPE,
            None,
            &server.url("/token"),
        )
        .await
        .unwrap_err();

        match err {
            GoogleAuthError::TokenExchangeFailed(detail) => {
                assert!(detail.contains("400"));
                assert!(detail.contains("invalid_grant"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejects_token_responses_without_access_token() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200).json_body(json!({"expires_in": 3600}));
            })
            .await;

        let err = fetch_access_token(
            &Client::new(),
            &test_key(),
            SHEETS_SCOPE,
            None,
            &server.url("/token"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, GoogleAuthError::InvalidTokenJson));
    }
}

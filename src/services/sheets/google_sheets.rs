use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use time::format_description::well_known::Rfc3339;

use crate::models::submission::FormSubmission;
use crate::services::google_auth::{
    fetch_access_token, ServiceAccountKey, DEFAULT_TOKEN_URL, SHEETS_SCOPE,
};
use crate::services::sheets::{SheetsError, SheetsSink};

pub const DEFAULT_SHEETS_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Appends one row per submission through the Sheets `values:append`
/// endpoint, authenticating as the service account itself (the spreadsheet
/// is shared with it; no impersonation needed).
pub struct GoogleSheetsSink {
    http: Client,
    key: ServiceAccountKey,
    spreadsheet_id: String,
    worksheet: String,
    token_url: String,
    api_base: String,
}

impl GoogleSheetsSink {
    /// Returns `Ok(None)` when no spreadsheet is configured: the sink is
    /// optional and simply not attempted. A spreadsheet id without service
    /// account credentials is a configuration error.
    pub fn from_env(http: &Client) -> Result<Option<Self>, SheetsError> {
        let spreadsheet_id = match env::var("SHEETS_SPREADSHEET_ID") {
            Ok(id) if !id.trim().is_empty() => id,
            _ => return Ok(None),
        };
        let worksheet = env::var("SHEETS_WORKSHEET").unwrap_or_else(|_| "Sheet1".into());
        let key = ServiceAccountKey::from_env()?;

        Ok(Some(Self::new(
            http.clone(),
            key,
            spreadsheet_id,
            worksheet,
            DEFAULT_TOKEN_URL.into(),
            DEFAULT_SHEETS_BASE.into(),
        )))
    }

    pub fn new(
        http: Client,
        key: ServiceAccountKey,
        spreadsheet_id: String,
        worksheet: String,
        token_url: String,
        api_base: String,
    ) -> Self {
        Self {
            http,
            key,
            spreadsheet_id,
            worksheet,
            token_url,
            api_base,
        }
    }

    fn append_url(&self) -> String {
        let range = format!("{}!A1:E1", self.worksheet);
        format!(
            "{}/{}/values/{}:append",
            self.api_base,
            urlencoding::encode(&self.spreadsheet_id),
            urlencoding::encode(&range)
        )
    }
}

#[async_trait]
impl SheetsSink for GoogleSheetsSink {
    async fn append_submission(&self, submission: &FormSubmission) -> Result<(), SheetsError> {
        let token = fetch_access_token(
            &self.http,
            &self.key,
            SHEETS_SCOPE,
            None,
            &self.token_url,
        )
        .await?;

        let submitted_at = submission
            .submitted_at
            .format(&Rfc3339)
            .unwrap_or_default();
        let row = [
            submitted_at.as_str(),
            submission.name.as_str(),
            submission.email.as_str(),
            submission.phone.as_deref().unwrap_or(""),
            submission.message.as_str(),
        ];

        let res = self
            .http
            .post(self.append_url())
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(token)
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .map_err(|e| SheetsError::Transport(e.to_string()))?;

        if res.status().is_success() {
            Ok(())
        } else {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            Err(SheetsError::Transport(format!(
                "Sheets append failed: {} {}",
                status, text
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::google_auth::test_support::test_key;
    use httpmock::prelude::*;
    use time::macros::datetime;

    fn submission() -> FormSubmission {
        FormSubmission {
            name: "Jo".into(),
            email: "jo@x.com".into(),
            phone: Some("555-0100".into()),
            message: "Hi there".into(),
            submitted_at: datetime!(2025-03-01 12:00 UTC),
        }
    }

    fn sink(server: &MockServer) -> GoogleSheetsSink {
        GoogleSheetsSink::new(
            Client::new(),
            test_key(),
            "spreadsheet-1".into(),
            "Intake".into(),
            server.url("/token"),
            server.url("/sheets"),
        )
    }

    #[tokio::test]
    async fn appends_one_row_with_all_fields() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200)
                    .json_body(serde_json::json!({"access_token": "test-token"}));
            })
            .await;
        let append_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path_contains(":append")
                    .query_param("valueInputOption", "USER_ENTERED")
                    .header("authorization", "Bearer test-token")
                    .json_body_partial(
                        r#"{"values": [["2025-03-01T12:00:00Z", "Jo", "jo@x.com", "555-0100", "Hi there"]]}"#,
                    );
                then.status(200).json_body(serde_json::json!({
                    "updates": {"updatedRows": 1}
                }));
            })
            .await;

        sink(&server).append_submission(&submission()).await.unwrap();
        append_mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_phone_becomes_an_empty_cell() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200)
                    .json_body(serde_json::json!({"access_token": "test-token"}));
            })
            .await;
        let append_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path_contains(":append")
                    .json_body_partial(
                        r#"{"values": [["2025-03-01T12:00:00Z", "Jo", "jo@x.com", "", "Hi there"]]}"#,
                    );
                then.status(200).json_body(serde_json::json!({}));
            })
            .await;

        let mut s = submission();
        s.phone = None;
        sink(&server).append_submission(&s).await.unwrap();
        append_mock.assert_async().await;
    }

    #[tokio::test]
    async fn surfaces_append_rejections() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200)
                    .json_body(serde_json::json!({"access_token": "test-token"}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path_contains(":append");
                then.status(403)
                    .body(r#"{"error":{"message":"The caller does not have permission"}}"#);
            })
            .await;

        let err = sink(&server)
            .append_submission(&submission())
            .await
            .unwrap_err();

        match err {
            SheetsError::Transport(detail) => {
                assert!(detail.contains("403"));
                assert!(detail.contains("does not have permission"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

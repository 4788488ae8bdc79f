use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::services::fanout::{SinkOutcome, SubmissionReport};

#[derive(Serialize)]
pub struct JsonResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "emailId", skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<SinkOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheets: Option<SinkOutcome>,
}

impl JsonResponse {
    fn base(success: bool) -> Self {
        JsonResponse {
            success,
            message: None,
            error: None,
            email_id: None,
            email: None,
            sheets: None,
        }
    }

    pub fn success(msg: &str) -> impl IntoResponse {
        (
            StatusCode::OK,
            Json(JsonResponse {
                message: Some(msg.to_string()),
                ..Self::base(true)
            }),
        )
    }

    pub fn submitted(report: SubmissionReport) -> impl IntoResponse {
        (
            StatusCode::OK,
            Json(JsonResponse {
                message: Some(report.message),
                email_id: report.email_id,
                email: Some(report.email),
                sheets: report.sheets,
                ..Self::base(true)
            }),
        )
    }

    pub fn bad_request(error: &str) -> impl IntoResponse {
        (
            StatusCode::BAD_REQUEST,
            Json(JsonResponse {
                error: Some(error.to_string()),
                ..Self::base(false)
            }),
        )
    }

    pub fn server_error(error: &str, message: &str) -> impl IntoResponse {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(JsonResponse {
                error: Some(error.to_string()),
                message: Some(message.to_string()),
                ..Self::base(false)
            }),
        )
    }
}

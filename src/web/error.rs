use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

use crate::core::CampaignError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug)]
pub enum WebError {
    Campaign(CampaignError),
    Input(String),
}

impl From<CampaignError> for WebError {
    fn from(err: CampaignError) -> Self {
        WebError::Campaign(err)
    }
}

impl From<JsonRejection> for WebError {
    fn from(rejection: JsonRejection) -> Self {
        WebError::Input(rejection.body_text())
    }
}

impl WebError {
    fn parts(self) -> (StatusCode, String, &'static str) {
        match self {
            WebError::Input(msg) => (StatusCode::BAD_REQUEST, msg, "invalid_request"),
            WebError::Campaign(CampaignError::InvalidRequest(msg)) => {
                (StatusCode::BAD_REQUEST, msg, "invalid_request")
            }
            WebError::Campaign(CampaignError::StorageRead(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read leads from storage".to_string(),
                "storage_read",
            ),
            WebError::Campaign(CampaignError::StorageWrite(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to write leads to storage; nothing was committed".to_string(),
                "storage_write",
            ),
            WebError::Campaign(CampaignError::CommitIndeterminate { delivered, .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!(
                    "{} email(s) were sent but the new statuses could not be saved; \
                     outcome is indeterminate and retrying with the same leadIds is safe",
                    delivered
                ),
                "commit_indeterminate",
            ),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if let WebError::Campaign(err) = &self {
            if err.is_indeterminate() {
                warn!(error = %err, "campaign outcome indeterminate");
            } else if !matches!(err, CampaignError::InvalidRequest(_)) {
                error!(error = %err, "request failed");
            }
        }

        let (status, message, code) = self.parts();
        let body = Json(ErrorResponse {
            error: message,
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::WebError;
    use crate::core::CampaignError;
    use axum::http::StatusCode;

    #[test]
    fn storage_details_are_not_exposed() {
        let (status, message, code) =
            WebError::from(CampaignError::storage_read("/secret/path: permission denied")).parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "storage_read");
        assert!(!message.contains("/secret/path"));
    }

    #[test]
    fn indeterminate_commit_has_its_own_code() {
        let (status, message, code) = WebError::from(CampaignError::CommitIndeterminate {
            delivered: 2,
            reason: "disk full".to_string(),
        })
        .parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "commit_indeterminate");
        assert!(message.starts_with("2 email(s) were sent"));
    }

    #[test]
    fn invalid_request_is_a_client_error() {
        let (status, _, code) =
            WebError::from(CampaignError::invalid_request("leadIds must be an array")).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "invalid_request");
    }
}

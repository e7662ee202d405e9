//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use loreline_types::error::CampaignError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub struct AppError(pub CampaignError);

impl From<CampaignError> for AppError {
    fn from(e: CampaignError) -> Self {
        AppError(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match &self.0 {
            CampaignError::Auth(e) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", e.to_string()),
            CampaignError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "You do not have access to this campaign".to_string(),
            ),
            CampaignError::NotFound => (
                StatusCode::NOT_FOUND,
                "CAMPAIGN_NOT_FOUND",
                "Campaign not found".to_string(),
            ),
            CampaignError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            // Logged with campaign context where the call failed.
            CampaignError::Upstream(_) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "The generation backend failed to respond".to_string(),
            ),
            CampaignError::Storage(detail) => {
                tracing::error!(error = %detail, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Internal storage error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = json!({
            "data": null,
            "meta": {
                "timestamp": chrono::Utc::now().to_rfc3339(),
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loreline_types::error::AuthError;

    fn status_of(e: CampaignError) -> StatusCode {
        AppError(e).into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(AuthError::MissingHeader.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(CampaignError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_of(CampaignError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(CampaignError::Validation("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CampaignError::Upstream("x".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(CampaignError::Storage("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_detail_is_not_echoed() {
        let err = AppError(CampaignError::Storage("disk /var/db corrupt".into()));
        let (_, code, message) = err.parts();
        assert_eq!(code, "STORAGE_ERROR");
        assert!(!message.contains("/var/db"));
    }

    #[test]
    fn test_upstream_detail_is_not_echoed() {
        let err = AppError(CampaignError::Upstream("429 quota exceeded for key".into()));
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "UPSTREAM_ERROR");
        assert!(!message.contains("quota"));
    }
}

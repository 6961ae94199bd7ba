use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

/// Failures of the session authority.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("credentials rejected by the auth backend")]
    CredentialRejected,
    #[error("email vacancy probe returned unexpected status {0}")]
    ProbeAmbiguous(u16),
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),
    #[error("access token claims could not be decoded: {0}")]
    ClaimDecode(String),
    #[error("auth backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    BadRequest(String),
    BadGateway(String),
    InternalServerError(anyhow::Error),
    Validation(Vec<String>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code, details) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND", None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED", None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST", None),
            AppError::BadGateway(msg) => {
                tracing::warn!(error = %msg, "Upstream auth call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "Authentication service unavailable".to_string(),
                    "BAD_GATEWAY",
                    None,
                )
            }
            AppError::InternalServerError(err) => {
                tracing::error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "INTERNAL_SERVER_ERROR",
                    None,
                )
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                "VALIDATION_ERROR",
                Some(serde_json::json!({ "errors": errors })),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            code: code.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalServerError(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter()
                    .map(move |e| format!("{}: {}", field, e.code.as_ref()))
            })
            .collect();
        AppError::Validation(messages)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::CredentialRejected => {
                AppError::Unauthorized("Invalid email or password".to_string())
            }
            AuthError::ProbeAmbiguous(_) | AuthError::Transport(_) => {
                AppError::BadGateway(err.to_string())
            }
            AuthError::RefreshFailed(_) | AuthError::ClaimDecode(_) => {
                AppError::InternalServerError(err.into())
            }
        }
    }
}

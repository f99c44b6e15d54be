use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dinepay_core::errors::Error as CoreError;
use serde::Serialize;
use thiserror::Error;

#[allow(dead_code)]
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("Not Found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Structured rejection body. `reason` carries the engine's stable
/// snake_case code where one applies; conflicts carry `retry` so clients
/// know to re-fetch the snapshot and resubmit.
#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, reason, msg) = match &self {
            ApiError::Core(e) => match e {
                CoreError::Payment(p) => {
                    (StatusCode::BAD_REQUEST, Some(p.reason()), e.to_string())
                }
                CoreError::Credit(c) => {
                    (StatusCode::BAD_REQUEST, Some(c.reason()), e.to_string())
                }
                CoreError::TopUp(t) => (StatusCode::BAD_REQUEST, Some(t.reason()), e.to_string()),
                CoreError::Validation(_) => (StatusCode::BAD_REQUEST, None, e.to_string()),
                CoreError::NotFound(_) => (StatusCode::NOT_FOUND, None, e.to_string()),
                CoreError::Conflict(_) => (StatusCode::CONFLICT, Some("retry"), e.to_string()),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, None, e.to_string()),
            },
            ApiError::NotFound => (StatusCode::NOT_FOUND, None, self.to_string()),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, None, reason.clone()),
            ApiError::Internal(reason) => {
                (StatusCode::INTERNAL_SERVER_ERROR, None, reason.clone())
            }
            ApiError::Anyhow(_) => (StatusCode::INTERNAL_SERVER_ERROR, None, self.to_string()),
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            reason,
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use versionmgr_view::ViewError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i32 },

    /// A unique row vanished between the failed insert and the re-read.
    #[error("conflicting concurrent write on {0}")]
    Conflict(&'static str),

    #[error("versionmgr is in read-only mode")]
    ReadOnly,

    #[error(transparent)]
    View(#[from] ViewError),

    #[error("db error: {0}")]
    Db(#[from] DbErr),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MalformedRequest(_) => "malformed_request",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::ReadOnly => "read_only",
            ApiError::View(ViewError::TypeMismatch { .. }) => "type_mismatch",
            ApiError::View(_) => "internal",
            ApiError::Db(_) => "db_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ReadOnly => StatusCode::FORBIDDEN,
            ApiError::View(ViewError::TypeMismatch { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::View(_) | ApiError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures talking to the upstream data API.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Transport-level failure (connect, DNS, body read)
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("upstream returned status {0}")]
    Status(reqwest::StatusCode),

    /// Upstream answered 2xx but the payload was not the expected shape
    #[error("unexpected upstream payload: {0}")]
    Shape(String),
}

/// Failures in the out-of-process chart renderer.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no parsed data snapshot for dataset {0}")]
    MissingSnapshot(i32),

    #[error("chart has no dataset to render from")]
    NoDataset,

    #[error("renderer exited with {0}")]
    RendererFailed(String),

    #[error("renderer timed out after {0}s")]
    Timeout(u64),

    #[error("renderer produced unreadable output: {0}")]
    BadOutput(String),

    #[error("renderer io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request-level errors surfaced to dashboard clients.
///
/// Every aggregation endpoint funnels its failures through this type so the
/// user-visible failure shape is the same everywhere: a status code plus a
/// `{error, message}` body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("'{0}' parameter is required")]
    MissingParameter(&'static str),

    #[error("{0} '{1}' not found")]
    NotFound(&'static str, String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid stored payload: {0}")]
    BadStoredPayload(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_, _) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::Render(_) => StatusCode::BAD_GATEWAY,
            ApiError::Database(_) | ApiError::Io(_) | ApiError::BadStoredPayload(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::MissingParameter(_) => "missing_parameter",
            ApiError::NotFound(_, _) => "not_found",
            ApiError::Upstream(_) => "upstream_unavailable",
            ApiError::Render(_) => "render_failed",
            ApiError::Database(_) | ApiError::Io(_) | ApiError::BadStoredPayload(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        let body = Json(json!({
            "error": self.code(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_maps_to_bad_request() {
        let err = ApiError::MissingParameter("geographies");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "missing_parameter");
        assert_eq!(err.to_string(), "'geographies' parameter is required");
    }

    #[test]
    fn upstream_errors_map_to_bad_gateway() {
        let err = ApiError::Upstream(UpstreamError::Shape("missing value array".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.code(), "upstream_unavailable");
    }
}

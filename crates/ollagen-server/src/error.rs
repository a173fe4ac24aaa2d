//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ollagen_core::GenError;
use serde_json::json;
use tracing::{error, warn};

/// Error returned by every API handler
#[derive(Debug)]
pub enum ApiError {
    /// Pipeline or storage failure
    Gen(GenError),
    /// Request body or query could not be parsed
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Gen(e) => status_for(e),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Gen(e) => e.kind(),
            ApiError::BadRequest(_) => "bad_request",
        }
    }
}

fn status_for(err: &GenError) -> StatusCode {
    match err {
        GenError::MissingField(_)
        | GenError::PathTraversal(_)
        | GenError::ContextFileUnreadable { .. }
        | GenError::UploadRejected(_) => StatusCode::BAD_REQUEST,
        GenError::NotFound(_) => StatusCode::NOT_FOUND,
        GenError::BackendUnreachable { .. }
        | GenError::BackendError { .. }
        | GenError::EmptyResponse => StatusCode::BAD_GATEWAY,
        GenError::WriteFailed { .. }
        | GenError::CorruptRecord { .. }
        | GenError::Io(_)
        | GenError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<GenError> for ApiError {
    fn from(e: GenError) -> Self {
        ApiError::Gen(e)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Gen(e) => write!(f, "{}", e),
            ApiError::BadRequest(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed ({}): {}", status, self);
        } else {
            warn!("Request rejected ({}): {}", status, self);
        }

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
            "kind": self.kind(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (GenError::MissingField("prompt"), StatusCode::BAD_REQUEST),
            (GenError::PathTraversal("..".into()), StatusCode::BAD_REQUEST),
            (GenError::UploadRejected("big".into()), StatusCode::BAD_REQUEST),
            (GenError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (GenError::EmptyResponse, StatusCode::BAD_GATEWAY),
            (
                GenError::BackendError {
                    status: 404,
                    body: "model not found".into(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                GenError::CorruptRecord {
                    id: "a".into(),
                    reason: "eof".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
        assert_eq!(
            ApiError::BadRequest("eof".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use docsearch_common::DocSearchError;
use serde_json::json;
use std::fmt;
use tracing::error;

/// HTTP wrapper around [`DocSearchError`]
///
/// Renders `{"error": message}` with the status from
/// [`DocSearchError::status_code`].
#[derive(Debug)]
pub struct ApiError(pub DocSearchError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<DocSearchError> for ApiError {
    fn from(err: DocSearchError) -> Self {
        Self(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        HttpResponse::build(status).json(json!({ "error": self.0.to_string() }))
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::from(DocSearchError::invalid_input("empty query"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(DocSearchError::provider("timeout"));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);

        let err = ApiError::from(DocSearchError::out_of_range(3, 1));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

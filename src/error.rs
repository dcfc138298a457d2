use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("DatabaseError")]
    Database(#[from] libsql::Error),
    #[error("MissingRow: {0}")]
    MissingRow(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("StoreError: {}", crate::unpack_error(.0))]
    Store(#[from] StoreError),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let body = match self {
            ApiError::Store(_) => ErrorResponse {
                error: "storage failure".to_owned(),
            },
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_maps_to_500() {
        let err = ApiError::from(StoreError::MissingRow("books"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_api_error_display_includes_source() {
        let err = ApiError::from(StoreError::MissingRow("books"));
        assert_eq!(err.to_string(), "StoreError: MissingRow: books");
    }
}

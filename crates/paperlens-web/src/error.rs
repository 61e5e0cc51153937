use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use paperlens_core::AnalysisError;

/// Every failure a handler can return, rendered as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    /// The request body was missing or not the JSON we expect.
    #[error("{}", .0.body_text())]
    BadBody(#[from] JsonRejection),
    #[error("No API key found")]
    NoApiKey,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Analysis(err) => match err {
                AnalysisError::MissingField(_)
                | AnalysisError::InvalidArgument(_)
                | AnalysisError::Download(_) => StatusCode::BAD_REQUEST,
                AnalysisError::EmptyText => StatusCode::UNPROCESSABLE_ENTITY,
                AnalysisError::Extraction(_)
                | AnalysisError::Model(_)
                | AnalysisError::ResponseParse(_)
                | AnalysisError::SchemaMismatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadBody(_) => StatusCode::BAD_REQUEST,
            ApiError::NoApiKey => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %message, "request rejected");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

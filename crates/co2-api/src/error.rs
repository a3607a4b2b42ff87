use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use co2_dashboard::DashboardError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    /// Startup could not reach the database; nothing else is served.
    Halted(String),
    Internal(String),
}

impl From<DashboardError> for ApiError {
    fn from(e: DashboardError) -> Self {
        match e {
            DashboardError::UnknownQuery(_) | DashboardError::UnknownCollection(_) => {
                ApiError::NotFound(e.to_string())
            }
            DashboardError::InvalidTransition { .. } => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("fetch task failed: {e}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Halted(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("database connection failed: {msg}"),
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

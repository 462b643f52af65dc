use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// Store connect call failed or returned no usable handle.
    Connection(String),
    /// An operation was invoked with no active connection.
    NotConnected,
    /// A supplied identifier cannot be parsed into the store's id format.
    MalformedId(String),
    /// A required query/body parameter was absent or empty.
    MissingParameter(&'static str),
    NotFound(String),
    Database(mongodb::error::Error),
    Deserialization(mongodb::bson::de::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Connection(msg) => write!(f, "Connection error: {}", msg),
            AppError::NotConnected => write!(f, "Not connected to the document store"),
            AppError::MalformedId(raw) => write!(f, "Malformed identifier: {}", raw),
            AppError::MissingParameter(name) => write!(f, "Missing required parameter: {}", name),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Database(err) => write!(f, "Database error: {}", err),
            AppError::Deserialization(err) => write!(f, "Deserialization error: {}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Connection(msg) => {
                tracing::error!("Store connection error: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "Document store unavailable".to_string())
            }
            AppError::NotConnected => {
                tracing::error!("Operation attempted with no active store connection");
                (StatusCode::SERVICE_UNAVAILABLE, "Document store unavailable".to_string())
            }
            AppError::MalformedId(raw) => {
                (StatusCode::BAD_REQUEST, format!("Malformed identifier: {}", raw))
            }
            AppError::MissingParameter(name) => {
                (StatusCode::BAD_REQUEST, format!("Missing required parameter: {}", name))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Deserialization(err) => {
                tracing::error!("Stored document did not match expected shape: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<mongodb::bson::de::Error> for AppError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        AppError::Deserialization(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn missing_parameter_maps_to_bad_request() {
        let response = AppError::MissingParameter("title").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn malformed_id_maps_to_bad_request() {
        let response = AppError::MalformedId("not-an-id".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = AppError::NotFound("movie abc not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn not_connected_maps_to_service_unavailable() {
        let response = AppError::NotConnected.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn connection_maps_to_service_unavailable() {
        let response = AppError::Connection("refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

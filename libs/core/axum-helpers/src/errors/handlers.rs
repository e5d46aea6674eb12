use axum::response::{IntoResponse, Response};

use super::AppError;

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    AppError::NotFound("The requested resource was not found".to_string()).into_response()
}

/// Fallback for a known path hit with an unsupported method.
pub async fn method_not_allowed() -> Response {
    AppError::MethodNotAllowed("The HTTP method is not allowed for this resource".to_string())
        .into_response()
}

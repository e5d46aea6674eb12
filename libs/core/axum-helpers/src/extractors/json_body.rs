//! Lenient JSON body extractor.
//!
//! Differs from `axum::Json` in two ways:
//! - an empty (or whitespace-only) body yields `T::default()`, so clients that
//!   send nothing are treated as having sent `{}`;
//! - the `Content-Type` header is not inspected.
//!
//! Handlers that want to route the rejection through their own error type
//! take `Result<JsonBody<T>, JsonBodyRejection>` and use `?`.

use crate::errors::AppError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request, rejection::BytesRejection},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Deserialized request body.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::{JsonBody, JsonBodyRejection};
///
/// #[derive(serde::Deserialize, Default)]
/// struct Credentials {
///     password: Option<String>,
/// }
///
/// async fn delete(body: Result<JsonBody<Credentials>, JsonBodyRejection>) -> Result<(), MyError> {
///     let JsonBody(credentials) = body?;
///     // ...
/// #   Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonBody<T>(pub T);

#[derive(Debug, Error)]
pub enum JsonBodyRejection {
    #[error("Failed to read request body: {0}")]
    Body(#[from] BytesRejection),

    #[error("Failed to parse request body: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        tracing::info!(error = %self, "Rejected request body");
        AppError::BadRequest(self.to_string()).into_response()
    }
}

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(T::default()));
        }

        Ok(JsonBody(serde_json::from_slice(&bytes)?))
    }
}

use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, JsonBodyRejection};
use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// User-facing messages. Clients match on these strings, so they are fixed.
pub mod messages {
    pub const BLANK_NAME: &str = "상품 이름을 입력해 주세요.";
    pub const BLANK_MANAGER: &str = "담당자를 입력해 주세요.";
    pub const BLANK_PASSWORD: &str = "비밀번호를 입력해 주세요.";
    pub const ALREADY_REGISTERED: &str = "이미 등록 된 상품입니다.";
    pub const INVALID_STATUS: &str = "상품 상태는 [FOR_SALE, SOLD_OUT] 중 하나여야 합니다.";
    pub const PASSWORD_MISMATCH: &str = "비밀번호가 일치하지 않습니다.";
    pub const NOT_FOUND: &str = "상품이 존재하지 않습니다.";
    pub const UNEXPECTED: &str = "예상치 못한 에러가 발생했습니다. 관리자에게 문의해 주세요.";
}

/// Required request field that was missing or empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum BlankField {
    Name,
    Description,
    Manager,
    Password,
}

/// Coarse failure category, the first axis of classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    ValidationError,
    UnauthorizedError,
    NotFound,
    Unclassified,
}

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Required field is blank: {0}")]
    Blank(BlankField),

    #[error("Product with name '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("Invalid product status: '{0}'")]
    InvalidStatus(String),

    #[error("Password does not match")]
    PasswordMismatch,

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProductError::Blank(_)
            | ProductError::AlreadyRegistered(_)
            | ProductError::InvalidStatus(_) => ErrorKind::ValidationError,
            ProductError::PasswordMismatch => ErrorKind::UnauthorizedError,
            ProductError::NotFound(_) => ErrorKind::NotFound,
            ProductError::Database(_)
            | ProductError::MalformedBody(_)
            | ProductError::Internal(_) => ErrorKind::Unclassified,
        }
    }

    /// Finer-grained reason within [`kind`](Self::kind), if any.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            ProductError::Blank(_) => Some("Blank"),
            ProductError::AlreadyRegistered(_) => Some("Already Registered"),
            ProductError::InvalidStatus(_) => Some("Invalid Product Status"),
            ProductError::PasswordMismatch => Some("Password Mismatch"),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<BlankField> {
        match self {
            ProductError::Blank(field) => Some(*field),
            _ => None,
        }
    }
}

/// The classifier: maps each condition to its HTTP status and fixed message.
///
/// Anything without a dedicated row, including store failures, becomes a 500
/// with a generic message so internals never reach the client.
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Blank(BlankField::Name | BlankField::Description) => {
                AppError::BadRequest(messages::BLANK_NAME.to_string())
            }
            ProductError::Blank(BlankField::Manager) => {
                AppError::BadRequest(messages::BLANK_MANAGER.to_string())
            }
            ProductError::Blank(BlankField::Password) => {
                AppError::BadRequest(messages::BLANK_PASSWORD.to_string())
            }
            ProductError::AlreadyRegistered(_) => {
                AppError::BadRequest(messages::ALREADY_REGISTERED.to_string())
            }
            ProductError::InvalidStatus(_) => {
                AppError::BadRequest(messages::INVALID_STATUS.to_string())
            }
            ProductError::PasswordMismatch => {
                AppError::Unauthorized(messages::PASSWORD_MISMATCH.to_string())
            }
            ProductError::NotFound(_) => AppError::NotFound(messages::NOT_FOUND.to_string()),
            ProductError::Database(_)
            | ProductError::MalformedBody(_)
            | ProductError::Internal(_) => {
                AppError::InternalServerError(messages::UNEXPECTED.to_string())
            }
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let reason = self.reason().unwrap_or("-");
        let detail: &'static str = self.detail().map(Into::into).unwrap_or("-");

        if kind == ErrorKind::Unclassified {
            tracing::error!(%kind, error = %self, "Request failed");
        } else {
            tracing::warn!(%kind, reason, detail, error = %self, "Request rejected");
        }

        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<JsonBodyRejection> for ProductError {
    fn from(err: JsonBodyRejection) -> Self {
        ProductError::MalformedBody(err.to_string())
    }
}

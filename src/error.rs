// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// One rejected input field, as reported in the `details` array of an
/// error body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub value: Value,
    pub messages: Vec<String>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, value: impl Into<Value>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            messages: vec![message.into()],
        }
    }
}

/// Every failure a guard, handler or service can raise.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No principal on a route that requires one.
    #[error("{0}")]
    Unauthenticated(String),

    /// Principal present but not allowed to touch the resource.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    /// The path exists but not for this HTTP method.
    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<FieldError>,
    },

    #[error("{0}")]
    Unclassified(String),
}

/// Coarse classification used by the exception filter chain. Each kind is
/// claimed by exactly one filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Auth,
    Validation,
    Http,
    Unclassified,
}

/// Wire value of the `errorType` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorType {
    #[serde(rename = "AUTH_ERROR")]
    AuthError,
    #[serde(rename = "VALIDATION_ERROR")]
    ValidationError,
    #[serde(rename = "HTTP_ERROR")]
    HttpError,
    #[serde(rename = "SERVICE_ERROR")]
    ServiceError,
}

impl ErrorKind {
    pub fn error_type(self) -> ErrorType {
        match self {
            ErrorKind::Auth => ErrorType::AuthError,
            ErrorKind::Validation => ErrorType::ValidationError,
            ErrorKind::Http => ErrorType::HttpError,
            ErrorKind::Unclassified => ErrorType::ServiceError,
        }
    }
}

impl ErrorType {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorType::AuthError => "AUTH_ERROR",
            ErrorType::ValidationError => "VALIDATION_ERROR",
            ErrorType::HttpError => "HTTP_ERROR",
            ErrorType::ServiceError => "SERVICE_ERROR",
        }
    }
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unauthenticated(_) | ApiError::Forbidden(_) => ErrorKind::Auth,
            ApiError::Validation { .. } => ErrorKind::Validation,
            ApiError::NotFound(_)
            | ApiError::BadRequest(_)
            | ApiError::Conflict(_)
            | ApiError::MethodNotAllowed(_) => ErrorKind::Http,
            ApiError::Unclassified(_) => ErrorKind::Unclassified,
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unclassified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthenticated(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::Unclassified(msg) => msg,
            ApiError::Validation { message, .. } => message,
        }
    }

    pub fn details(&self) -> &[FieldError] {
        match self {
            ApiError::Validation { details, .. } => details,
            _ => &[],
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        ApiError::MethodNotAllowed(message.into())
    }

    pub fn validation(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn unclassified(message: impl Into<String>) -> Self {
        ApiError::Unclassified(message.into())
    }
}

impl From<crate::database::StoreError> for ApiError {
    fn from(err: crate::database::StoreError) -> Self {
        if let crate::database::StoreError::Duplicate { field, .. } = &err {
            tracing::warn!("Store rejected duplicate: {}", err);
            return ApiError::conflict(format!("A document with this {} already exists", field));
        }
        // Log the real error but return generic message
        tracing::error!("Store error: {}", err);
        ApiError::unclassified("An error occurred while processing your request")
    }
}

impl From<crate::auth::TokenError> for ApiError {
    fn from(err: crate::auth::TokenError) -> Self {
        tracing::error!("Token error: {}", err);
        match err {
            crate::auth::TokenError::Hashing(_) => ApiError::unclassified("Failed to process credentials"),
            _ => ApiError::unclassified("Failed to issue access token"),
        }
    }
}

// Handlers and guards never render errors themselves. The error rides in the
// response extensions until the exception filter layer picks it up.
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let mut response = self.status_code().into_response();
        response.extensions_mut().insert(self);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_share_a_kind() {
        assert_eq!(ApiError::unauthenticated("x").kind(), ErrorKind::Auth);
        assert_eq!(ApiError::forbidden("x").kind(), ErrorKind::Auth);
        assert_eq!(ApiError::not_found("x").kind(), ErrorKind::Http);
        assert_eq!(ApiError::conflict("x").kind(), ErrorKind::Http);
        assert_eq!(ApiError::method_not_allowed("x").kind(), ErrorKind::Http);
    }

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(ApiError::unauthenticated("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::method_not_allowed("x").status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(ApiError::validation("x", vec![]).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unclassified("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn into_response_carries_the_error() {
        let response = ApiError::forbidden("nope").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let carried = response.extensions().get::<ApiError>().unwrap();
        assert_eq!(carried.message(), "nope");
    }

    #[test]
    fn duplicate_store_write_is_a_conflict() {
        let err: ApiError = crate::database::StoreError::Duplicate {
            collection: "users",
            field: "email".into(),
        }
        .into();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(err.message(), "A document with this email already exists");
    }

    #[test]
    fn error_type_serializes_to_wire_name() {
        let v = serde_json::to_value(ErrorKind::Validation.error_type()).unwrap();
        assert_eq!(v, Value::String("VALIDATION_ERROR".into()));
    }
}

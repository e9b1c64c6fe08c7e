use std::marker::PhantomData;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::Value;

use super::guard::{Guard, RequestContext};
use crate::api::dto::{check, Validate};
use crate::error::{ApiError, FieldError};

/// The body must parse as `T` and pass `T::validate`.
pub struct ValidateDto<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> ValidateDto<T> {
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<T> Default for ValidateDto<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn malformed(value: Value, message: impl Into<String>) -> ApiError {
    ApiError::validation("Request body is malformed", vec![FieldError::new("body", value, message)])
}

/// Parse and validate a body. Shared with the `Dto` extractor.
///
/// The body is checked field by field as raw JSON first, so a request with
/// several bad fields gets one detail for each of them.
pub fn parse_dto<T: Validate>(body: &[u8]) -> Result<T, ApiError> {
    let raw: Value = serde_json::from_slice(body).map_err(|e| malformed(Value::Null, e.to_string()))?;
    let raw = match raw {
        Value::Object(raw) => raw,
        other => return Err(malformed(other, "body must be a JSON object")),
    };

    let errors = check::<T>(&raw);
    if !errors.is_empty() {
        return Err(ApiError::validation("Validation failed", errors));
    }
    serde_json::from_value(Value::Object(raw)).map_err(|e| malformed(Value::Null, e.to_string()))
}

/// Body extractor for handlers. The route's `ValidateDto` guard has already
/// accepted the same bytes, so this only fails when the guard is missing.
pub struct Dto<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Dto<T>
where
    S: Send + Sync,
    T: Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(request, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Unreadable request body: {}", e)))?;
        parse_dto(&body).map(Dto)
    }
}

#[async_trait]
impl<T> Guard for ValidateDto<T>
where
    T: Validate + 'static,
{
    fn name(&self) -> &'static str {
        "ValidateDto"
    }

    async fn check(&self, ctx: &RequestContext) -> Result<(), ApiError> {
        parse_dto::<T>(&ctx.body).map(|_| ())
    }
}

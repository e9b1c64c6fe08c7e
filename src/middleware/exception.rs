use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::error::{ApiError, ErrorKind, ErrorType, FieldError};

/// The JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error_type: ErrorType,
    pub message: String,
    pub details: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// One typed handler in the chain. A filter either claims the error and
/// produces the response, or declines with `None`.
pub trait ExceptionFilter: Send + Sync {
    fn name(&self) -> &'static str;

    fn catch(&self, error: &ApiError, path: &str) -> Option<ErrorResponse>;
}

fn claimed(error: &ApiError, path: &str, filter: &'static str) -> ErrorResponse {
    let error_type = error.kind().error_type();
    tracing::error!(
        path = %path,
        error_type = error_type.as_str(),
        filter,
        "{}",
        error.message()
    );
    ErrorResponse {
        status: error.status_code(),
        body: ErrorBody {
            error_type,
            message: error.message().to_string(),
            details: error.details().to_vec(),
        },
    }
}

/// Claims `Unauthenticated` and `Forbidden`.
pub struct AuthorizationExceptionFilter;

impl ExceptionFilter for AuthorizationExceptionFilter {
    fn name(&self) -> &'static str {
        "AuthorizationExceptionFilter"
    }

    fn catch(&self, error: &ApiError, path: &str) -> Option<ErrorResponse> {
        (error.kind() == ErrorKind::Auth).then(|| claimed(error, path, self.name()))
    }
}

/// Claims validation failures and logs each rejected field.
pub struct ValidationExceptionFilter;

impl ExceptionFilter for ValidationExceptionFilter {
    fn name(&self) -> &'static str {
        "ValidationExceptionFilter"
    }

    fn catch(&self, error: &ApiError, path: &str) -> Option<ErrorResponse> {
        if error.kind() != ErrorKind::Validation {
            return None;
        }
        for detail in error.details() {
            tracing::error!(path = %path, field = %detail.field, "{}", detail.messages.join("; "));
        }
        Some(claimed(error, path, self.name()))
    }
}

/// Claims errors that carry their own HTTP status (not found, bad request,
/// conflict).
pub struct HttpErrorExceptionFilter;

impl ExceptionFilter for HttpErrorExceptionFilter {
    fn name(&self) -> &'static str {
        "HttpErrorExceptionFilter"
    }

    fn catch(&self, error: &ApiError, path: &str) -> Option<ErrorResponse> {
        (error.kind() == ErrorKind::Http).then(|| claimed(error, path, self.name()))
    }
}

/// Terminal filter. Claims anything that reaches it with a fixed 500.
pub struct DefaultExceptionFilter;

impl DefaultExceptionFilter {
    fn respond(&self, error: &ApiError, path: &str) -> ErrorResponse {
        tracing::error!(
            path = %path,
            error_type = ErrorType::ServiceError.as_str(),
            filter = "DefaultExceptionFilter",
            "{}",
            error
        );
        ErrorResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                error_type: ErrorType::ServiceError,
                message: error.message().to_string(),
                details: Vec::new(),
            },
        }
    }
}

/// Ordered filters followed by the terminal default. Exactly one of them
/// produces the response for any error.
pub struct ExceptionFilterChain {
    filters: Vec<Box<dyn ExceptionFilter>>,
    terminal: DefaultExceptionFilter,
}

impl ExceptionFilterChain {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            terminal: DefaultExceptionFilter,
        }
    }

    /// Append a filter. It is offered errors after every filter added
    /// before it and always before the terminal default.
    pub fn with_filter(mut self, filter: impl ExceptionFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Auth, then validation, then HTTP-coded errors.
    pub fn standard() -> Self {
        Self::new()
            .with_filter(AuthorizationExceptionFilter)
            .with_filter(ValidationExceptionFilter)
            .with_filter(HttpErrorExceptionFilter)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub fn handle(&self, error: &ApiError, path: &str) -> ErrorResponse {
        self.filters
            .iter()
            .find_map(|filter| filter.catch(error, path))
            .unwrap_or_else(|| self.terminal.respond(error, path))
    }
}

impl Default for ExceptionFilterChain {
    fn default() -> Self {
        Self::standard()
    }
}

/// Outermost application layer. Any response that carries an `ApiError`
/// is replaced by the chain's rendering of it; other responses pass through.
pub async fn exception_filter_middleware(
    State(chain): State<Arc<ExceptionFilterChain>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<ApiError>() {
        Some(error) => chain.handle(&error, &path).into_response(),
        None => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn samples() -> Vec<ApiError> {
        vec![
            ApiError::unauthenticated("no token"),
            ApiError::forbidden("not yours"),
            ApiError::validation(
                "Validation failed",
                vec![FieldError::new("rating", 9, "rating must be between 1 and 5")],
            ),
            ApiError::not_found("Offer with 1 not found."),
            ApiError::bad_request("x is invalid id"),
            ApiError::conflict("taken"),
            ApiError::method_not_allowed("Method PUT is not allowed on /offers/1"),
            ApiError::unclassified("boom"),
        ]
    }

    fn expected(error: &ApiError) -> ErrorType {
        error.kind().error_type()
    }

    #[test]
    fn standard_chain_classifies_every_kind() {
        let chain = ExceptionFilterChain::standard();
        for error in samples() {
            let response = chain.handle(&error, "/offers");
            assert_eq!(response.body.error_type, expected(&error));
            assert_eq!(response.status, error.status_code());
            assert_eq!(response.body.message, error.message());
        }
    }

    #[test]
    fn classification_does_not_depend_on_order() {
        let orders: Vec<ExceptionFilterChain> = vec![
            ExceptionFilterChain::new()
                .with_filter(HttpErrorExceptionFilter)
                .with_filter(ValidationExceptionFilter)
                .with_filter(AuthorizationExceptionFilter),
            ExceptionFilterChain::new()
                .with_filter(ValidationExceptionFilter)
                .with_filter(AuthorizationExceptionFilter)
                .with_filter(HttpErrorExceptionFilter),
            ExceptionFilterChain::new()
                .with_filter(AuthorizationExceptionFilter)
                .with_filter(HttpErrorExceptionFilter)
                .with_filter(ValidationExceptionFilter),
        ];

        for chain in &orders {
            for error in samples() {
                assert_eq!(chain.handle(&error, "/").body.error_type, expected(&error));
            }
        }
    }

    #[test]
    fn validation_details_are_forwarded() {
        let error = samples().swap_remove(2);
        let response = ExceptionFilterChain::standard().handle(&error, "/offers");
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body.details.len(), 1);
        assert_eq!(response.body.details[0].field, "rating");
    }

    #[test]
    fn empty_chain_falls_through_to_default() {
        let response = ExceptionFilterChain::new().handle(&ApiError::forbidden("nope"), "/");
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body.error_type, ErrorType::ServiceError);
    }

    struct Spy {
        claims: bool,
        offered: Arc<AtomicUsize>,
    }

    impl ExceptionFilter for Spy {
        fn name(&self) -> &'static str {
            "Spy"
        }

        fn catch(&self, error: &ApiError, path: &str) -> Option<ErrorResponse> {
            self.offered.fetch_add(1, Ordering::SeqCst);
            self.claims.then(|| claimed(error, path, "Spy"))
        }
    }

    #[test]
    fn chain_stops_after_first_claim() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let chain = ExceptionFilterChain::new()
            .with_filter(Spy { claims: false, offered: first.clone() })
            .with_filter(Spy { claims: true, offered: second.clone() })
            .with_filter(Spy { claims: true, offered: second.clone() });

        chain.handle(&ApiError::conflict("dup"), "/auth/register");
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn body_uses_camel_case() {
        let response = ExceptionFilterChain::standard().handle(&ApiError::not_found("gone"), "/");
        let json = serde_json::to_value(&response.body).unwrap();
        assert_eq!(json["errorType"], "HTTP_ERROR");
        assert_eq!(json["message"], "gone");
        assert!(json["details"].as_array().unwrap().is_empty());
    }
}

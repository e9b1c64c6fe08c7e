use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{Principal, TokenService};
use crate::error::ApiError;

/// Authenticator. Populates the request's `Principal` from a valid bearer
/// credential and otherwise leaves the request anonymous. It never rejects a
/// request; routes that need a principal say so with `PrivateRoute`.
pub async fn authenticate(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Response {
    // Only this layer may set the principal.
    request.extensions_mut().remove::<Principal>();

    if let Some(principal) = principal_from_headers(&tokens, request.headers()) {
        tracing::debug!("Authenticated {} ({})", principal.email, principal.id);
        request.extensions_mut().insert(principal);
    }

    next.run(request).await
}

/// Resolve the principal for a set of headers. Missing, malformed, forged
/// and expired credentials all resolve to `None`.
pub fn principal_from_headers(tokens: &TokenService, headers: &HeaderMap) -> Option<Principal> {
    let token = match extract_bearer(headers) {
        Ok(Some(token)) => token,
        Ok(None) => return None,
        Err(msg) => {
            tracing::warn!("Ignoring credential: {}", msg);
            return None;
        }
    };

    match tokens.verify(token) {
        Ok(principal) => Some(principal),
        Err(e) => {
            tracing::warn!("Ignoring credential: {}", e);
            None
        }
    }
}

/// Handlers take `Principal` for routes behind `PrivateRoute` and
/// `Option<Principal>` where anonymous access is allowed.
#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| ApiError::unauthenticated("This section allowed only for authorized users"))
    }
}

/// Extract JWT token from Authorization header
fn extract_bearer(headers: &HeaderMap) -> Result<Option<&str>, &'static str> {
    let Some(auth_header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if token.trim().is_empty() => Err("Empty JWT token"),
        Some(token) => Ok(Some(token.trim())),
        None => Err("Authorization header must use Bearer token format"),
    }
}

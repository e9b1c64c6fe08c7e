use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, middleware::from_fn_with_state, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{self, system};
use crate::middleware::{authenticate, exception_filter_middleware, ExceptionFilterChain};
use crate::routing;
use crate::state::AppState;

/// Build the application router.
///
/// Layers, outermost first: CORS, tracing, exception filter chain,
/// authenticator, then each route's own guard chain. Guards and body
/// extractors share the configured request size limit.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.server.max_request_size_bytes;
    let routes = handlers::routes(&state);
    let filters = Arc::new(ExceptionFilterChain::standard());

    routing::register(Router::new(), routes, body_limit)
        .fallback(system::fallback)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(from_fn_with_state(state.tokens.clone(), authenticate))
        .layer(from_fn_with_state(filters, exception_filter_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors(&state.config.security))
        .with_state(state)
}

fn cors(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

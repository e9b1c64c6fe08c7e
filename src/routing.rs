//! Route descriptors: a path, a method handler and the ordered guards that
//! run before it.

use std::sync::Arc;

use axum::{
    handler::Handler,
    http::{Method, Uri},
    middleware::from_fn_with_state,
    routing::{self, MethodRouter},
    Router,
};
use tracing::info;

use crate::error::ApiError;
use crate::middleware::{guard_middleware, Guard, GuardChain};
use crate::state::AppState;

pub struct Route {
    pub method: Method,
    pub path: &'static str,
    handler: MethodRouter<AppState>,
    guards: Vec<Arc<dyn Guard>>,
}

macro_rules! method_constructor {
    ($name:ident, $method:ident) => {
        pub fn $name<H, T>(path: &'static str, handler: H) -> Self
        where
            H: Handler<T, AppState>,
            T: 'static,
        {
            Self::new(Method::$method, path, routing::$name(handler))
        }
    };
}

impl Route {
    fn new(method: Method, path: &'static str, handler: MethodRouter<AppState>) -> Self {
        Self {
            method,
            path,
            handler,
            guards: Vec::new(),
        }
    }

    method_constructor!(get, GET);
    method_constructor!(post, POST);
    method_constructor!(put, PUT);
    method_constructor!(patch, PATCH);
    method_constructor!(delete, DELETE);

    /// Append a guard. Guards run in the order they are added.
    pub fn guard(mut self, guard: impl Guard + 'static) -> Self {
        self.guards.push(Arc::new(guard));
        self
    }

    pub fn guard_names(&self) -> Vec<&'static str> {
        self.guards.iter().map(|g| g.name()).collect()
    }
}

/// Add every route to the router, wrapping each handler in its guard chain.
/// Routes sharing a path are merged by method; any other method on that path
/// is answered with `ApiError::MethodNotAllowed`.
pub fn register(mut router: Router<AppState>, routes: Vec<Route>, body_limit: usize) -> Router<AppState> {
    let mut paths: Vec<(&'static str, MethodRouter<AppState>)> = Vec::new();

    for route in routes {
        let chain = GuardChain::new(route.guards, body_limit);
        info!(
            "Route registered: {} {} [{}]",
            route.method,
            route.path,
            chain.names().join(", ")
        );

        // route_layer keeps the guards off the method-not-allowed fallback.
        let handler = if chain.is_empty() {
            route.handler
        } else {
            route.handler.route_layer(from_fn_with_state(chain, guard_middleware))
        };

        match paths.iter().position(|(path, _)| *path == route.path) {
            Some(index) => {
                let (path, existing) = paths.remove(index);
                paths.insert(index, (path, existing.merge(handler)));
            }
            None => paths.push((route.path, handler)),
        }
    }

    for (path, handler) in paths {
        router = router.route(path, handler.fallback(method_not_allowed));
    }
    router
}

async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::method_not_allowed(format!("Method {} is not allowed on {}", method, uri.path()))
}

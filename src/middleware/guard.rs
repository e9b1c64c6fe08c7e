use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::Principal;
use crate::error::ApiError;

/// What a guard gets to look at. Built once per request by `guard_middleware`.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub path: String,
    pub params: HashMap<String, String>,
    pub principal: Option<Principal>,
    pub body: Bytes,
}

impl RequestContext {
    pub fn param(&self, name: &str) -> Result<&str, ApiError> {
        self.params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ApiError::bad_request(format!("Missing path parameter '{}'", name)))
    }

    pub fn principal(&self) -> Result<&Principal, ApiError> {
        self.principal
            .as_ref()
            .ok_or_else(|| ApiError::unauthenticated("This section allowed only for authorized users"))
    }
}

/// One stage of a route's pipeline. Guards only read; a failing guard stops
/// the pipeline and the handler never runs.
#[async_trait]
pub trait Guard: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(&self, ctx: &RequestContext) -> Result<(), ApiError>;

    /// Path parameter this guard proves refers to an existing document.
    fn establishes(&self) -> Option<&str> {
        None
    }

    /// Path parameter an earlier guard must already have proven to exist.
    fn depends_on(&self) -> Option<&str> {
        None
    }
}

/// Ordered guards attached to one route.
#[derive(Clone)]
pub struct GuardChain {
    guards: Arc<[Arc<dyn Guard>]>,
    body_limit: usize,
}

impl GuardChain {
    /// Panics if a guard depends on a parameter no earlier guard establishes.
    pub fn new(guards: Vec<Arc<dyn Guard>>, body_limit: usize) -> Self {
        for (i, guard) in guards.iter().enumerate() {
            if let Some(param) = guard.depends_on() {
                let proven = guards[..i].iter().any(|g| g.establishes() == Some(param));
                assert!(
                    proven,
                    "guard '{}' needs an existence check for ':{}' earlier in the chain",
                    guard.name(),
                    param
                );
            }
        }

        Self {
            guards: guards.into(),
            body_limit,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.guards.iter().map(|g| g.name()).collect()
    }

    pub async fn run(&self, ctx: &RequestContext) -> Result<(), ApiError> {
        for guard in self.guards.iter() {
            if let Err(e) = guard.check(ctx).await {
                tracing::debug!("Guard '{}' rejected {}: {}", guard.name(), ctx.path, e);
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Runs a route's guard chain before its handler. The body is buffered so
/// body-inspecting guards can run, then handed on unchanged.
pub async fn guard_middleware(
    State(chain): State<GuardChain>,
    params: Option<Path<HashMap<String, String>>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, chain.body_limit)
        .await
        .map_err(|e| ApiError::bad_request(format!("Unreadable request body: {}", e)))?;

    let ctx = RequestContext {
        path: parts.uri.path().to_string(),
        params: params.map(|Path(p)| p).unwrap_or_default(),
        principal: parts.extensions.get::<Principal>().cloned(),
        body: body.clone(),
    };

    chain.run(&ctx).await?;

    Ok(next.run(Request::from_parts(parts, Body::from(body))).await)
}

use axum::extract::State;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn root() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": "Six Cities API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/auth/register, /auth/login, /auth/logout",
            "offers": "/offers[/:offerId]",
            "comments": "/offers/:offerId/comments",
            "favorites": "/users/:userId/favorites[/:offerId]",
            "health": "/health",
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    let now = chrono::Utc::now();
    state.store.health_check().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::unclassified("database unavailable")
    })?;

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": now,
        "database": "ok",
    })))
}

pub async fn fallback() -> ApiError {
    ApiError::not_found("Route not found")
}

use axum::extract::State;

use crate::api::dto::{CreateUserDto, LoginUserDto};
use crate::api::format::{LoggedUserView, UserView};
use crate::auth::Principal;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Dto};
use crate::state::AppState;

/// POST /auth/register
pub async fn register(State(state): State<AppState>, Dto(dto): Dto<CreateUserDto>) -> ApiResult<UserView> {
    let user = state.users.create(dto).await?;
    Ok(ApiResponse::created(UserView::from(&user)))
}

/// POST /auth/login
pub async fn login(State(state): State<AppState>, Dto(dto): Dto<LoginUserDto>) -> ApiResult<LoggedUserView> {
    let user = state.users.verify(&dto).await?;
    let token = state.tokens.issue(&Principal::new(&user.id, &user.email))?;
    Ok(ApiResponse::success(LoggedUserView {
        email: user.email,
        token,
    }))
}

/// GET /auth/login
pub async fn check(State(state): State<AppState>, principal: Principal) -> ApiResult<UserView> {
    let user = state
        .users
        .find_by_id(&principal.id)
        .await?
        .ok_or_else(|| ApiError::unauthenticated("Unauthorized"))?;
    Ok(ApiResponse::success(UserView::from(&user)))
}

/// DELETE /auth/logout
///
/// Credentials are stateless, so there is nothing to revoke. The token stays
/// valid until it expires.
pub async fn logout(principal: Principal) -> ApiResponse<()> {
    tracing::info!("Logout requested by {}", principal.email);
    ApiResponse::no_content()
}

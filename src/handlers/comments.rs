use axum::extract::{Path, State};

use crate::api::dto::CreateCommentDto;
use crate::api::format::CommentView;
use crate::auth::Principal;
use crate::middleware::{ApiResponse, ApiResult, Dto};
use crate::state::AppState;

/// GET /offers/:offerId/comments
pub async fn index(State(state): State<AppState>, Path(offer_id): Path<String>) -> ApiResult<Vec<CommentView>> {
    let comments = state.comments.find_by_offer(&offer_id).await?;

    let mut views = Vec::with_capacity(comments.len());
    for comment in &comments {
        let author = state.comments.author(comment).await?;
        views.push(CommentView::new(comment, author.as_ref()));
    }
    Ok(ApiResponse::success(views))
}

/// POST /offers/:offerId/comments
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    Path(offer_id): Path<String>,
    Dto(dto): Dto<CreateCommentDto>,
) -> ApiResult<CommentView> {
    let comment = state.comments.create(dto, &offer_id, &principal.id).await?;
    state.offers.refresh_comment_stats(&offer_id).await?;

    let author = state.comments.author(&comment).await?;
    Ok(ApiResponse::created(CommentView::new(&comment, author.as_ref())))
}

use axum::extract::{rejection::QueryRejection, Path, Query, State};
use serde::Deserialize;

use crate::api::format::OfferSummaryView;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FavoriteQuery {
    #[serde(rename = "isFav")]
    pub is_fav: Option<String>,
}

impl FavoriteQuery {
    fn flag(&self) -> Result<bool, ApiError> {
        match self.is_fav.as_deref() {
            Some("1") => Ok(true),
            Some("0") => Ok(false),
            other => Err(ApiError::bad_request(format!(
                "isFav must be 0 or 1, got {}",
                other.unwrap_or("nothing")
            ))),
        }
    }
}

async fn favorite_views(state: &AppState, user_id: &str) -> Result<Vec<OfferSummaryView>, ApiError> {
    let offers = state.users.favorites(user_id).await?;
    Ok(offers.iter().map(|offer| OfferSummaryView::new(offer, true)).collect())
}

/// GET /users/:userId/favorites
pub async fn index(State(state): State<AppState>, Path(user_id): Path<String>) -> ApiResult<Vec<OfferSummaryView>> {
    Ok(ApiResponse::success(favorite_views(&state, &user_id).await?))
}

/// PUT /users/:userId/favorites/:offerId?isFav=0|1
pub async fn update(
    State(state): State<AppState>,
    Path((user_id, offer_id)): Path<(String, String)>,
    query: Result<Query<FavoriteQuery>, QueryRejection>,
) -> ApiResult<Vec<OfferSummaryView>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let favorite = query.flag()?;

    state.users.set_favorite(&user_id, &offer_id, favorite).await?;
    Ok(ApiResponse::success(favorite_views(&state, &user_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(raw: Option<&str>) -> Result<bool, ApiError> {
        FavoriteQuery { is_fav: raw.map(String::from) }.flag()
    }

    #[test]
    fn flag_accepts_only_zero_and_one() {
        assert_eq!(flag(Some("1")).unwrap(), true);
        assert_eq!(flag(Some("0")).unwrap(), false);
        assert!(flag(Some("yes")).is_err());
        assert!(flag(None).is_err());
    }
}

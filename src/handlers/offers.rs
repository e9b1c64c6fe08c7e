use axum::extract::{rejection::QueryRejection, Path, Query, State};
use serde::Deserialize;

use crate::api::dto::{CreateOfferDto, UpdateOfferDto};
use crate::api::format::{OfferSummaryView, OfferView};
use crate::auth::Principal;
use crate::database::models::{City, Offer};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Dto};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct OffersQuery {
    pub limit: Option<String>,
    pub city: Option<String>,
    pub premium: Option<String>,
}

/// Validated listing parameters.
#[derive(Debug, PartialEq)]
pub struct Listing {
    pub limit: Option<usize>,
    pub city: Option<City>,
    pub premium: bool,
}

impl OffersQuery {
    pub fn parse(self) -> Result<Listing, ApiError> {
        let limit = self
            .limit
            .map(|raw| {
                raw.parse::<usize>()
                    .map_err(|_| ApiError::bad_request(format!("{} is not a valid limit", raw)))
            })
            .transpose()?;

        let city = self
            .city
            .map(|raw| City::parse(&raw).ok_or_else(|| ApiError::bad_request(format!("Unknown city {}", raw))))
            .transpose()?;

        let premium = matches!(self.premium.as_deref(), Some("true") | Some("1"));
        if premium && city.is_none() {
            return Err(ApiError::bad_request("Premium offers are listed per city"));
        }

        Ok(Listing { limit, city, premium })
    }
}

async fn offer_view(state: &AppState, offer: &Offer, principal: Option<&Principal>) -> Result<OfferView, ApiError> {
    let favorites = state.offers.favorite_ids(principal).await?;
    let advertiser = state.offers.advertiser(offer).await?;
    Ok(OfferView::new(offer, favorites.contains(&offer.id), advertiser.as_ref()))
}

async fn load(state: &AppState, offer_id: &str) -> Result<Offer, ApiError> {
    state
        .offers
        .find_by_id(offer_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Offer with {} not found.", offer_id)))
}

/// GET /offers
pub async fn index(
    State(state): State<AppState>,
    principal: Option<Principal>,
    query: Result<Query<OffersQuery>, QueryRejection>,
) -> ApiResult<Vec<OfferSummaryView>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let listing = query.parse()?;

    let offers = match (listing.premium, listing.city) {
        (true, Some(city)) => state.offers.find_premium(city).await?,
        _ => state.offers.find(listing.limit, listing.city).await?,
    };
    let favorites = state.offers.favorite_ids(principal.as_ref()).await?;

    Ok(ApiResponse::success(
        offers
            .iter()
            .map(|offer| OfferSummaryView::new(offer, favorites.contains(&offer.id)))
            .collect(),
    ))
}

/// POST /offers
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    Dto(dto): Dto<CreateOfferDto>,
) -> ApiResult<OfferView> {
    let offer = state.offers.create(dto, &principal.id).await?;
    let view = offer_view(&state, &offer, Some(&principal)).await?;
    Ok(ApiResponse::created(view))
}

/// GET /offers/:offerId
pub async fn show(
    State(state): State<AppState>,
    principal: Option<Principal>,
    Path(offer_id): Path<String>,
) -> ApiResult<OfferView> {
    let offer = load(&state, &offer_id).await?;
    Ok(ApiResponse::success(offer_view(&state, &offer, principal.as_ref()).await?))
}

/// PATCH /offers/:offerId
pub async fn update(
    State(state): State<AppState>,
    principal: Principal,
    Path(offer_id): Path<String>,
    Dto(dto): Dto<UpdateOfferDto>,
) -> ApiResult<OfferView> {
    let offer = state.offers.update(&offer_id, dto).await?;
    Ok(ApiResponse::success(offer_view(&state, &offer, Some(&principal)).await?))
}

/// DELETE /offers/:offerId
pub async fn delete(State(state): State<AppState>, Path(offer_id): Path<String>) -> ApiResult<()> {
    state.offers.delete(&offer_id).await?;
    Ok(ApiResponse::no_content())
}

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::{DocumentExists, DocumentOwnership};
use crate::api::dto::{CreateOfferDto, UpdateOfferDto};
use crate::auth::Principal;
use crate::database::models::{City, Comment, Location, Offer, User};
use crate::database::{Collection, Store};
use crate::error::ApiError;

pub const DEFAULT_OFFERS_COUNT: usize = 60;
pub const MAX_PREMIUM_OFFERS_COUNT: usize = 3;

#[derive(Clone)]
pub struct OfferService {
    offers: Arc<dyn Collection<Offer>>,
    comments: Arc<dyn Collection<Comment>>,
    users: Arc<dyn Collection<User>>,
}

impl OfferService {
    pub fn new(store: &Store) -> Self {
        Self {
            offers: store.offers.clone(),
            comments: store.comments.clone(),
            users: store.users.clone(),
        }
    }

    pub async fn create(&self, dto: CreateOfferDto, advertiser_id: &str) -> Result<Offer, ApiError> {
        let offer = Offer {
            id: Offer::new_id(),
            title: dto.title,
            description: dto.description,
            created_at: Utc::now(),
            city: dto.city,
            preview_image: dto.preview_image,
            images: dto.images,
            is_premium: dto.is_premium,
            rating: 0.0,
            offer_type: dto.offer_type,
            bedrooms: dto.bedrooms as u32,
            max_adults: dto.max_adults as u32,
            price: dto.price as u32,
            goods: dto.goods,
            advertiser_id: advertiser_id.to_string(),
            comment_count: 0,
            location: Location {
                latitude: dto.latitude,
                longitude: dto.longitude,
            },
        };

        let offer = self.offers.insert(offer).await?;
        info!("New offer created: {}", offer.title);
        Ok(offer)
    }

    pub async fn find_by_id(&self, offer_id: &str) -> Result<Option<Offer>, ApiError> {
        Ok(self.offers.find_by_id(offer_id).await?)
    }

    /// Newest offers first, optionally restricted to one city.
    pub async fn find(&self, limit: Option<usize>, city: Option<City>) -> Result<Vec<Offer>, ApiError> {
        let limit = limit.unwrap_or(DEFAULT_OFFERS_COUNT);
        let offers = self.offers.find_all().await?;
        Ok(offers
            .into_iter()
            .filter(|o| city.map_or(true, |c| o.city == c))
            .take(limit)
            .collect())
    }

    pub async fn find_premium(&self, city: City) -> Result<Vec<Offer>, ApiError> {
        let offers = self.offers.find_all().await?;
        Ok(offers
            .into_iter()
            .filter(|o| o.is_premium && o.city == city)
            .take(MAX_PREMIUM_OFFERS_COUNT)
            .collect())
    }

    pub async fn update(&self, offer_id: &str, dto: UpdateOfferDto) -> Result<Offer, ApiError> {
        let mut offer = self
            .find_by_id(offer_id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Offer with id {} not found", offer_id)))?;

        if let Some(title) = dto.title {
            offer.title = title;
        }
        if let Some(description) = dto.description {
            offer.description = description;
        }
        if let Some(city) = dto.city {
            offer.city = city;
        }
        if let Some(preview_image) = dto.preview_image {
            offer.preview_image = preview_image;
        }
        if let Some(images) = dto.images {
            offer.images = images;
        }
        if let Some(is_premium) = dto.is_premium {
            offer.is_premium = is_premium;
        }
        if let Some(offer_type) = dto.offer_type {
            offer.offer_type = offer_type;
        }
        if let Some(bedrooms) = dto.bedrooms {
            offer.bedrooms = bedrooms as u32;
        }
        if let Some(max_adults) = dto.max_adults {
            offer.max_adults = max_adults as u32;
        }
        if let Some(price) = dto.price {
            offer.price = price as u32;
        }
        if let Some(goods) = dto.goods {
            offer.goods = goods;
        }
        if let Some(latitude) = dto.latitude {
            offer.location.latitude = latitude;
        }
        if let Some(longitude) = dto.longitude {
            offer.location.longitude = longitude;
        }

        self.offers
            .replace(offer)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Offer with id {} not found", offer_id)))
    }

    /// Delete an offer together with its comments. Deleting twice is not an error.
    pub async fn delete(&self, offer_id: &str) -> Result<bool, ApiError> {
        let deleted = self.offers.delete(offer_id).await?;
        let comments = self.comments.delete_by_field("offerId", offer_id).await?;
        info!("Offer {} deleted with {} comments", offer_id, comments);
        Ok(deleted)
    }

    /// Recount comments and recompute the average rating, rounded to one decimal.
    pub async fn refresh_comment_stats(&self, offer_id: &str) -> Result<Offer, ApiError> {
        let mut offer = self
            .find_by_id(offer_id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Offer with id {} not found", offer_id)))?;

        let comments = self.comments.find_by_field("offerId", offer_id).await?;
        offer.comment_count = comments.len() as u32;
        offer.rating = average_rating(&comments);

        self.offers
            .replace(offer)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Offer with id {} not found", offer_id)))
    }

    /// Offer ids the principal has marked as favorite. Anonymous callers have none.
    pub async fn favorite_ids(&self, principal: Option<&Principal>) -> Result<HashSet<String>, ApiError> {
        let Some(principal) = principal else {
            return Ok(HashSet::new());
        };
        Ok(self
            .users
            .find_by_id(&principal.id)
            .await?
            .map(|user| user.favorites.into_iter().collect())
            .unwrap_or_default())
    }

    pub async fn advertiser(&self, offer: &Offer) -> Result<Option<User>, ApiError> {
        Ok(self.users.find_by_id(&offer.advertiser_id).await?)
    }
}

fn average_rating(comments: &[Comment]) -> f64 {
    if comments.is_empty() {
        return 0.0;
    }
    let sum: u32 = comments.iter().map(|c| c.rating as u32).sum();
    let mean = sum as f64 / comments.len() as f64;
    (mean * 10.0).round() / 10.0
}

#[async_trait]
impl DocumentExists for OfferService {
    async fn exists(&self, document_id: &str) -> Result<bool, ApiError> {
        Ok(self.offers.exists(document_id).await?)
    }
}

#[async_trait]
impl DocumentOwnership for OfferService {
    async fn can_modify(&self, owner_id: &str, document_id: &str) -> Result<bool, ApiError> {
        Ok(self
            .offers
            .find_by_id(document_id)
            .await?
            .map_or(false, |offer| offer.advertiser_id == owner_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Goods, OfferType};

    fn dto(city: City, premium: bool) -> CreateOfferDto {
        CreateOfferDto {
            title: "Cosy flat near the canal".into(),
            description: "Bright two-room flat, five minutes from the station.".into(),
            city,
            preview_image: "preview.jpg".into(),
            images: vec![],
            is_premium: premium,
            offer_type: OfferType::Apartment,
            bedrooms: 2,
            max_adults: 3,
            price: 1200,
            goods: vec![Goods::Washer],
            latitude: 52.37,
            longitude: 4.89,
        }
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        let comments: Vec<Comment> = [5u8, 4, 4]
            .iter()
            .map(|r| Comment::new("Great stay".into(), *r, "o1".into(), "u1".into()))
            .collect();
        assert_eq!(average_rating(&comments), 4.3);
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[tokio::test]
    async fn only_advertiser_can_modify() {
        let offers = OfferService::new(&Store::memory());
        let offer = offers.create(dto(City::Paris, false), "u1").await.unwrap();

        assert!(offers.can_modify("u1", &offer.id).await.unwrap());
        assert!(!offers.can_modify("u2", &offer.id).await.unwrap());
        assert!(!offers.can_modify("u1", "missing-id").await.unwrap());
    }

    #[tokio::test]
    async fn premium_capped_per_city() {
        let offers = OfferService::new(&Store::memory());
        for _ in 0..5 {
            offers.create(dto(City::Hamburg, true), "u1").await.unwrap();
        }
        offers.create(dto(City::Paris, true), "u1").await.unwrap();
        offers.create(dto(City::Hamburg, false), "u1").await.unwrap();

        let premium = offers.find_premium(City::Hamburg).await.unwrap();
        assert_eq!(premium.len(), MAX_PREMIUM_OFFERS_COUNT);
        assert!(premium.iter().all(|o| o.is_premium && o.city == City::Hamburg));
    }

    #[tokio::test]
    async fn delete_removes_comments() {
        let store = Store::memory();
        let offers = OfferService::new(&store);
        let offer = offers.create(dto(City::Paris, false), "u1").await.unwrap();
        store
            .comments
            .insert(Comment::new("Lovely place".into(), 5, offer.id.clone(), "u2".into()))
            .await
            .unwrap();

        assert!(offers.delete(&offer.id).await.unwrap());
        assert!(store.comments.find_all().await.unwrap().is_empty());
        assert!(!offers.delete(&offer.id).await.unwrap());
    }
}

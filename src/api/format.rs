use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::models::{City, Comment, Goods, Location, Offer, OfferType, User, UserStatus};

/// Public view of a user. Never carries the password hash or favorites.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub avatar_path: String,
    pub status: UserStatus,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            avatar_path: user.avatar_path.clone(),
            status: user.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedUserView {
    pub email: String,
    pub token: String,
}

/// List-item view of an offer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferSummaryView {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub city: CityView,
    pub preview_image: String,
    pub is_premium: bool,
    pub is_favorite: bool,
    pub rating: f64,
    #[serde(rename = "type")]
    pub offer_type: OfferType,
    pub price: u32,
    pub comment_count: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferView {
    #[serde(flatten)]
    pub summary: OfferSummaryView,
    pub description: String,
    pub images: Vec<String>,
    pub bedrooms: u32,
    pub max_adults: u32,
    pub goods: Vec<Goods>,
    pub advertiser: Option<UserView>,
    pub location: Location,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityView {
    pub name: City,
    #[serde(flatten)]
    pub location: Location,
}

impl From<City> for CityView {
    fn from(city: City) -> Self {
        Self {
            name: city,
            location: city.location(),
        }
    }
}

impl OfferSummaryView {
    pub fn new(offer: &Offer, is_favorite: bool) -> Self {
        Self {
            id: offer.id.clone(),
            title: offer.title.clone(),
            created_at: offer.created_at,
            city: offer.city.into(),
            preview_image: offer.preview_image.clone(),
            is_premium: offer.is_premium,
            is_favorite,
            rating: offer.rating,
            offer_type: offer.offer_type,
            price: offer.price,
            comment_count: offer.comment_count,
        }
    }
}

impl OfferView {
    pub fn new(offer: &Offer, is_favorite: bool, advertiser: Option<&User>) -> Self {
        Self {
            summary: OfferSummaryView::new(offer, is_favorite),
            description: offer.description.clone(),
            images: offer.images.clone(),
            bedrooms: offer.bedrooms,
            max_adults: offer.max_adults,
            goods: offer.goods.clone(),
            advertiser: advertiser.map(UserView::from),
            location: offer.location,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub text: String,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
    pub author: Option<UserView>,
}

impl CommentView {
    pub fn new(comment: &Comment, author: Option<&User>) -> Self {
        Self {
            id: comment.id.clone(),
            text: comment.text.clone(),
            rating: comment.rating,
            created_at: comment.created_at,
            author: author.map(UserView::from),
        }
    }
}

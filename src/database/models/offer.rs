use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::collection::Document;

/// The six cities offers can be listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    Paris,
    Cologne,
    Brussels,
    Amsterdam,
    Hamburg,
    Dusseldorf,
}

impl City {
    pub const ALL: [City; 6] = [
        City::Paris,
        City::Cologne,
        City::Brussels,
        City::Amsterdam,
        City::Hamburg,
        City::Dusseldorf,
    ];

    pub fn name(self) -> &'static str {
        match self {
            City::Paris => "Paris",
            City::Cologne => "Cologne",
            City::Brussels => "Brussels",
            City::Amsterdam => "Amsterdam",
            City::Hamburg => "Hamburg",
            City::Dusseldorf => "Dusseldorf",
        }
    }

    pub fn location(self) -> Location {
        let (latitude, longitude) = match self {
            City::Paris => (48.85661, 2.351499),
            City::Cologne => (50.938361, 6.959974),
            City::Brussels => (50.846557, 4.351697),
            City::Amsterdam => (52.370216, 4.895168),
            City::Hamburg => (53.550341, 10.000654),
            City::Dusseldorf => (51.225402, 6.776314),
        };
        Location { latitude, longitude }
    }

    pub fn parse(name: &str) -> Option<City> {
        City::ALL.into_iter().find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferType {
    Apartment,
    House,
    Room,
    Hotel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Goods {
    Breakfast,
    #[serde(rename = "Air conditioning")]
    AirConditioning,
    Laptop,
    #[serde(rename = "Friendly workspace")]
    FriendlyWorkspace,
    #[serde(rename = "Baby seat")]
    BabySeat,
    Washer,
    Towels,
    Fridge,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub city: City,
    pub preview_image: String,
    pub images: Vec<String>,
    pub is_premium: bool,
    pub rating: f64,
    #[serde(rename = "type")]
    pub offer_type: OfferType,
    pub bedrooms: u32,
    pub max_adults: u32,
    pub price: u32,
    pub goods: Vec<Goods>,
    pub advertiser_id: String,
    pub comment_count: u32,
    pub location: Location,
}

impl Offer {
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }
}

impl Document for Offer {
    const COLLECTION: &'static str = "offers";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

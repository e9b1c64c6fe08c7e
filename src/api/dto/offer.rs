use std::collections::HashSet;

use serde::Deserialize;

use super::{Fields, Validate};
use crate::database::models::{City, Goods, OfferType};

const TITLE_LENGTH: (usize, usize) = (10, 100);
const DESCRIPTION_LENGTH: (usize, usize) = (20, 1024);
const BEDROOMS: (i64, i64) = (1, 8);
const MAX_ADULTS: (i64, i64) = (1, 10);
const PRICE: (i64, i64) = (100, 100_000);

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferDto {
    pub title: String,
    pub description: String,
    pub city: City,
    pub preview_image: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub is_premium: bool,
    #[serde(rename = "type")]
    pub offer_type: OfferType,
    pub bedrooms: i64,
    pub max_adults: i64,
    pub price: i64,
    pub goods: Vec<Goods>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Validate for CreateOfferDto {
    fn validate(fields: &mut Fields<'_>) {
        offer_fields(fields, true);
    }
}

/// Partial update; absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOfferDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub city: Option<City>,
    pub preview_image: Option<String>,
    pub images: Option<Vec<String>>,
    pub is_premium: Option<bool>,
    #[serde(rename = "type")]
    pub offer_type: Option<OfferType>,
    pub bedrooms: Option<i64>,
    pub max_adults: Option<i64>,
    pub price: Option<i64>,
    pub goods: Option<Vec<Goods>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Validate for UpdateOfferDto {
    fn validate(fields: &mut Fields<'_>) {
        offer_fields(fields, false);
    }
}

/// Rules shared by creation and partial update. `required` decides whether
/// an absent field is itself an error.
fn offer_fields(fields: &mut Fields<'_>, required: bool) {
    if let Some(title) = fields.field::<String>("title", required) {
        fields.length("title", &title, TITLE_LENGTH);
    }
    if let Some(description) = fields.field::<String>("description", required) {
        fields.length("description", &description, DESCRIPTION_LENGTH);
    }
    fields.field::<City>("city", required);
    fields.field::<String>("previewImage", required);
    fields.optional::<Vec<String>>("images");
    fields.field::<bool>("isPremium", required);
    fields.field::<OfferType>("type", required);
    if let Some(bedrooms) = fields.field::<i64>("bedrooms", required) {
        fields.range("bedrooms", bedrooms, BEDROOMS);
    }
    if let Some(max_adults) = fields.field::<i64>("maxAdults", required) {
        fields.range("maxAdults", max_adults, MAX_ADULTS);
    }
    if let Some(price) = fields.field::<i64>("price", required) {
        fields.range("price", price, PRICE);
    }
    if let Some(goods) = fields.field::<Vec<Goods>>("goods", required) {
        check_goods(fields, &goods);
    }
    let latitude = fields.field::<f64>("latitude", required);
    let longitude = fields.field::<f64>("longitude", required);
    fields.coordinates(latitude, longitude);
}

fn check_goods(fields: &mut Fields<'_>, goods: &[Goods]) {
    let value = serde_json::to_value(goods).unwrap_or_default();
    if goods.is_empty() {
        fields.reject("goods", value, "goods must contain at least one item");
        return;
    }
    let unique: HashSet<&Goods> = goods.iter().collect();
    if unique.len() != goods.len() {
        fields.reject("goods", value, "all items in goods must be unique");
    }
}

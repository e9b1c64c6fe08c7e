use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::collection::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Pro,
    Regular,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub avatar_path: String,
    pub status: UserStatus,
    /// Offer ids, in the order they were added.
    pub favorites: Vec<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub const DEFAULT_AVATAR: &'static str = "default-avatar.png";

    pub fn new(username: String, email: String, status: UserStatus, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            avatar_path: Self::DEFAULT_AVATAR.to_string(),
            status,
            favorites: Vec::new(),
            password_hash,
            created_at: Utc::now(),
        }
    }

    /// Add or remove an offer from favorites. Adding is idempotent.
    pub fn set_favorite(&mut self, offer_id: &str, favorite: bool) {
        if favorite {
            if !self.favorites.iter().any(|id| id == offer_id) {
                self.favorites.push(offer_id.to_string());
            }
        } else {
            self.favorites.retain(|id| id != offer_id);
        }
    }

    pub fn is_favorite(&self, offer_id: &str) -> bool {
        self.favorites.iter().any(|id| id == offer_id)
    }
}

impl Document for User {
    const COLLECTION: &'static str = "users";
    const UNIQUE_FIELDS: &'static [&'static str] = &["email"];

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

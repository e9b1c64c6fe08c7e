use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::collection::Document;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub rating: u8,
    pub offer_id: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(text: String, rating: u8, offer_id: String, author_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text,
            rating,
            offer_id,
            author_id,
            created_at: Utc::now(),
        }
    }
}

impl Document for Comment {
    const COLLECTION: &'static str = "comments";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

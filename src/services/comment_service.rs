use std::sync::Arc;

use tracing::info;

use crate::api::dto::CreateCommentDto;
use crate::database::models::{Comment, User};
use crate::database::{Collection, Store};
use crate::error::ApiError;

pub const MAX_COMMENTS_COUNT: usize = 50;

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn Collection<Comment>>,
    users: Arc<dyn Collection<User>>,
}

impl CommentService {
    pub fn new(store: &Store) -> Self {
        Self {
            comments: store.comments.clone(),
            users: store.users.clone(),
        }
    }

    pub async fn create(&self, dto: CreateCommentDto, offer_id: &str, author_id: &str) -> Result<Comment, ApiError> {
        let comment = Comment::new(dto.text, dto.rating as u8, offer_id.to_string(), author_id.to_string());
        let comment = self.comments.insert(comment).await?;
        info!("New comment {} on offer {}", comment.id, offer_id);
        Ok(comment)
    }

    /// Newest comments for an offer, capped at `MAX_COMMENTS_COUNT`.
    pub async fn find_by_offer(&self, offer_id: &str) -> Result<Vec<Comment>, ApiError> {
        let mut comments = self.comments.find_by_field("offerId", offer_id).await?;
        comments.truncate(MAX_COMMENTS_COUNT);
        Ok(comments)
    }

    pub async fn author(&self, comment: &Comment) -> Result<Option<User>, ApiError> {
        Ok(self.users.find_by_id(&comment.author_id).await?)
    }
}

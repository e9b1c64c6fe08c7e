pub mod comment_service;
pub mod offer_service;
pub mod user_service;

pub use comment_service::CommentService;
pub use offer_service::OfferService;
pub use user_service::UserService;

use async_trait::async_trait;

use crate::error::ApiError;

/// Lookup capability used by the existence guard.
#[async_trait]
pub trait DocumentExists: Send + Sync {
    async fn exists(&self, document_id: &str) -> Result<bool, ApiError>;
}

/// Answers "may this principal modify this document". Missing documents
/// answer `false`.
#[async_trait]
pub trait DocumentOwnership: Send + Sync {
    async fn can_modify(&self, owner_id: &str, document_id: &str) -> Result<bool, ApiError>;
}

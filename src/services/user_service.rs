use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{DocumentExists, DocumentOwnership};
use crate::api::dto::{CreateUserDto, LoginUserDto};
use crate::auth::hash_password;
use crate::database::models::{Offer, User};
use crate::database::{Collection, Store, StoreError};
use crate::error::ApiError;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn Collection<User>>,
    offers: Arc<dyn Collection<Offer>>,
    salt: String,
}

impl UserService {
    pub fn new(store: &Store, salt: impl Into<String>) -> Self {
        Self {
            users: store.users.clone(),
            offers: store.offers.clone(),
            salt: salt.into(),
        }
    }

    pub async fn create(&self, dto: CreateUserDto) -> Result<User, ApiError> {
        if self.find_by_email(&dto.email).await?.is_some() {
            return Err(ApiError::conflict(format!(
                "User with email {} already exists",
                dto.email
            )));
        }

        let password_hash = hash_password(&dto.password, &self.salt)?;
        let email = dto.email.clone();
        let user = User::new(dto.username, dto.email, dto.status, password_hash);
        // The store enforces email uniqueness too, for registrations racing
        // past the lookup above.
        let user = self.users.insert(user).await.map_err(|e| match e {
            StoreError::Duplicate { .. } => {
                ApiError::conflict(format!("User with email {} already exists", email))
            }
            other => other.into(),
        })?;
        info!("New user created: {}", user.email);
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self.users.find_by_field("email", email).await?.into_iter().next())
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, ApiError> {
        Ok(self.users.find_by_id(user_id).await?)
    }

    /// Check login credentials. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub async fn verify(&self, dto: &LoginUserDto) -> Result<User, ApiError> {
        let user = self.find_by_email(&dto.email).await?;
        let password_hash = hash_password(&dto.password, &self.salt)?;
        match user {
            Some(user) if user.password_hash == password_hash => Ok(user),
            Some(_) => {
                tracing::warn!("Login failed for {}: wrong password", dto.email);
                Err(ApiError::unauthenticated("Incorrect email or password"))
            }
            None => {
                tracing::warn!("Login failed for {}: no such user", dto.email);
                Err(ApiError::unauthenticated("Incorrect email or password"))
            }
        }
    }

    /// The user's favorite offers, most recently listed first. Offers deleted
    /// since they were favorited are skipped.
    pub async fn favorites(&self, user_id: &str) -> Result<Vec<Offer>, ApiError> {
        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("User {} not found", user_id)))?;

        let mut offers = Vec::with_capacity(user.favorites.len());
        for offer_id in &user.favorites {
            if let Some(offer) = self.offers.find_by_id(offer_id).await? {
                offers.push(offer);
            }
        }
        offers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(offers)
    }

    pub async fn set_favorite(&self, user_id: &str, offer_id: &str, favorite: bool) -> Result<User, ApiError> {
        let mut user = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("User {} not found", user_id)))?;

        user.set_favorite(offer_id, favorite);
        self.users
            .replace(user)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("User {} not found", user_id)))
    }
}

#[async_trait]
impl DocumentExists for UserService {
    async fn exists(&self, document_id: &str) -> Result<bool, ApiError> {
        Ok(self.users.exists(document_id).await?)
    }
}

/// A user record is owned by the user it describes.
#[async_trait]
impl DocumentOwnership for UserService {
    async fn can_modify(&self, owner_id: &str, document_id: &str) -> Result<bool, ApiError> {
        if owner_id != document_id {
            return Ok(false);
        }
        Ok(self.users.exists(document_id).await?)
    }
}

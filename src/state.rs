use std::sync::Arc;

use crate::auth::{TokenError, TokenService};
use crate::config::AppConfig;
use crate::database::Store;
use crate::services::{CommentService, OfferService, UserService};

/// Shared, read-only application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub store: Store,
    pub users: UserService,
    pub offers: OfferService,
    pub comments: CommentService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Store) -> Result<Self, TokenError> {
        let tokens = TokenService::from_config(&config.security)?;
        Ok(Self {
            users: UserService::new(&store, config.security.salt.clone()),
            offers: OfferService::new(&store),
            comments: CommentService::new(&store),
            tokens: Arc::new(tokens),
            config: Arc::new(config),
            store,
        })
    }
}

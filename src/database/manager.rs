use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use super::collection::{Collection, StoreError};
use super::memory::MemoryCollection;
use super::models::{Comment, Offer, User};
use super::postgres::PgCollection;
use crate::config::DatabaseConfig;

/// The three collections the API works with.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn Collection<User>>,
    pub offers: Arc<dyn Collection<Offer>>,
    pub comments: Arc<dyn Collection<Comment>>,
}

impl Store {
    pub fn memory() -> Self {
        Self {
            users: Arc::new(MemoryCollection::<User>::new()),
            offers: Arc::new(MemoryCollection::<Offer>::new()),
            comments: Arc::new(MemoryCollection::<Comment>::new()),
        }
    }

    /// Connect to Postgres when a URL is configured, otherwise fall back to
    /// the in-memory store.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let Some(base_url) = config.url.as_deref() else {
            info!("DATABASE_URL not set, using in-memory store");
            return Ok(Self::memory());
        };

        let connection_string = Self::build_connection_string(base_url, &config.name)?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&connection_string)
            .await?;

        let users = PgCollection::<User>::new(pool.clone());
        let offers = PgCollection::<Offer>::new(pool.clone());
        let comments = PgCollection::<Comment>::new(pool);
        users.ensure_table().await?;
        offers.ensure_table().await?;
        comments.ensure_table().await?;

        info!("Connected document store to database: {}", config.name);
        Ok(Self {
            users: Arc::new(users),
            offers: Arc::new(offers),
            comments: Arc::new(comments),
        })
    }

    /// Swap the database name into the path of the base URL.
    fn build_connection_string(base: &str, database_name: &str) -> Result<String, StoreError> {
        if database_name.trim().is_empty() {
            return Err(StoreError::ConfigMissing("DB_NAME"));
        }
        let mut url = url::Url::parse(base).map_err(|_| StoreError::InvalidDatabaseUrl)?;
        url.set_path(&format!("/{}", database_name));
        Ok(url.into())
    }

    /// Pings the offers collection to ensure connectivity
    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.offers.ping().await
    }
}

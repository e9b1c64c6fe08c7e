use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{types::Json, PgPool, Row};

use super::collection::{Collection, Document, StoreError};

/// Collection backed by a Postgres table of JSONB documents:
/// `(id TEXT PRIMARY KEY, body JSONB, created_at TIMESTAMPTZ)`.
pub struct PgCollection<T: Document> {
    pool: PgPool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> PgCollection<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Quote SQL identifier to prevent injection
    fn table() -> String {
        format!("\"{}\"", T::COLLECTION.replace('"', "\"\""))
    }

    pub async fn ensure_table(&self) -> Result<(), StoreError> {
        let query = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                body JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )",
            Self::table()
        );
        sqlx::query(&query).execute(&self.pool).await?;
        for field in T::UNIQUE_FIELDS {
            sqlx::query(&Self::unique_index_sql(field)).execute(&self.pool).await?;
        }
        tracing::debug!("Collection table ready: {}", T::COLLECTION);
        Ok(())
    }

    fn unique_index_sql(field: &str) -> String {
        let index = format!("{}_{}_key", T::COLLECTION, field).replace('"', "\"\"");
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS \"{}\" ON {} ((body->>'{}'))",
            index,
            Self::table(),
            field.replace('\'', "''")
        )
    }

    /// Unique violations become `StoreError::Duplicate` naming the field.
    fn write_error(err: sqlx::Error) -> StoreError {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                let field = T::UNIQUE_FIELDS
                    .iter()
                    .find(|field| {
                        db.constraint()
                            .is_some_and(|name| name == format!("{}_{}_key", T::COLLECTION, field))
                    })
                    .map_or("id", |field| *field);
                return StoreError::Duplicate {
                    collection: T::COLLECTION,
                    field: field.to_string(),
                };
            }
        }
        StoreError::Sqlx(err)
    }

    fn decode_rows(rows: Vec<sqlx::postgres::PgRow>) -> Result<Vec<T>, StoreError> {
        rows.into_iter()
            .map(|row| {
                let Json(document): Json<T> = row.try_get("body")?;
                Ok(document)
            })
            .collect()
    }
}

#[async_trait]
impl<T: Document> Collection<T> for PgCollection<T> {
    async fn insert(&self, document: T) -> Result<T, StoreError> {
        let query = format!(
            "INSERT INTO {} (id, body, created_at) VALUES ($1, $2, $3)",
            Self::table()
        );
        sqlx::query(&query)
            .bind(document.id())
            .bind(Json(&document))
            .bind(document.created_at())
            .execute(&self.pool)
            .await
            .map_err(Self::write_error)?;
        Ok(document)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<T>, StoreError> {
        let query = format!("SELECT body FROM {} WHERE id = $1", Self::table());
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        match row {
            Some(row) => {
                let Json(document): Json<T> = row.try_get("body")?;
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        let query = format!("SELECT body FROM {} ORDER BY created_at DESC", Self::table());
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        Self::decode_rows(rows)
    }

    async fn find_by_field(&self, field: &str, value: &str) -> Result<Vec<T>, StoreError> {
        let query = format!(
            "SELECT body FROM {} WHERE body->>$1 = $2 ORDER BY created_at DESC",
            Self::table()
        );
        let rows = sqlx::query(&query)
            .bind(field)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        Self::decode_rows(rows)
    }

    async fn replace(&self, document: T) -> Result<Option<T>, StoreError> {
        let query = format!("UPDATE {} SET body = $2 WHERE id = $1", Self::table());
        let result = sqlx::query(&query)
            .bind(document.id())
            .bind(Json(&document))
            .execute(&self.pool)
            .await
            .map_err(Self::write_error)?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(document))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let query = format!("DELETE FROM {} WHERE id = $1", Self::table());
        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_field(&self, field: &str, value: &str) -> Result<u64, StoreError> {
        let query = format!("DELETE FROM {} WHERE body->>$1 = $2", Self::table());
        let result = sqlx::query(&query)
            .bind(field)
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        let query = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1) AS found", Self::table());
        let row = sqlx::query(&query).bind(id).fetch_one(&self.pool).await?;
        Ok(row.try_get("found")?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

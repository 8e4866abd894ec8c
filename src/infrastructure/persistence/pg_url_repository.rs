//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use crate::domain::entities::{NewShortenedUrl, ShortenedUrl};
use crate::domain::errors::StoreError;
use crate::domain::repositories::UrlRepository;
use crate::utils::db_error::unique_violation_constraint;

/// PostgreSQL repository for the `url_map` table.
///
/// Primary key and `url_map_slug_key` unique constraints reject duplicate ids and slugs.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    if let Some(constraint) = unique_violation_constraint(&e) {
        return StoreError::DuplicateKey(constraint);
    }

    match e {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        other => {
            error!(error = %other, "url_map query failed");
            StoreError::Database(other.to_string())
        }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn save(&self, new_url: &NewShortenedUrl) -> Result<ShortenedUrl, StoreError> {
        let created_at: DateTime<Utc> = sqlx::query_scalar(
            r#"
            INSERT INTO url_map (id, slug, original_url)
            VALUES ($1, $2, $3)
            RETURNING created_at
            "#,
        )
        .bind(new_url.id)
        .bind(&new_url.slug)
        .bind(&new_url.original_url)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(new_url.clone().into_record(created_at))
    }

    async fn find(&self, id: i64) -> Result<ShortenedUrl, StoreError> {
        let (id, slug, original_url, created_at): (i64, String, String, DateTime<Utc>) =
            sqlx::query_as(
                r#"
                SELECT id, slug, original_url, created_at
                FROM url_map
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        Ok(ShortenedUrl::new(id, slug, original_url, created_at))
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}

//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::{LinkRepository, Page};
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, url, code, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    url: String,
    code: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for ShortLink {
    fn from(row: LinkRow) -> Self {
        ShortLink::new(row.id, row.url, row.code, row.created_at, row.updated_at)
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Code uniqueness is enforced by the `urls_code_key` unique constraint; inserts
/// use `ON CONFLICT DO NOTHING` so a lost race surfaces as
/// [`AppError::Conflict`] rather than a database error.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn exists(&self, code: &str, exclude_url: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM urls WHERE code = $1 AND url <> $2)",
        )
        .bind(code)
        .bind(exclude_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM urls WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortLink::from))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM urls WHERE url = $1 ORDER BY id LIMIT 1"
        ))
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortLink::from))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "SELECT {LINK_COLUMNS} FROM urls WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortLink::from))
    }

    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let inserted = sqlx::query_as::<_, LinkRow>(&format!(
            r#"
            INSERT INTO urls (url, code)
            VALUES ($1, $2)
            ON CONFLICT (code) DO NOTHING
            RETURNING {LINK_COLUMNS}
            "#
        ))
        .bind(&new_link.url)
        .bind(&new_link.code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        if let Some(row) = inserted {
            return Ok(row.into());
        }

        // The code is taken; that is only fine if it is taken by this very URL.
        match self.find_by_code(&new_link.code).await? {
            Some(existing) if existing.points_to(&new_link.url) => Ok(existing),
            _ => Err(AppError::conflict(
                "Code already taken",
                json!({ "code": new_link.code }),
            )),
        }
    }

    async fn list(&self, page: Option<Page>) -> Result<Vec<ShortLink>, AppError> {
        let rows = match page {
            Some(page) => {
                sqlx::query_as::<_, LinkRow>(&format!(
                    "SELECT {LINK_COLUMNS} FROM urls ORDER BY id LIMIT $1 OFFSET $2"
                ))
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(self.pool.as_ref())
                .await?
            }
            None => {
                sqlx::query_as::<_, LinkRow>(&format!(
                    "SELECT {LINK_COLUMNS} FROM urls ORDER BY id"
                ))
                .fetch_all(self.pool.as_ref())
                .await?
            }
        };

        Ok(rows.into_iter().map(ShortLink::from).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn delete(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(&format!(
            "DELETE FROM urls WHERE id = $1 RETURNING {LINK_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortLink::from))
    }
}

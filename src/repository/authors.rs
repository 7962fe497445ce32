//! Authors repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{Author, PageRequest},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorsRepository: Send + Sync {
    /// One page of authors ordered by name, with the total count
    async fn list(&self, page: PageRequest) -> AppResult<(Vec<Author>, i64)>;

    async fn get_by_id(&self, id: i32) -> AppResult<Author>;

    async fn count(&self) -> AppResult<i64>;
}

#[derive(Clone)]
pub struct PgAuthorsRepository {
    pool: Pool<Postgres>,
}

impl PgAuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorsRepository for PgAuthorsRepository {
    async fn list(&self, page: PageRequest) -> AppResult<(Vec<Author>, i64)> {
        let total = self.count().await?;

        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT id, first_name, last_name, date_of_birth, date_of_death
            FROM authors
            ORDER BY last_name, first_name, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((authors, total))
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            "SELECT id, first_name, last_name, date_of_birth, date_of_death FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

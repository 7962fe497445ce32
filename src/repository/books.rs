//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookShort, Genre, PageRequest},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BooksRepository: Send + Sync {
    /// One page of books ordered by title, with the total count
    async fn list(&self, page: PageRequest) -> AppResult<(Vec<BookShort>, i64)>;

    async fn get_by_id(&self, id: i32) -> AppResult<Book>;

    async fn genres(&self, book_id: i32) -> AppResult<Vec<Genre>>;

    async fn by_author(&self, author_id: i32) -> AppResult<Vec<BookShort>>;

    async fn count(&self) -> AppResult<i64>;

    /// Count books whose title contains `needle` (case sensitive)
    async fn count_title_contains(&self, needle: &str) -> AppResult<i64>;
}

/// Build a LIKE pattern matching `needle` anywhere, with wildcards escaped
pub fn contains_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

const BOOK_SHORT_COLUMNS: &str = r#"
    b.id, b.title, b.author_id,
    a.last_name || ', ' || a.first_name AS author_name
"#;

#[derive(Clone)]
pub struct PgBooksRepository {
    pool: Pool<Postgres>,
}

impl PgBooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BooksRepository for PgBooksRepository {
    async fn list(&self, page: PageRequest) -> AppResult<(Vec<BookShort>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        let query = format!(
            r#"
            SELECT {}
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            ORDER BY b.title, b.id
            LIMIT $1 OFFSET $2
            "#,
            BOOK_SHORT_COLUMNS
        );
        let books = sqlx::query_as::<_, BookShort>(&query)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((books, total))
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "SELECT id, title, summary, isbn, author_id FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    async fn genres(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(genres)
    }

    async fn by_author(&self, author_id: i32) -> AppResult<Vec<BookShort>> {
        let query = format!(
            r#"
            SELECT {}
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            WHERE b.author_id = $1
            ORDER BY b.title, b.id
            "#,
            BOOK_SHORT_COLUMNS
        );
        let books = sqlx::query_as::<_, BookShort>(&query)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_title_contains(&self, needle: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE title LIKE $1")
            .bind(contains_pattern(needle))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

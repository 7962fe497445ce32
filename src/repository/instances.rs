//! Book instances repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{BookInstance, BorrowedInstance, LoanStatus, PageRequest},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstancesRepository: Send + Sync {
    /// All copies of a book, soonest due first
    async fn for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>>;

    /// Copies on loan to `borrower_id`, soonest due first, with the total count
    async fn borrowed_by(
        &self,
        borrower_id: i32,
        page: PageRequest,
    ) -> AppResult<(Vec<BorrowedInstance>, i64)>;

    /// Every copy on loan, soonest due first
    async fn all_borrowed(&self) -> AppResult<Vec<BorrowedInstance>>;

    async fn count(&self) -> AppResult<i64>;

    async fn count_by_status(&self, status: LoanStatus) -> AppResult<i64>;
}

const BORROWED_COLUMNS: &str = r#"
    bi.id, bi.book_id, b.title AS book_title, bi.imprint, bi.due_back, bi.borrower_id,
    (bi.due_back < CURRENT_DATE) AS is_overdue
"#;

#[derive(Clone)]
pub struct PgInstancesRepository {
    pool: Pool<Postgres>,
}

impl PgInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InstancesRepository for PgInstancesRepository {
    async fn for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let instances = sqlx::query_as::<_, BookInstance>(
            r#"
            SELECT id, book_id, imprint, due_back, status, borrower_id
            FROM book_instances
            WHERE book_id = $1
            ORDER BY due_back NULLS LAST, id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(instances)
    }

    async fn borrowed_by(
        &self,
        borrower_id: i32,
        page: PageRequest,
    ) -> AppResult<(Vec<BorrowedInstance>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_instances WHERE status = $1 AND borrower_id = $2",
        )
        .bind(LoanStatus::OnLoan)
        .bind(borrower_id)
        .fetch_one(&self.pool)
        .await?;

        let query = format!(
            r#"
            SELECT {}
            FROM book_instances bi
            JOIN books b ON b.id = bi.book_id
            WHERE bi.status = $1 AND bi.borrower_id = $2
            ORDER BY bi.due_back ASC, bi.id
            LIMIT $3 OFFSET $4
            "#,
            BORROWED_COLUMNS
        );
        let loans = sqlx::query_as::<_, BorrowedInstance>(&query)
            .bind(LoanStatus::OnLoan)
            .bind(borrower_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((loans, total))
    }

    async fn all_borrowed(&self) -> AppResult<Vec<BorrowedInstance>> {
        let query = format!(
            r#"
            SELECT {}
            FROM book_instances bi
            JOIN books b ON b.id = bi.book_id
            WHERE bi.status = $1
            ORDER BY bi.due_back ASC, bi.id
            "#,
            BORROWED_COLUMNS
        );
        let loans = sqlx::query_as::<_, BorrowedInstance>(&query)
            .bind(LoanStatus::OnLoan)
            .fetch_all(&self.pool)
            .await?;

        Ok(loans)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_by_status(&self, status: LoanStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

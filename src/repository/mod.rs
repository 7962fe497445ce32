//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod instances;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::error::AppResult;

pub use authors::{AuthorsRepository, PgAuthorsRepository};
pub use books::{BooksRepository, PgBooksRepository};
pub use instances::{InstancesRepository, PgInstancesRepository};

/// Connectivity check used by the readiness endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Probe: Send + Sync {
    async fn ping(&self) -> AppResult<()>;
}

#[derive(Clone)]
pub struct PgProbe {
    pool: Pool<Postgres>,
}

#[async_trait]
impl Probe for PgProbe {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Main repository struct holding one handle per table group
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BooksRepository>,
    pub authors: Arc<dyn AuthorsRepository>,
    pub instances: Arc<dyn InstancesRepository>,
    pub probe: Arc<dyn Probe>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(PgBooksRepository::new(pool.clone())),
            authors: Arc::new(PgAuthorsRepository::new(pool.clone())),
            instances: Arc::new(PgInstancesRepository::new(pool.clone())),
            probe: Arc::new(PgProbe { pool }),
        }
    }

    /// Assemble a repository from individual backends
    pub fn from_parts(
        books: Arc<dyn BooksRepository>,
        authors: Arc<dyn AuthorsRepository>,
        instances: Arc<dyn InstancesRepository>,
        probe: Arc<dyn Probe>,
    ) -> Self {
        Self {
            books,
            authors,
            instances,
            probe,
        }
    }
}

//! Dashboard counts

use crate::{
    error::AppResult,
    models::{CatalogSummary, LoanStatus},
    repository::Repository,
};

/// Title fragment counted on the home page
pub const FEATURED_TITLE: &str = "Harry Potter";

#[derive(Clone)]
pub struct SummaryService {
    repository: Repository,
}

impl SummaryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Compute every count afresh; the queries are independent and run concurrently
    pub async fn summary(&self) -> AppResult<CatalogSummary> {
        let repo = &self.repository;

        let (num_books, num_instances, num_instances_available, num_authors, num_harrypotter_books) =
            tokio::try_join!(
                repo.books.count(),
                repo.instances.count(),
                repo.instances.count_by_status(LoanStatus::Available),
                repo.authors.count(),
                repo.books.count_title_contains(FEATURED_TITLE),
            )?;

        let summary = CatalogSummary {
            num_books,
            num_instances,
            num_instances_available,
            num_authors,
            num_harrypotter_books,
        };
        tracing::debug!(?summary, "Catalog summary computed");

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        repository::{
            authors::MockAuthorsRepository, books::MockBooksRepository,
            instances::MockInstancesRepository, MockProbe,
        },
    };
    use std::sync::Arc;

    fn repository(
        books: MockBooksRepository,
        authors: MockAuthorsRepository,
        instances: MockInstancesRepository,
    ) -> Repository {
        Repository::from_parts(
            Arc::new(books),
            Arc::new(authors),
            Arc::new(instances),
            Arc::new(MockProbe::new()),
        )
    }

    #[tokio::test]
    async fn counts_two_books_three_copies() {
        let mut books = MockBooksRepository::new();
        books.expect_count().returning(|| Ok(2));
        books
            .expect_count_title_contains()
            .withf(|needle| needle == "Harry Potter")
            .returning(|_| Ok(0));

        let mut authors = MockAuthorsRepository::new();
        authors.expect_count().returning(|| Ok(1));

        let mut instances = MockInstancesRepository::new();
        instances.expect_count().returning(|| Ok(3));
        instances
            .expect_count_by_status()
            .withf(|status| *status == LoanStatus::Available)
            .returning(|_| Ok(2));

        let service = SummaryService::new(repository(books, authors, instances));
        let summary = service.summary().await.unwrap();

        assert_eq!(
            summary,
            CatalogSummary {
                num_books: 2,
                num_instances: 3,
                num_instances_available: 2,
                num_authors: 1,
                num_harrypotter_books: 0,
            }
        );
        assert!(summary.num_instances_available <= summary.num_instances);
        assert!(summary.num_harrypotter_books <= summary.num_books);
    }

    #[tokio::test]
    async fn any_failing_count_fails_the_summary() {
        let mut books = MockBooksRepository::new();
        books.expect_count().returning(|| Ok(2));
        books.expect_count_title_contains().returning(|_| Ok(0));

        let mut authors = MockAuthorsRepository::new();
        authors
            .expect_count()
            .returning(|| Err(AppError::Internal("connection reset".to_string())));

        let mut instances = MockInstancesRepository::new();
        instances.expect_count().returning(|| Ok(3));
        instances.expect_count_by_status().returning(|_| Ok(2));

        let service = SummaryService::new(repository(books, authors, instances));
        assert!(service.summary().await.is_err());
    }
}

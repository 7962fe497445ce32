//! Loan listings: a reader's own loans and, for librarians, all of them

use crate::{
    config::CatalogConfig,
    error::AppResult,
    models::{BorrowedInstance, Page, PageQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    config: CatalogConfig,
}

impl LoansService {
    pub fn new(repository: Repository, config: CatalogConfig) -> Self {
        Self { repository, config }
    }

    /// Copies on loan to `user_id`, soonest due first
    pub async fn borrowed_by_user(
        &self,
        user_id: i32,
        query: &PageQuery,
    ) -> AppResult<Page<BorrowedInstance>> {
        let request = query.with_size(self.config.loans_per_page);
        let (loans, total) = self.repository.instances.borrowed_by(user_id, request).await?;
        Ok(Page::new(loans, total, request))
    }

    /// Every copy on loan, soonest due first.
    ///
    /// Callers must have passed the librarian permission check.
    pub async fn all_borrowed(&self) -> AppResult<Vec<BorrowedInstance>> {
        self.repository.instances.all_borrowed().await
    }
}

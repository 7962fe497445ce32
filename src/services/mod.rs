//! Business logic services

pub mod catalog;
pub mod loans;
pub mod sessions;
pub mod summary;
pub mod visits;

use std::sync::Arc;

use crate::{config::CatalogConfig, error::AppResult, repository::Repository};

use self::sessions::SessionStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub summary: summary::SummaryService,
    pub visits: visits::VisitCounter,
    repository: Repository,
    sessions: Arc<dyn SessionStore>,
}

impl Services {
    /// Create all services with the given repository and session store
    pub fn new(
        repository: Repository,
        sessions: Arc<dyn SessionStore>,
        catalog_config: CatalogConfig,
    ) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone(), catalog_config.clone()),
            loans: loans::LoansService::new(repository.clone(), catalog_config),
            summary: summary::SummaryService::new(repository.clone()),
            visits: visits::VisitCounter::new(sessions.clone()),
            repository,
            sessions,
        }
    }

    /// Check that both the database and the session store answer
    pub async fn ping(&self) -> AppResult<()> {
        tokio::try_join!(self.repository.probe.ping(), self.sessions.ping())?;
        Ok(())
    }
}

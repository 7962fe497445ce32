//! Dashboard counts

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Catalog-wide counts shown on the home page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CatalogSummary {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    /// Books whose title contains "Harry Potter"
    pub num_harrypotter_books: i64,
}

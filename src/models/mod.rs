//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;
pub mod pagination;
pub mod summary;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorDetails};
pub use book::{Book, BookDetails, BookShort};
pub use book_instance::{BookInstance, BorrowedInstance, LoanStatus};
pub use genre::Genre;
pub use pagination::{Page, PageQuery, PageRequest};
pub use summary::CatalogSummary;
pub use user::{Caller, UserClaims};

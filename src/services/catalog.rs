//! Catalog browsing service

use crate::{
    config::CatalogConfig,
    error::AppResult,
    models::{Author, AuthorDetails, BookDetails, BookShort, Page, PageQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(repository: Repository, config: CatalogConfig) -> Self {
        Self { repository, config }
    }

    /// List books ordered by title
    pub async fn list_books(&self, query: &PageQuery) -> AppResult<Page<BookShort>> {
        let request = query.with_size(self.config.books_per_page);
        let (books, total) = self.repository.books.list(request).await?;
        Ok(Page::new(books, total, request))
    }

    /// Get a book with its author, genres and copies
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;

        let author = async {
            match book.author_id {
                Some(author_id) => self.repository.authors.get_by_id(author_id).await.map(Some),
                None => Ok(None),
            }
        };
        let (author, genres, instances) = tokio::try_join!(
            author,
            self.repository.books.genres(id),
            self.repository.instances.for_book(id),
        )?;

        Ok(BookDetails {
            book,
            author,
            genres,
            instances,
        })
    }

    /// List authors ordered by name
    pub async fn list_authors(&self, query: &PageQuery) -> AppResult<Page<Author>> {
        let request = query.with_size(self.config.authors_per_page);
        let (authors, total) = self.repository.authors.list(request).await?;
        Ok(Page::new(authors, total, request))
    }

    /// Get an author with their books
    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.books.by_author(id).await?;
        Ok(AuthorDetails { author, books })
    }
}

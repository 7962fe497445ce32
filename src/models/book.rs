//! Book (catalog title) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{author::Author, book_instance::BookInstance, genre::Genre};

/// Full book model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub summary: String,
    /// 13 character ISBN
    pub isbn: String,
    pub author_id: Option<i32>,
}

/// Short book representation for lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    /// "last, first" of the author, when known
    pub author_name: Option<String>,
}

/// Book with its author, genres and copies
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
    pub instances: Vec<BookInstance>,
}

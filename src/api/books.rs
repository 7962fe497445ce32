//! Book endpoints

use axum::{
    extract::{OriginalUri, Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    access::AccessPolicy,
    error::{AppError, AppResult},
    models::{BookDetails, BookShort, Caller, Page, PageQuery},
};

/// List books, five per page
#[utoipa::path(
    get,
    path = "/catalog/books",
    tag = "books",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "One page of books ordered by title", body = Page<BookShort>),
        (status = 302, description = "Not logged in, redirected to the login page")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    caller: Caller,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<BookShort>>> {
    state.enforce(AccessPolicy::LoginRequired, &caller, &uri)?;

    let books = state.services.catalog.list_books(&query).await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/catalog/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book with author, genres and copies", body = BookDetails),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<BookDetails>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

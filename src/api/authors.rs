//! Author endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorDetails, Page, PageQuery},
};

/// List authors, five per page
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "authors",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of authors ordered by name", body = Page<Author>)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<Author>>> {
    let authors = state.services.catalog.list_authors(&query).await?;
    Ok(Json(authors))
}

/// Get author details by ID
#[utoipa::path(
    get,
    path = "/catalog/authors/{id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author with their books", body = AuthorDetails),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<AuthorDetails>> {
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(author))
}

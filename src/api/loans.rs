//! Loan listing endpoints

use axum::{
    extract::{OriginalUri, Query, State},
    Json,
};

use crate::{
    access::{AccessPolicy, CAN_MARK_RETURNED},
    error::{AppError, AppResult},
    models::{BorrowedInstance, Caller, Page, PageQuery},
};

/// List the copies borrowed by the current user
#[utoipa::path(
    get,
    path = "/catalog/mybooks",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Caller's loans, soonest due first", body = Page<BorrowedInstance>),
        (status = 302, description = "Not logged in, redirected to the login page")
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    caller: Caller,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<BorrowedInstance>>> {
    state.enforce(AccessPolicy::LoginRequired, &caller, &uri)?;
    let user_id = caller
        .user_id()
        .ok_or_else(|| AppError::Internal("Authenticated caller without user id".to_string()))?;

    let loans = state.services.loans.borrowed_by_user(user_id, &query).await?;
    Ok(Json(loans))
}

/// List every borrowed copy with its borrower (librarians only)
#[utoipa::path(
    get,
    path = "/catalog/borrowed",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All loans, soonest due first", body = Vec<BorrowedInstance>),
        (status = 302, description = "Not logged in, redirected to the login page"),
        (status = 403, description = "Missing catalog.can_mark_returned", body = crate::error::ErrorResponse)
    )
)]
pub async fn all_loans(
    State(state): State<crate::AppState>,
    caller: Caller,
    OriginalUri(uri): OriginalUri,
) -> AppResult<Json<Vec<BorrowedInstance>>> {
    state.enforce(AccessPolicy::PermissionRequired(CAN_MARK_RETURNED), &caller, &uri)?;

    let loans = state.services.loans.all_borrowed().await?;
    Ok(Json(loans))
}

//! Catalog home page

use axum::{
    extract::{OriginalUri, State},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    access::AccessPolicy,
    error::AppResult,
    models::Caller,
    services::sessions::SessionId,
};

/// Home page counts
#[derive(Debug, Serialize, ToSchema)]
pub struct IndexResponse {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_harrypotter_books: i64,
    /// Visits to this page earlier in the session
    pub num_visits: i64,
}

/// Reuse the session named by the cookie, or start one and set the cookie
fn session_from(jar: CookieJar, cookie_name: &str) -> (SessionId, CookieJar) {
    if let Some(session) = jar.get(cookie_name).and_then(|c| SessionId::parse(c.value())) {
        return (session, jar);
    }

    let session = SessionId::generate();
    let cookie = Cookie::build((cookie_name.to_string(), session.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    tracing::debug!(%session, "Starting new session");
    (session, jar.add(cookie))
}

/// Home page: catalog counts and the session visit counter
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "catalog",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Catalog counts", body = IndexResponse),
        (status = 302, description = "Not logged in, redirected to the login page")
    )
)]
pub async fn index(
    State(state): State<crate::AppState>,
    caller: Caller,
    OriginalUri(uri): OriginalUri,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<IndexResponse>)> {
    state.enforce(AccessPolicy::LoginRequired, &caller, &uri)?;

    let (session, jar) = session_from(jar, &state.config.session.cookie_name);

    // A failed count must not record a visit
    let summary = state.services.summary.summary().await?;
    let num_visits = state.services.visits.increment(&session).await?;

    Ok((
        jar,
        Json(IndexResponse {
            num_books: summary.num_books,
            num_instances: summary.num_instances,
            num_instances_available: summary.num_instances_available,
            num_authors: summary.num_authors,
            num_harrypotter_books: summary.num_harrypotter_books,
            num_visits,
        }),
    ))
}

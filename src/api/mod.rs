//! API handlers for the catalog REST endpoints

pub mod authors;
pub mod books;
pub mod catalog;
pub mod health;
pub mod loans;
pub mod openapi;

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::get,
    Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    models::{Caller, UserClaims},
    AppState,
};

/// Identify the caller from the bearer token.
///
/// No token, or one that fails validation, means an anonymous caller; the
/// access policy of each view decides what that implies.
#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let bearer =
            match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
                Ok(TypedHeader(Authorization(bearer))) => bearer,
                Err(_) => return Ok(Caller::Anonymous),
            };

        match UserClaims::from_token(bearer.token(), &state.config.auth.jwt_secret) {
            Ok(claims) => Ok(Caller::User(claims)),
            Err(e) => {
                tracing::debug!("Ignoring invalid bearer token: {}", e);
                Ok(Caller::Anonymous)
            }
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Home page
        .route("/catalog", get(catalog::index))
        // Books
        .route("/catalog/books", get(books::list_books))
        .route("/catalog/books/:id", get(books::get_book))
        // Authors
        .route("/catalog/authors", get(authors::list_authors))
        .route("/catalog/authors/:id", get(authors::get_author))
        // Loans
        .route("/catalog/mybooks", get(loans::my_loans))
        .route("/catalog/borrowed", get(loans::all_loans))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

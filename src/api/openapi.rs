//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, catalog, health, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local Library API",
        version = "1.0.0",
        description = "Book catalog and loans REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Home page
        catalog::index,
        // Books
        books::list_books,
        books::get_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        // Loans
        loans::my_loans,
        loans::all_loans,
    ),
    components(
        schemas(
            catalog::IndexResponse,
            crate::models::Book,
            crate::models::BookShort,
            crate::models::BookDetails,
            crate::models::Author,
            crate::models::AuthorDetails,
            crate::models::Genre,
            crate::models::BookInstance,
            crate::models::BorrowedInstance,
            crate::models::LoanStatus,
            crate::models::PageQuery,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Catalog home page"),
        (name = "books", description = "Book listing and details"),
        (name = "authors", description = "Author listing and details"),
        (name = "loans", description = "Borrowed copies")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by gated paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_catalog_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/ready",
            "/catalog",
            "/catalog/books",
            "/catalog/books/{id}",
            "/catalog/authors",
            "/catalog/authors/{id}",
            "/catalog/mybooks",
            "/catalog/borrowed",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}

//! Local Library catalog server
//!
//! A REST JSON API listing books, authors and loanable copies, with
//! login-only and librarian-only views.

use std::sync::Arc;

use axum::http::Uri;

pub mod access;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use access::AccessPolicy;
use models::Caller;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Apply `policy` to `caller` for the request addressed to `uri`
    pub fn enforce(&self, policy: AccessPolicy, caller: &Caller, uri: &Uri) -> AppResult<()> {
        let requested = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());
        policy.enforce(caller, requested, &self.config.auth.login_url)
    }
}

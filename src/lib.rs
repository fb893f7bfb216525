//! Datadeck — authenticated tabular upload service.
//!
//! Library crate so the integration tests in `tests/` can drive the full
//! router against an in-memory store.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod errors;
pub mod files;
pub mod store;

use auth::credentials::CredentialStore;
use auth::token::TokenIssuer;
use files::FileController;

/// Shared application state passed to handlers and middleware.
pub struct AppState {
    pub accounts: CredentialStore,
    pub files: FileController,
    pub tokens: TokenIssuer,
    pub config: config::Config,
}

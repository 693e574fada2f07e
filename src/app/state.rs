//! Application state management.
//!
//! This module provides the shared application state that is
//! accessible to all request handlers via Axum's State extractor.

use std::sync::Arc;

use secrecy::SecretString;

use crate::domain::DatabaseClient;

use super::service::UserService;

/// Shared application state for the Axum web server.
///
/// Immutable after construction; the only shared resource behind it is
/// the service's database client and its connection pool.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
///
/// let db = Arc::new(PostgresClient::new(&database_url, PostgresConfig::default()).await?);
/// let state = AppState::new(db, SecretString::from("SECRET"));
///
/// let router = create_router(Arc::new(state));
/// ```
#[derive(Clone)]
pub struct AppState {
    /// The application service containing business logic.
    pub service: Arc<UserService>,

    /// Shared secret expected in the `X-API-KEY` header.
    pub api_auth_key: SecretString,
}

impl AppState {
    /// Creates a new `AppState`, wiring a `UserService` to `db_client`.
    #[must_use]
    pub fn new(db_client: Arc<dyn DatabaseClient>, api_auth_key: SecretString) -> Self {
        let service = Arc::new(UserService::new(db_client));

        Self {
            service,
            api_auth_key,
        }
    }
}

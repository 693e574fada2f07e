//! Users API
//!
//! A small CRUD HTTP API for a single `user` resource, built from
//! trait-based layers so that every layer can be tested in isolation.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   API Layer                  │
//! │  API key gate, handlers, error translation   │
//! ├─────────────────────────────────────────────┤
//! │               Application Layer              │
//! │   Use cases, validation, transaction scope   │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │         Traits, types, error hierarchy       │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │      PostgreSQL adapter, logging setup       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Every request flows through the same pipeline: the API key gate, JSON
//! decoding, payload validation, one transaction around the repository
//! calls (committed on success, rolled back on failure), and finally the
//! `{code, status, data}` envelope. Failures travel as [`domain::AppError`]
//! and are turned into responses in exactly one place.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use secrecy::SecretString;
//! use users_api::api::create_router;
//! use users_api::app::AppState;
//! use users_api::infra::{PostgresClient, PostgresConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = Arc::new(PostgresClient::new(&database_url, PostgresConfig::default()).await?);
//!     let state = Arc::new(AppState::new(db, SecretString::from(api_key)));
//!
//!     let router = create_router(state);
//!     axum::serve(listener, router).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

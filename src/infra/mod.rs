//! Infrastructure layer implementations.

pub mod database;
pub mod observability;

pub use database::{PostgresClient, PostgresConfig, PostgresUnitOfWork};
pub use observability::{LogFormat, init_tracing};

//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::error::AppError;
use super::types::{User, UserId};

/// Data access for the `users` table.
///
/// Implementations are bound to one open transaction; every call runs
/// inside it and none of them commits.
#[async_trait]
pub trait UserRepository: Send {
    /// Insert a new row and return `user` with the storage-assigned id.
    async fn save(&mut self, user: User) -> Result<User, AppError>;

    /// Overwrite the name of the row matching `user.id`.
    ///
    /// Touching zero rows is not an error at this layer.
    async fn update(&mut self, user: User) -> Result<User, AppError>;

    /// Remove the row matching `id`, if any.
    async fn delete(&mut self, id: UserId) -> Result<(), AppError>;

    /// `Ok(None)` when no row matches.
    async fn find_by_id(&mut self, id: UserId) -> Result<Option<User>, AppError>;

    /// Every row, in storage scan order.
    async fn find_all(&mut self) -> Result<Vec<User>, AppError>;
}

/// An open transaction exposing the repository operations.
///
/// Resolved exactly once by `commit` or `rollback`; dropping it unresolved
/// discards its writes.
#[async_trait]
pub trait UnitOfWork: UserRepository {
    async fn commit(self: Box<Self>) -> Result<(), AppError>;

    async fn rollback(self: Box<Self>) -> Result<(), AppError>;
}

/// Database client trait for connectivity and transaction management.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Check database connectivity
    async fn health_check(&self) -> Result<(), AppError>;

    /// Open a new transaction on a pooled connection.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError>;
}

//! PostgreSQL database client implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

use crate::domain::{
    AppError, DatabaseClient, DatabaseError, UnitOfWork, User, UserId, UserRepository,
};

/// PostgreSQL connection pool configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            max_connections: 20,
            min_connections: 5,
            acquire_timeout: Duration::from_secs(3),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(3600),
        }
    }
}

/// PostgreSQL database client with connection pooling
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client with custom configuration
    pub async fn new(database_url: &str, config: PostgresConfig) -> Result<Self, AppError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Get the underlying connection pool (for testing)
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        Ok(())
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PostgresUnitOfWork { tx }))
    }
}

/// Repository operations bound to one open PostgreSQL transaction.
///
/// Dropping it without `commit` rolls the transaction back.
pub struct PostgresUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl PostgresUnitOfWork {
    fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, AppError> {
        Ok(User {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            occupation: row.try_get("occupation")?,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUnitOfWork {
    #[instrument(skip(self, user))]
    async fn save(&mut self, user: User) -> Result<User, AppError> {
        let row = sqlx::query("INSERT INTO users (name, occupation) VALUES ($1, $2) RETURNING id")
            .bind(&user.name)
            .bind(&user.occupation)
            .fetch_one(&mut *self.tx)
            .await?;

        let id: UserId = row.try_get("id")?;
        Ok(user.with_id(id))
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    async fn update(&mut self, user: User) -> Result<User, AppError> {
        sqlx::query("UPDATE users SET name = $1 WHERE id = $2")
            .bind(&user.name)
            .bind(user.id)
            .execute(&mut *self.tx)
            .await?;

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete(&mut self, id: UserId) -> Result<(), AppError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&mut self, id: UserId) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT id, name, occupation FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&mut self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query("SELECT id, name, occupation FROM users")
            .fetch_all(&mut *self.tx)
            .await?;

        rows.iter().map(Self::row_to_user).collect()
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_config() {
        let config = PostgresConfig::default();
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 5);
        assert_eq!(config.acquire_timeout, Duration::from_secs(3));
        assert_eq!(config.idle_timeout, Duration::from_secs(600));
        assert_eq!(config.max_lifetime, Duration::from_secs(3600));
    }

    #[tokio::test]
    async fn test_connect_to_unreachable_database_fails() {
        let config = PostgresConfig {
            acquire_timeout: Duration::from_millis(200),
            min_connections: 0,
            ..PostgresConfig::default()
        };

        let result = PostgresClient::new("postgres://nobody@127.0.0.1:1/none", config).await;

        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::Connection(_)))
        ));
    }
}

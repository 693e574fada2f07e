//! Mock implementations for testing.
//!
//! These mocks provide in-memory implementations of domain traits
//! that can be configured to simulate various scenarios including
//! success, failure, and edge cases.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::domain::{
    AppError, DatabaseClient, DatabaseError, UnitOfWork, User, UserId, UserRepository,
};

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, operations will fail.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
    /// Simulated latency in milliseconds.
    pub latency_ms: Option<u64>,
}

impl MockConfig {
    /// Creates a config that always succeeds.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that always fails.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
            latency_ms: None,
        }
    }

    /// Adds simulated latency.
    #[must_use]
    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }
}

/// Committed contents of the mock `users` table.
///
/// `next_id` behaves like a database sequence: ids handed out to a
/// transaction are never reused, even if it rolls back.
#[derive(Debug, Clone, Default)]
struct Table {
    rows: BTreeMap<UserId, User>,
    next_id: UserId,
}

impl Table {
    fn take_id(&mut self) -> UserId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn apply(&mut self, change: Change) {
        match change {
            Change::Insert(user) => {
                self.rows.insert(user.id, user);
            }
            Change::Rename { id, name } => {
                if let Some(row) = self.rows.get_mut(&id) {
                    row.name = name;
                }
            }
            Change::Delete(id) => {
                self.rows.remove(&id);
            }
        }
    }
}

/// A write recorded by a transaction, replayed onto the table on commit.
#[derive(Debug, Clone)]
enum Change {
    Insert(User),
    Rename { id: UserId, name: String },
    Delete(UserId),
}

#[derive(Default)]
struct Counters {
    begun: AtomicU64,
    committed: AtomicU64,
    rolled_back: AtomicU64,
}

/// Mock database client for testing.
///
/// Each transaction reads from a snapshot taken when it began plus its own
/// writes. On commit only those writes are replayed onto the shared table,
/// so overlapping transactions keep each other's changes and the last
/// rename of a row wins. Rollbacks and dropped transactions leave no trace.
/// Ids are assigned from 1 upward and rows come back in id order.
///
/// # Example
///
/// ```
/// use users_api::test_utils::{MockConfig, MockDatabaseClient};
///
/// // Create a mock that succeeds
/// let mock = MockDatabaseClient::new();
///
/// // Create a mock that fails
/// let failing_mock = MockDatabaseClient::with_config(MockConfig::failure("DB error"));
/// ```
pub struct MockDatabaseClient {
    table: Arc<Mutex<Table>>,
    config: MockConfig,
    counters: Arc<Counters>,
    is_healthy: AtomicBool,
}

impl MockDatabaseClient {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    /// Creates a new mock with the given configuration.
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            table: Arc::new(Mutex::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            })),
            config,
            counters: Arc::new(Counters::default()),
            is_healthy: AtomicBool::new(true),
        }
    }

    /// Creates a mock that always fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Sets the health status.
    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Inserts a row directly, bypassing transactions.
    pub fn insert(&self, user: User) -> User {
        let mut table = lock(&self.table);
        let stored = user.with_id(table.take_id());
        table.rows.insert(stored.id, stored.clone());
        stored
    }

    /// Gets all committed users in id order.
    pub fn get_all_users(&self) -> Vec<User> {
        lock(&self.table).rows.values().cloned().collect()
    }

    /// Number of transactions opened so far.
    pub fn begun_count(&self) -> u64 {
        self.counters.begun.load(Ordering::Relaxed)
    }

    pub fn committed_count(&self) -> u64 {
        self.counters.committed.load(Ordering::Relaxed)
    }

    pub fn rolled_back_count(&self) -> u64 {
        self.counters.rolled_back.load(Ordering::Relaxed)
    }

    fn check_should_fail(&self) -> Result<(), AppError> {
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock database error".to_string());
            return Err(AppError::Database(DatabaseError::Query(msg)));
        }
        Ok(())
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn health_check(&self) -> Result<(), AppError> {
        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(AppError::Database(DatabaseError::Connection(
                "Mock database unhealthy".to_string(),
            )));
        }

        self.check_should_fail()
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        self.check_should_fail()?;
        if let Some(ms) = self.config.latency_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        self.counters.begun.fetch_add(1, Ordering::Relaxed);
        let snapshot = lock(&self.table).rows.clone();
        Ok(Box::new(MockUnitOfWork {
            table: Arc::clone(&self.table),
            counters: Arc::clone(&self.counters),
            view: snapshot,
            changes: Vec::new(),
        }))
    }
}

/// A transaction over a private snapshot of the mock table.
pub struct MockUnitOfWork {
    table: Arc<Mutex<Table>>,
    counters: Arc<Counters>,
    view: BTreeMap<UserId, User>,
    changes: Vec<Change>,
}

impl MockUnitOfWork {
    fn record(&mut self, change: Change) {
        match &change {
            Change::Insert(user) => {
                self.view.insert(user.id, user.clone());
            }
            Change::Rename { id, name } => {
                if let Some(row) = self.view.get_mut(id) {
                    row.name = name.clone();
                }
            }
            Change::Delete(id) => {
                self.view.remove(id);
            }
        }
        self.changes.push(change);
    }
}

#[async_trait]
impl UserRepository for MockUnitOfWork {
    async fn save(&mut self, user: User) -> Result<User, AppError> {
        let id = lock(&self.table).take_id();
        let stored = user.with_id(id);
        self.record(Change::Insert(stored.clone()));
        Ok(stored)
    }

    async fn update(&mut self, user: User) -> Result<User, AppError> {
        self.record(Change::Rename {
            id: user.id,
            name: user.name.clone(),
        });
        Ok(user)
    }

    async fn delete(&mut self, id: UserId) -> Result<(), AppError> {
        self.record(Change::Delete(id));
        Ok(())
    }

    async fn find_by_id(&mut self, id: UserId) -> Result<Option<User>, AppError> {
        Ok(self.view.get(&id).cloned())
    }

    async fn find_all(&mut self) -> Result<Vec<User>, AppError> {
        Ok(self.view.values().cloned().collect())
    }
}

#[async_trait]
impl UnitOfWork for MockUnitOfWork {
    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let this = *self;
        {
            let mut table = lock(&this.table);
            for change in this.changes {
                table.apply(change);
            }
        }
        this.counters.committed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        self.counters.rolled_back.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

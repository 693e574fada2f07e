//! Application service layer.
//!
//! This module contains the user use cases. Each one validates its input
//! up front and then runs its whole body inside a single transaction.

use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::Validate;

use super::transaction::in_transaction;
use crate::domain::{
    AppError, CreateUserRequest, DatabaseClient, UpdateUserRequest, User, UserId, UserResponse,
    ValidationError,
};

/// Application service containing the user use cases.
///
/// # Example
///
/// ```ignore
/// let db = Arc::new(PostgresClient::new(&database_url, PostgresConfig::default()).await?);
/// let service = UserService::new(db);
///
/// let user = service.create(CreateUserRequest::new("John", "student")).await?;
/// ```
pub struct UserService {
    db_client: Arc<dyn DatabaseClient>,
}

impl UserService {
    #[must_use]
    pub fn new(db_client: Arc<dyn DatabaseClient>) -> Self {
        Self { db_client }
    }

    /// Validates the payload and inserts a new user.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every invalid field, or the
    /// storage error if the insert fails.
    #[instrument(skip(self, request))]
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserResponse, AppError> {
        validate(&request)?;

        let user = User::new(request.name, request.occupation);
        let saved = in_transaction(self.db_client.as_ref(), move |tx| {
            Box::pin(async move { tx.save(user).await })
        })
        .await?;

        info!(user_id = saved.id, "User created");
        Ok(UserResponse::from(saved))
    }

    /// Renames an existing user. `request.id` must already hold the route id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an invalid payload and a not-found
    /// error when no user has that id.
    #[instrument(skip(self, request), fields(user_id = request.id))]
    pub async fn update(&self, request: UpdateUserRequest) -> Result<UserResponse, AppError> {
        validate(&request)?;

        let updated = in_transaction(self.db_client.as_ref(), move |tx| {
            Box::pin(async move {
                let mut user = tx
                    .find_by_id(request.id)
                    .await?
                    .ok_or_else(|| user_not_found(request.id))?;
                user.name = request.name;
                tx.update(user).await
            })
        })
        .await?;

        info!(user_id = updated.id, "User updated");
        Ok(UserResponse::from(updated))
    }

    /// Deletes an existing user.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no user has that id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: UserId) -> Result<(), AppError> {
        in_transaction(self.db_client.as_ref(), move |tx| {
            Box::pin(async move {
                let user = tx
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| user_not_found(id))?;
                tx.delete(user.id).await
            })
        })
        .await?;

        info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Gets a user by ID.
    ///
    /// A miss is raised inside the transaction, so it rolls back like the
    /// other id-scoped operations.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: UserId) -> Result<UserResponse, AppError> {
        let user = in_transaction(self.db_client.as_ref(), move |tx| {
            Box::pin(async move { tx.find_by_id(id).await?.ok_or_else(|| user_not_found(id)) })
        })
        .await?;

        Ok(UserResponse::from(user))
    }

    /// Lists every user in storage order.
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<UserResponse>, AppError> {
        let users = in_transaction(self.db_client.as_ref(), |tx| {
            Box::pin(async move { tx.find_all().await })
        })
        .await?;

        Ok(users.into_iter().map(UserResponse::from).collect())
    }
}

fn validate(request: &impl Validate) -> Result<(), AppError> {
    request.validate().map_err(|e| {
        let err = ValidationError::from(e);
        debug!(error = %err, "Validation failed");
        AppError::Validation(err)
    })
}

fn user_not_found(id: UserId) -> AppError {
    AppError::not_found(format!("user {id}"))
}

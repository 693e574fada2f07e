use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError as FieldRuleError};

/// Storage-assigned identifier of a user row.
pub type UserId = i64;

/// Core domain entity representing a row of the `users` table.
///
/// `id` is `0` until storage assigns one on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub occupation: String,
}

impl User {
    /// A user that has not been persisted yet.
    pub fn new(name: impl Into<String>, occupation: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            occupation: occupation.into(),
        }
    }

    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = id;
        self
    }
}

/// Request payload for creating a new user.
///
/// Absent fields decode as empty strings so that they are reported by
/// validation rather than by the JSON decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "name is required and must be between 1 and 200 characters"
    ))]
    pub name: String,
    #[validate(length(
        min = 1,
        max = 200,
        message = "occupation is required and must be between 1 and 200 characters"
    ))]
    pub occupation: String,
}

impl CreateUserRequest {
    pub fn new(name: impl Into<String>, occupation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            occupation: occupation.into(),
        }
    }
}

/// Request payload for renaming an existing user.
///
/// `id` comes from the route and overwrites anything sent in the body.
/// Occupation is not updatable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateUserRequest {
    #[validate(custom(function = "validate_non_zero_id"))]
    pub id: UserId,
    #[validate(length(
        min = 1,
        max = 200,
        message = "name is required and must be between 1 and 200 characters"
    ))]
    pub name: String,
}

impl UpdateUserRequest {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

fn validate_non_zero_id(id: &UserId) -> Result<(), FieldRuleError> {
    if *id == 0 {
        let mut err = FieldRuleError::new("required");
        err.message = Some("id is required".into());
        return Err(err);
    }
    Ok(())
}

/// Read-facing view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub occupation: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            occupation: user.occupation,
        }
    }
}

/// Uniform envelope wrapped around every response body, success or error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub status: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(code: u16, status: impl Into<String>, data: T) -> Self {
        Self {
            code,
            status: status.into(),
            data,
        }
    }

    /// `200 OK` envelope around `data`.
    pub fn ok(data: T) -> Self {
        Self::new(200, "OK", data)
    }
}

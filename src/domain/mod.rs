//! Domain layer containing core business types, traits, and error definitions.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{AppError, ConfigError, DatabaseError, FieldViolation, ValidationError};
pub use traits::{DatabaseClient, UnitOfWork, UserRepository};
pub use types::{ApiResponse, CreateUserRequest, UpdateUserRequest, User, UserId, UserResponse};

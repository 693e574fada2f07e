//! Application layer containing business logic and shared state.

pub mod service;
pub mod state;
pub mod transaction;

pub use service::UserService;
pub use state::AppState;
pub use transaction::in_transaction;

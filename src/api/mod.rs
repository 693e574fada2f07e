//! The API layer, containing web handlers and routing.

pub mod handlers;
pub mod middleware;
pub mod router;

pub use router::{RouterConfig, create_router, create_router_with_config};

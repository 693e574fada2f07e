//! HTTP routing configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    middleware,
    routing::get,
};
use tower::{ServiceBuilder, timeout::TimeoutLayer, timeout::error::Elapsed};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::app::AppState;
use crate::domain::AppError;

use super::handlers::{
    create_user_handler, delete_user_handler, get_user_handler, list_users_handler,
    update_user_handler,
};
use super::middleware::auth_middleware;

/// Router-level settings
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Upper bound on the whole request, answered with 408 when exceeded
    pub request_timeout: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Create router with default settings
pub fn create_router(app_state: Arc<AppState>) -> Router {
    create_router_with_config(app_state, RouterConfig::default())
}

/// Create router with the given settings
///
/// Every route, including unmatched paths, sits behind the API key gate.
pub fn create_router_with_config(app_state: Arc<AppState>, config: RouterConfig) -> Router {
    let layers = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(HandleErrorLayer::new(handle_layer_error))
        .layer(TimeoutLayer::new(config.request_timeout));

    // User routes
    let user_routes = Router::new()
        .route("/", get(list_users_handler).post(create_user_handler))
        .route(
            "/{userId}",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        );

    Router::new()
        .nest("/api/users", user_routes)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&app_state),
            auth_middleware,
        ))
        .layer(layers)
        .with_state(app_state)
}

/// Turns errors raised by the tower layers into the usual error envelope.
async fn handle_layer_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError::Timeout
    } else {
        AppError::Internal(err.to_string())
    }
}

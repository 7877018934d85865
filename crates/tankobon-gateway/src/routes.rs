//! HTTP route definitions

use crate::{handlers, middleware, ApiError, AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// Create the main router
///
/// Every path other than `/health` reaches the upload function, which
/// dispatches on the method itself.
pub fn create_router(state: Arc<AppState>) -> Router {
    let max_body_size = state.config.max_body_size;
    let rate_limiter = middleware::create_rate_limiter(state.config.rate_limit_rps);
    let trust_forwarded_for = state.config.trust_forwarded_for;

    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .fallback(handlers::upload_function)
        .with_state(state);

    let router = match rate_limiter {
        Some(limiter) => router.layer(axum_middleware::from_fn_with_state(
            middleware::RateLimitState {
                limiter,
                trust_forwarded_for,
            },
            middleware::rate_limit_middleware,
        )),
        None => router,
    };

    router
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(DefaultBodyLimit::max(max_body_size))
}

/// Turn a handler panic into the usual JSON 500
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown error".to_string()
    };

    ApiError::Internal(message).into_response()
}

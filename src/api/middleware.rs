use std::any::Any;
use std::time::Instant;

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};

use crate::api::response;

/// Log method, path, status and latency of every request
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} -> {} ({:?})",
        method,
        path,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}

/// Turn a panic inside a handler into a JSON 500
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        *message
    } else {
        "unknown panic payload"
    };
    log::error!("panic while handling request: {}", detail);

    response::error("Internal server error", StatusCode::INTERNAL_SERVER_ERROR)
}

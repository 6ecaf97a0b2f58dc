use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

use crate::api::handlers;
use crate::api::middleware::{log_requests, panic_response};
use crate::store::traits::ContactStore;

pub const API_PREFIX: &str = "/api";

/// Contact routes without the prefix or middleware
pub fn contact_routes<S: ContactStore + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route(
            "/contacts",
            get(handlers::list_contacts_page::<S>).post(handlers::create_contact::<S>),
        )
        .route("/contacts/all", get(handlers::list_all_contacts::<S>))
        .route(
            "/contacts/:id",
            get(handlers::get_contact::<S>)
                .put(handlers::update_contact::<S>)
                .delete(handlers::delete_contact::<S>),
        )
}

/// Full application router: routes nested under `/api`, wrapped in request
/// logging with panic recovery outermost. Unknown paths and methods get the
/// JSON error envelope too.
pub fn create_router<S: ContactStore + 'static>(store: Arc<S>) -> Router {
    let router = Router::new()
        .nest(API_PREFIX, contact_routes::<S>())
        .fallback(handlers::route_not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .with_state(store);

    with_middleware(router)
}

pub fn with_middleware(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(middleware::from_fn(log_requests)),
    )
}

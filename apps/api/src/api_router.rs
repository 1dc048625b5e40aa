use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};


pub fn build_router(app_state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/api/facts/{fact_id}/access",
            get(handlers::facts::list_fact_access_handler),
        )
        .route(
            "/api/facts/{fact_id}/access/{subject_id}",
            post(handlers::facts::grant_fact_access_handler),
        )
        .route_layer(from_fn(middleware::require_caller));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

//! Route configuration.

use crate::handlers;
use crate::metrics::{metrics_handler, track_api_errors};
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/products",
            post(handlers::create_product).get(handlers::list_products),
        )
        .route(
            "/products/{term}",
            get(handlers::get_product)
                .patch(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/files/product", post(handlers::upload_product_image))
        .route(
            "/files/product/{image_name}",
            get(handlers::get_product_image),
        )
        .route("/seed", get(handlers::run_seed))
        // Health check (unauthenticated for load balancers/k8s probes)
        .route("/health", get(handlers::health_check));

    let mut router = Router::new().nest("/api", api_routes);

    // SECURITY: when enabled, /metrics must be network-restricted to the
    // Prometheus scraper.
    if state.config.server.metrics_enabled {
        router = router.route("/metrics", get(metrics_handler));
    }

    let body_limit = state.config.server.max_upload_bytes;

    // Order of execution: TraceLayer -> error tracking -> body limit -> Handler
    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            track_api_errors,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

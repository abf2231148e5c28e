use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Users and their ratings
        .route("/users", get(handlers::list_users))
        .route("/users/:user/ratings", get(handlers::get_ratings))
        .route("/users/:user/ratings/:item", put(handlers::put_rating))
        // Recommendations
        .route("/users/:user/recommendations", get(handlers::get_recommendations))
        .route("/users/:user/neighbors", get(handlers::get_neighbors))
        .route("/similarity/:user_a/:user_b", get(handlers::get_similarity))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

use axum::{middleware as axum_middleware, routing::get, Extension, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database::DynTaskRepository;
use crate::handlers::{health, profile, tasks};
use crate::middleware::jwt_auth_middleware;

/// Build the application router around a task repository.
pub fn app(repo: DynTaskRepository) -> Router {
    let protected = Router::new()
        .route("/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/tasks/:id",
            get(tasks::retrieve)
                .put(tasks::replace)
                .patch(tasks::modify)
                .delete(tasks::destroy),
        )
        .route("/api/me", get(profile::me))
        .route_layer(axum_middleware::from_fn(jwt_auth_middleware));

    Router::new()
        // Public
        .route("/health", get(health::health))
        // Protected API
        .merge(protected)
        // Global middleware
        .layer(Extension(repo))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

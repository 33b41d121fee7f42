//! HTTP routes

pub mod flipbook;
pub mod health;
pub mod upload;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::StorageBackend;
use crate::state::AppState;

/// Build the full application router.
///
/// Local-backend deployments additionally serve the raw page images as
/// static files under `/uploads`.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .merge(health::router())
        .nest("/upload", upload::router())
        .nest("/flipbook", flipbook::router());

    if state.config().storage.backend == StorageBackend::Local {
        router = router.nest_service(
            "/uploads",
            ServeDir::new(&state.config().storage.uploads_dir),
        );
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

//! HTTP boundary: the polling API consumed by the front end.

mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Extension};
use axum::routing::{get, post};
use axum::Router;
use prospector_engine::JobController;

/// Uploads above this size are rejected outright.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppContext {
    pub controller: Arc<JobController>,
    pub uploads_dir: PathBuf,
    pub results_dir: PathBuf,
}

/// Build the application router.
pub fn build_router(context: AppContext) -> Router {
    Router::new()
        .route("/health", get(routes::health_handler))
        .route("/upload", post(routes::upload_handler))
        .route("/start", post(routes::start_handler))
        .route("/stop", post(routes::stop_handler))
        .route("/status", get(routes::status_handler))
        .route("/download/:filename", get(routes::download_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(Extension(context))
}

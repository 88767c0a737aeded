//! Router construction.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;

use crate::state::AppState;
use crate::web::middleware::request_id::RequestIdLayer;
use crate::web::middleware::security_headers::SecurityHeadersLayer;
use crate::web::{pages, status};

/// Creates the web server router.
///
/// No request timeout layer: an extraction run waits on the model for as long
/// as it takes.
pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new().route("/health", get(status::health));

    Router::new()
        .route("/", get(pages::index))
        .route("/login", post(pages::login))
        .route("/logout", post(pages::logout))
        .route("/extract", post(pages::extract))
        .route("/filter", post(pages::filter))
        .route("/export.csv", get(pages::export))
        .route("/static/app.css", get(pages::stylesheet))
        .nest("/api", api_router)
        .with_state(app_state)
        .layer((
            // Outermost: per-request ID span + severity-proportional response logging.
            RequestIdLayer,
            SecurityHeadersLayer,
            CompressionLayer::new()
                .zstd(true)
                .br(true)
                .gzip(true)
                .quality(tower_http::CompressionLevel::Fastest),
        ))
}

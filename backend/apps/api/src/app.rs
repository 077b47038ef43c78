//! Router assembly
//!
//! Mounts the auth routes under `/api/auth`, the health check at `/api`, and a
//! JSON 404 for everything else.

use axum::http::{HeaderValue, Method, header};
use axum::response::IntoResponse;
use axum::{Json, Router, routing::get};
use kernel::error::app_error::AppError;
use serde::Serialize;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /api
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "API is running",
    })
}

pub async fn not_found() -> impl IntoResponse {
    AppError::not_found("Not Found")
}

/// Build the application router around an already-configured auth router
pub fn build_router(auth: Router, frontend_origins: &[String]) -> Router {
    Router::new()
        .route("/api", get(health))
        .nest("/api/auth", auth)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(frontend_origins))
}

fn cors_layer(frontend_origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = frontend_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    // Bearer tokens travel in a header, so no credentialed CORS is needed
    let allow_origin = if allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed_origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
}

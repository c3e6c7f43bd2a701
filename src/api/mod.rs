pub mod dto;
pub mod errors;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use handlers::ApiDoc;

pub fn router(pool: SqlitePool) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route(
            "/api/sensor-data",
            post(handlers::post_sensor_data).get(handlers::get_sensor_data),
        )
        .route(
            "/api/settings",
            get(handlers::get_settings).post(handlers::post_settings),
        )
        .route("/api/mode", post(handlers::set_mode))
        .with_state(pool)
        .split_for_parts();

    router
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
        // Dashboards are served from other origins; the API carries no
        // credentials, so a permissive policy is acceptable here.
        .layer(CorsLayer::permissive())
}

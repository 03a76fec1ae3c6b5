use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use axum::http::{header, Method};

use crate::{api::handlers, system};

/// Конфигурация всех роутов приложения
pub fn configure_routes(static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // D400 Sales Overview Dashboard
        .route(
            "/api/d400/sales_overview",
            post(handlers::d400_sales_overview::get_sales_overview),
        )
        .route(
            "/api/d400/brand_options",
            get(handlers::d400_sales_overview::get_brand_options),
        )
        .route(
            "/api/d400/filter_options",
            get(handlers::d400_sales_overview::get_filter_options),
        )
        // Built presentation layer, if any
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors)
}

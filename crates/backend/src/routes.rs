use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // A001 Cake handlers
        // ========================================
        .route(
            "/api/cakes",
            get(handlers::a001_cake::list_all).post(handlers::a001_cake::create),
        )
        .route("/api/cakes/:id", get(handlers::a001_cake::get_by_id))
        .route("/api/cakes/mark-sold", post(handlers::a001_cake::mark_sold))
        .route(
            "/api/cakes/sweep-expired",
            post(handlers::a001_cake::sweep_expired),
        )
        // ========================================
        // P900 Sales projection
        // ========================================
        .route("/api/sales", get(handlers::p900_sales::list))
}

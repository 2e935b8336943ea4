use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::analytics::handlers;
use crate::features::analytics::services::ReportService;

/// Create read-only report routes
pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports/products-per-category",
            get(handlers::products_per_category),
        )
        .route("/api/reports/top-spenders", get(handlers::top_spenders))
        .route("/api/reports/recent-orders", get(handlers::recent_orders))
        .route("/api/reports/low-stock", get(handlers::low_stock_products))
        .route(
            "/api/reports/revenue-per-category",
            get(handlers::revenue_per_category),
        )
        .route("/api/reports/total-revenue", get(handlers::total_revenue))
        .route("/api/reports/overview", get(handlers::overview))
        .route("/api/reports/{report}/plan", get(handlers::explain_report))
        .with_state(service)
}

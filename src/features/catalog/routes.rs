use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::catalog::handlers;
use crate::features::catalog::services::CatalogService;

/// Create routes for customers, categories, products and orders
pub fn routes(service: Arc<CatalogService>) -> Router {
    Router::new()
        .route("/api/customers", post(handlers::create_customer))
        .route("/api/customers/{id}", patch(handlers::correct_customer))
        .route("/api/categories", post(handlers::create_category))
        .route("/api/products", post(handlers::create_product))
        .route(
            "/api/products/{id}/price",
            patch(handlers::update_product_price),
        )
        .route(
            "/api/products/{id}/stock",
            patch(handlers::adjust_product_stock),
        )
        .route("/api/orders", post(handlers::place_order))
        .route("/api/orders/{id}", get(handlers::get_order))
        .with_state(service)
}

use axum::{
    extract::{Path, Query, State},
    Json,
};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::analytics::dtos::*;
use crate::features::analytics::models::{
    CategoryProductCount, CategoryRevenue, CustomerSpend, LowStockProduct, RecentOrder,
    ReportKind, ReportOverview,
};
use crate::features::analytics::services::{ReportService, SpenderLimit};
use crate::shared::types::{ApiResponse, Meta};

fn rows<T>(data: Vec<T>) -> Json<ApiResponse<Vec<T>>> {
    let meta = Meta::count(&data);
    Json(ApiResponse::success(Some(data), None, Some(meta)))
}

// ============================================================================
// Reports
// ============================================================================

/// Number of products in every category, including empty categories
#[utoipa::path(
    get,
    path = "/api/reports/products-per-category",
    tag = "reports",
    params(TimeoutParams),
    responses(
        (status = 200, description = "One row per category", body = ApiResponse<Vec<CategoryProductCount>>),
        (status = 503, description = "Storage unavailable"),
        (status = 504, description = "Report timed out")
    )
)]
pub async fn products_per_category(
    State(service): State<Arc<ReportService>>,
    Query(params): Query<TimeoutParams>,
) -> Result<Json<ApiResponse<Vec<CategoryProductCount>>>, AppError> {
    let timeout = service.timeout(params.timeout_ms);
    Ok(rows(service.products_per_category(timeout).await?))
}

/// Customers ranked by total spend
#[utoipa::path(
    get,
    path = "/api/reports/top-spenders",
    tag = "reports",
    params(TopSpendersParams),
    responses(
        (status = 200, description = "Highest spenders first", body = ApiResponse<Vec<CustomerSpend>>),
        (status = 400, description = "Invalid limit"),
        (status = 503, description = "Storage unavailable"),
        (status = 504, description = "Report timed out")
    )
)]
pub async fn top_spenders(
    State(service): State<Arc<ReportService>>,
    Query(params): Query<TopSpendersParams>,
) -> Result<Json<ApiResponse<Vec<CustomerSpend>>>, AppError> {
    let timeout = service.timeout(params.timeout_ms);
    let limit = match (params.all, params.limit) {
        (true, _) => SpenderLimit::All,
        (false, Some(n)) => SpenderLimit::Top(n),
        (false, None) => SpenderLimit::default(),
    };
    Ok(rows(service.top_spenders(limit, timeout).await?))
}

/// Most recent orders with the ordering customer
#[utoipa::path(
    get,
    path = "/api/reports/recent-orders",
    tag = "reports",
    params(RecentOrdersParams),
    responses(
        (status = 200, description = "Newest orders first", body = ApiResponse<Vec<RecentOrder>>),
        (status = 400, description = "Invalid limit"),
        (status = 503, description = "Storage unavailable"),
        (status = 504, description = "Report timed out")
    )
)]
pub async fn recent_orders(
    State(service): State<Arc<ReportService>>,
    Query(params): Query<RecentOrdersParams>,
) -> Result<Json<ApiResponse<Vec<RecentOrder>>>, AppError> {
    let timeout = service.timeout(params.timeout_ms);
    Ok(rows(service.recent_orders(params.limit, timeout).await?))
}

#[utoipa::path(
    get,
    path = "/api/reports/low-stock",
    tag = "reports",
    params(LowStockParams),
    responses(
        (status = 200, description = "Products below the stock threshold", body = ApiResponse<Vec<LowStockProduct>>),
        (status = 400, description = "Invalid threshold"),
        (status = 503, description = "Storage unavailable"),
        (status = 504, description = "Report timed out")
    )
)]
pub async fn low_stock_products(
    State(service): State<Arc<ReportService>>,
    Query(params): Query<LowStockParams>,
) -> Result<Json<ApiResponse<Vec<LowStockProduct>>>, AppError> {
    let timeout = service.timeout(params.timeout_ms);
    Ok(rows(
        service.low_stock_products(params.threshold, timeout).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/reports/revenue-per-category",
    tag = "reports",
    params(TimeoutParams),
    responses(
        (status = 200, description = "Categories by revenue", body = ApiResponse<Vec<CategoryRevenue>>),
        (status = 503, description = "Storage unavailable"),
        (status = 504, description = "Report timed out")
    )
)]
pub async fn revenue_per_category(
    State(service): State<Arc<ReportService>>,
    Query(params): Query<TimeoutParams>,
) -> Result<Json<ApiResponse<Vec<CategoryRevenue>>>, AppError> {
    let timeout = service.timeout(params.timeout_ms);
    Ok(rows(service.revenue_per_category(timeout).await?))
}

/// Revenue across every order item ever placed
#[utoipa::path(
    get,
    path = "/api/reports/total-revenue",
    tag = "reports",
    params(TimeoutParams),
    responses(
        (status = 200, description = "Grand total", body = ApiResponse<String>),
        (status = 503, description = "Storage unavailable"),
        (status = 504, description = "Report timed out")
    )
)]
pub async fn total_revenue(
    State(service): State<Arc<ReportService>>,
    Query(params): Query<TimeoutParams>,
) -> Result<Json<ApiResponse<Decimal>>, AppError> {
    let timeout = service.timeout(params.timeout_ms);
    let total = service.total_revenue(timeout).await?;
    Ok(Json(ApiResponse::success(Some(total), None, None)))
}

// ============================================================================
// Overview & plans
// ============================================================================

/// Every report in one response
#[utoipa::path(
    get,
    path = "/api/reports/overview",
    tag = "reports",
    params(TimeoutParams),
    responses(
        (status = 200, description = "All reports", body = ApiResponse<ReportOverview>),
        (status = 503, description = "Storage unavailable"),
        (status = 504, description = "Report timed out")
    )
)]
pub async fn overview(
    State(service): State<Arc<ReportService>>,
    Query(params): Query<TimeoutParams>,
) -> Result<Json<ApiResponse<ReportOverview>>, AppError> {
    let timeout = service.timeout(params.timeout_ms);
    let data = service.overview(timeout).await?;
    Ok(Json(ApiResponse::success(Some(data), None, None)))
}

/// Storage execution plan for a report
#[utoipa::path(
    get,
    path = "/api/reports/{report}/plan",
    tag = "reports",
    params(
        ("report" = ReportKind, Path, description = "Report name"),
        TimeoutParams
    ),
    responses(
        (status = 200, description = "Plan lines", body = ApiResponse<QueryPlanDto>),
        (status = 400, description = "Unknown report")
    )
)]
pub async fn explain_report(
    State(service): State<Arc<ReportService>>,
    Path(report): Path<ReportKind>,
    Query(params): Query<TimeoutParams>,
) -> Result<Json<ApiResponse<QueryPlanDto>>, AppError> {
    let timeout = service.timeout(params.timeout_ms);
    let plan = service.explain(report, timeout).await?;
    Ok(Json(ApiResponse::success(Some(plan), None, None)))
}

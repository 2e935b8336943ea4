use utoipa::{Modify, OpenApi};

use crate::features::analytics::{
    dtos as analytics_dtos, handlers as analytics_handlers, models as analytics_models,
};
use crate::features::catalog::{
    dtos as catalog_dtos, handlers as catalog_handlers, models as catalog_models,
};
use crate::modules::store::ConstraintKind;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Catalog
        catalog_handlers::create_customer,
        catalog_handlers::correct_customer,
        catalog_handlers::create_category,
        catalog_handlers::create_product,
        catalog_handlers::update_product_price,
        catalog_handlers::adjust_product_stock,
        catalog_handlers::place_order,
        catalog_handlers::get_order,
        // Reports
        analytics_handlers::products_per_category,
        analytics_handlers::top_spenders,
        analytics_handlers::recent_orders,
        analytics_handlers::low_stock_products,
        analytics_handlers::revenue_per_category,
        analytics_handlers::total_revenue,
        analytics_handlers::overview,
        analytics_handlers::explain_report,
    ),
    components(
        schemas(
            // Shared
            Meta,
            ConstraintKind,
            // Catalog
            catalog_models::Customer,
            catalog_models::Category,
            catalog_models::Product,
            catalog_models::OrderItem,
            catalog_models::OrderDetail,
            catalog_dtos::CreateCustomerDto,
            catalog_dtos::CorrectCustomerDto,
            catalog_dtos::CreateCategoryDto,
            catalog_dtos::CreateProductDto,
            catalog_dtos::UpdatePriceDto,
            catalog_dtos::AdjustStockDto,
            catalog_dtos::OrderItemDto,
            catalog_dtos::CreateOrderDto,
            ApiResponse<catalog_models::Customer>,
            ApiResponse<catalog_models::Category>,
            ApiResponse<catalog_models::Product>,
            ApiResponse<catalog_models::OrderDetail>,
            // Reports
            analytics_models::ReportKind,
            analytics_models::CategoryProductCount,
            analytics_models::CustomerSpend,
            analytics_models::RecentOrder,
            analytics_models::LowStockProduct,
            analytics_models::CategoryRevenue,
            analytics_models::ReportOverview,
            analytics_dtos::QueryPlanDto,
            ApiResponse<Vec<analytics_models::CategoryProductCount>>,
            ApiResponse<Vec<analytics_models::CustomerSpend>>,
            ApiResponse<Vec<analytics_models::RecentOrder>>,
            ApiResponse<Vec<analytics_models::LowStockProduct>>,
            ApiResponse<Vec<analytics_models::CategoryRevenue>>,
            ApiResponse<analytics_models::ReportOverview>,
            ApiResponse<analytics_dtos::QueryPlanDto>,
        )
    ),
    tags(
        (name = "catalog", description = "Customers, categories, products and orders"),
        (name = "reports", description = "Read-only analytical reports"),
    ),
    info(
        title = "Commerce Reports API",
        version = "0.1.0",
        description = "Commerce schema and reporting service",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

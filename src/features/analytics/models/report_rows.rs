use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Product count for one category (empty categories report zero)
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct CategoryProductCount {
    pub category_id: i64,
    pub category_name: String,
    pub product_count: i64,
}

/// Lifetime spend of one customer
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct CustomerSpend {
    pub customer_id: i64,
    pub name: String,
    pub email: String,
    pub order_count: i64,
    pub total_spent: Decimal,
}

/// Order joined with the customer who placed it
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct RecentOrder {
    pub order_id: i64,
    pub created_at: DateTime<Utc>,
    pub customer_id: i64,
    pub customer_name: String,
    pub customer_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct LowStockProduct {
    pub product_id: i64,
    pub name: String,
    pub category_id: i64,
    pub stock_quantity: i32,
    pub price: Decimal,
}

/// Revenue from order items, grouped by the product's category
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct CategoryRevenue {
    pub category_id: i64,
    pub category_name: String,
    pub units_sold: i64,
    pub revenue: Decimal,
}

/// Every report plus the grand total, read from one snapshot
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportOverview {
    pub products_per_category: Vec<CategoryProductCount>,
    pub top_spenders: Vec<CustomerSpend>,
    pub recent_orders: Vec<RecentOrder>,
    pub low_stock_products: Vec<LowStockProduct>,
    pub revenue_per_category: Vec<CategoryRevenue>,
    pub total_revenue: Decimal,
}

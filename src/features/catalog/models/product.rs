use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Database model for product
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    /// Current list price, always positive
    pub price: Decimal,
    /// Units on hand, never negative
    pub stock_quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// Data for inserting a product
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub category_id: i64,
    pub price: Decimal,
    pub stock_quantity: i32,
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Database model for product category
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Data for inserting a category
#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub name: String,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Database model for customer
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Data for inserting a customer
#[derive(Debug, Clone)]
pub struct CreateCustomer {
    pub name: String,
    pub email: String,
}

/// Administrative correction of a customer's contact details
#[derive(Debug, Clone, Default)]
pub struct CorrectCustomer {
    pub name: Option<String>,
    pub email: Option<String>,
}

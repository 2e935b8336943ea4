use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::features::catalog::models::{
    CorrectCustomer, CreateCategory, CreateCustomer, CreateOrder, CreateOrderItem, CreateProduct,
};
use crate::shared::constants::{PRICE_SCALE, PRICE_UPPER_BOUND};

fn price_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Positive, at most two decimal places, and below ten integer digits
fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        return Err(price_error(
            "positive_price",
            "Price must be greater than zero",
        ));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(price_error(
            "price_scale",
            "Price must have at most two decimal places",
        ));
    }
    if *price >= Decimal::from(PRICE_UPPER_BOUND) {
        return Err(price_error(
            "price_range",
            "Price must be below 10000000000",
        ));
    }
    Ok(())
}

/// Request DTO for registering a customer
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 255, message = "Email must not exceed 255 characters"))]
    pub email: String,
}

impl From<CreateCustomerDto> for CreateCustomer {
    fn from(dto: CreateCustomerDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            email: dto.email.trim().to_string(),
        }
    }
}

/// Request DTO for an administrative correction of a customer
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CorrectCustomerDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 255, message = "Email must not exceed 255 characters"))]
    pub email: Option<String>,
}

impl CorrectCustomerDto {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

impl From<CorrectCustomerDto> for CorrectCustomer {
    fn from(dto: CorrectCustomerDto) -> Self {
        Self {
            name: dto.name.map(|n| n.trim().to_string()),
            email: dto.email.map(|e| e.trim().to_string()),
        }
    }
}

/// Request DTO for creating a category
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

impl From<CreateCategoryDto> for CreateCategory {
    fn from(dto: CreateCategoryDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
        }
    }
}

/// Request DTO for creating a product
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(range(min = 1, message = "category_id must be positive"))]
    pub category_id: i64,

    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Stock quantity must not be negative"))]
    #[serde(default)]
    pub stock_quantity: i32,
}

impl From<CreateProductDto> for CreateProduct {
    fn from(dto: CreateProductDto) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            category_id: dto.category_id,
            price: dto.price,
            stock_quantity: dto.stock_quantity,
        }
    }
}

/// Request DTO for repricing a product
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePriceDto {
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = String, example = "24.50")]
    pub price: Decimal,
}

/// Request DTO for a stock movement (restock or write-off)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AdjustStockDto {
    /// Units to add; negative to remove
    pub delta: i32,
}

/// One product line of a new order
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemDto {
    #[validate(range(min = 1, message = "product_id must be positive"))]
    pub product_id: i64,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// Request DTO for placing an order
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderDto {
    #[validate(range(min = 1, message = "customer_id must be positive"))]
    pub customer_id: i64,

    #[validate(length(min = 1, max = 100, message = "An order needs 1-100 items"))]
    #[validate(nested)]
    pub items: Vec<OrderItemDto>,

    /// Backfill timestamp for historical orders, defaults to now
    pub created_at: Option<DateTime<Utc>>,
}

impl From<CreateOrderDto> for CreateOrder {
    fn from(dto: CreateOrderDto) -> Self {
        Self {
            customer_id: dto.customer_id,
            items: dto
                .items
                .into_iter()
                .map(|i| CreateOrderItem {
                    product_id: i.product_id,
                    quantity: i.quantity,
                })
                .collect(),
            created_at: dto.created_at,
        }
    }
}

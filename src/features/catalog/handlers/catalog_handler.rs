use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::catalog::dtos::{
    AdjustStockDto, CorrectCustomerDto, CreateCategoryDto, CreateCustomerDto, CreateOrderDto,
    CreateProductDto, UpdatePriceDto,
};
use crate::features::catalog::models::{Category, Customer, OrderDetail, Product};
use crate::features::catalog::services::CatalogService;
use crate::shared::types::ApiResponse;

type Created<T> = (StatusCode, Json<ApiResponse<T>>);

fn validate<T: Validate>(dto: &T) -> Result<()> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}

fn created<T>(data: T, message: &str) -> Created<T> {
    (
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(data), Some(message.to_string()), None)),
    )
}

// ============================================================================
// Customers
// ============================================================================

/// Register a customer
#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CreateCustomerDto,
    responses(
        (status = 201, description = "Customer created", body = ApiResponse<Customer>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "catalog"
)]
pub async fn create_customer(
    State(service): State<Arc<CatalogService>>,
    AppJson(dto): AppJson<CreateCustomerDto>,
) -> Result<Created<Customer>> {
    validate(&dto)?;
    let customer = service.create_customer(dto.into()).await?;
    Ok(created(customer, "Customer created"))
}

/// Correct a customer's name or email (administrative)
#[utoipa::path(
    patch,
    path = "/api/customers/{id}",
    params(("id" = i64, Path, description = "Customer ID")),
    request_body = CorrectCustomerDto,
    responses(
        (status = 200, description = "Customer corrected", body = ApiResponse<Customer>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Email already registered")
    ),
    tag = "catalog"
)]
pub async fn correct_customer(
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<CorrectCustomerDto>,
) -> Result<Json<ApiResponse<Customer>>> {
    validate(&dto)?;
    if dto.is_empty() {
        return Err(AppError::BadRequest(
            "Provide a name or an email to correct".to_string(),
        ));
    }
    let customer = service.correct_customer(id, dto.into()).await?;
    Ok(Json(ApiResponse::success(Some(customer), None, None)))
}

// ============================================================================
// Categories & products
// ============================================================================

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Category>),
        (status = 400, description = "Validation error")
    ),
    tag = "catalog"
)]
pub async fn create_category(
    State(service): State<Arc<CatalogService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<Created<Category>> {
    validate(&dto)?;
    let category = service.create_category(dto.into()).await?;
    Ok(created(category, "Category created"))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductDto,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<Product>),
        (status = 400, description = "Validation error"),
        (status = 422, description = "Unknown category or constraint violation")
    ),
    tag = "catalog"
)]
pub async fn create_product(
    State(service): State<Arc<CatalogService>>,
    AppJson(dto): AppJson<CreateProductDto>,
) -> Result<Created<Product>> {
    validate(&dto)?;
    let product = service.create_product(dto.into()).await?;
    Ok(created(product, "Product created"))
}

/// Reprice a product
#[utoipa::path(
    patch,
    path = "/api/products/{id}/price",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = UpdatePriceDto,
    responses(
        (status = 200, description = "Product repriced", body = ApiResponse<Product>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Product not found")
    ),
    tag = "catalog"
)]
pub async fn update_product_price(
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdatePriceDto>,
) -> Result<Json<ApiResponse<Product>>> {
    validate(&dto)?;
    let product = service.update_product_price(id, dto.price).await?;
    Ok(Json(ApiResponse::success(Some(product), None, None)))
}

/// Restock or write off units of a product
#[utoipa::path(
    patch,
    path = "/api/products/{id}/stock",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = AdjustStockDto,
    responses(
        (status = 200, description = "Stock adjusted", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Stock would become negative")
    ),
    tag = "catalog"
)]
pub async fn adjust_product_stock(
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<AdjustStockDto>,
) -> Result<Json<ApiResponse<Product>>> {
    let product = service.adjust_product_stock(id, dto.delta).await?;
    Ok(Json(ApiResponse::success(Some(product), None, None)))
}

// ============================================================================
// Orders
// ============================================================================

/// Place an order, capturing current prices and taking stock
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderDto,
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<OrderDetail>),
        (status = 400, description = "Validation error"),
        (status = 422, description = "Unknown customer/product or insufficient stock")
    ),
    tag = "catalog"
)]
pub async fn place_order(
    State(service): State<Arc<CatalogService>>,
    AppJson(dto): AppJson<CreateOrderDto>,
) -> Result<Created<OrderDetail>> {
    validate(&dto)?;
    let order = service.place_order(dto.into()).await?;
    Ok(created(order, "Order placed"))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<OrderDetail>),
        (status = 404, description = "Order not found")
    ),
    tag = "catalog"
)]
pub async fn get_order(
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<OrderDetail>>> {
    let order = service.get_order(id).await?;
    Ok(Json(ApiResponse::success(Some(order), None, None)))
}

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::core::error::{AppError, Result};
use crate::features::catalog::models::{
    Category, CorrectCustomer, CreateCategory, CreateCustomer, CreateOrder, CreateProduct,
    Customer, OrderDetail, Product,
};
use crate::modules::store::{CommerceStore, StoreError};

/// Log a failed write and lift it into [`AppError`]
fn write_failed(operation: &'static str) -> impl Fn(StoreError) -> AppError {
    move |e| {
        match &e {
            StoreError::ConstraintViolation { .. }
            | StoreError::InvalidValue { .. }
            | StoreError::NotFound { .. } => {
                tracing::info!("{} rejected: {}", operation, e)
            }
            _ => tracing::error!("{} failed: {:?}", operation, e),
        }
        AppError::Store(e)
    }
}

/// Service for writes against the commerce schema
pub struct CatalogService {
    store: Arc<dyn CommerceStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CommerceStore>) -> Self {
        Self { store }
    }

    pub async fn create_customer(&self, data: CreateCustomer) -> Result<Customer> {
        let customer = self
            .store
            .create_customer(data)
            .await
            .map_err(write_failed("create_customer"))?;

        tracing::info!("Customer created: id={}", customer.id);
        Ok(customer)
    }

    /// Administrative correction of name and/or email
    pub async fn correct_customer(&self, id: i64, data: CorrectCustomer) -> Result<Customer> {
        if data.name.is_none() && data.email.is_none() {
            return Err(AppError::BadRequest(
                "Provide a name or an email to correct".to_string(),
            ));
        }

        let customer = self
            .store
            .correct_customer(id, data)
            .await
            .map_err(write_failed("correct_customer"))?;

        tracing::info!("Customer corrected: id={}", customer.id);
        Ok(customer)
    }

    pub async fn create_category(&self, data: CreateCategory) -> Result<Category> {
        let category = self
            .store
            .create_category(data)
            .await
            .map_err(write_failed("create_category"))?;

        tracing::info!("Category created: id={}, name={}", category.id, category.name);
        Ok(category)
    }

    pub async fn create_product(&self, data: CreateProduct) -> Result<Product> {
        let product = self
            .store
            .create_product(data)
            .await
            .map_err(write_failed("create_product"))?;

        tracing::info!(
            "Product created: id={}, category_id={}",
            product.id,
            product.category_id
        );
        Ok(product)
    }

    /// Reprice a product. Order items already written keep their captured price.
    pub async fn update_product_price(&self, id: i64, price: Decimal) -> Result<Product> {
        let product = self
            .store
            .update_product_price(id, price)
            .await
            .map_err(write_failed("update_product_price"))?;

        tracing::info!("Product repriced: id={}, price={}", product.id, product.price);
        Ok(product)
    }

    pub async fn adjust_product_stock(&self, id: i64, delta: i32) -> Result<Product> {
        let product = self
            .store
            .adjust_product_stock(id, delta)
            .await
            .map_err(write_failed("adjust_product_stock"))?;

        tracing::info!(
            "Product stock adjusted: id={}, delta={}, stock={}",
            product.id,
            delta,
            product.stock_quantity
        );
        Ok(product)
    }

    pub async fn place_order(&self, data: CreateOrder) -> Result<OrderDetail> {
        if data.items.is_empty() {
            return Err(AppError::Validation(
                "An order needs at least one item".to_string(),
            ));
        }

        let order = self
            .store
            .place_order(data)
            .await
            .map_err(write_failed("place_order"))?;

        tracing::info!(
            "Order placed: id={}, customer_id={}, items={}, total={}",
            order.id,
            order.customer_id,
            order.items.len(),
            order.total
        );
        Ok(order)
    }

    pub async fn get_order(&self, id: i64) -> Result<OrderDetail> {
        self.store
            .get_order(id)
            .await
            .map_err(write_failed("get_order"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::catalog::models::CreateOrderItem;
    use crate::modules::store::{ConstraintKind, MemoryCommerceStore};

    fn service() -> CatalogService {
        CatalogService::new(Arc::new(MemoryCommerceStore::new()))
    }

    async fn seed_product(service: &CatalogService, stock: i32) -> (Customer, Product) {
        let customer = service
            .create_customer(CreateCustomer {
                name: "Grace".to_string(),
                email: "grace@example.com".to_string(),
            })
            .await
            .unwrap();
        let category = service
            .create_category(CreateCategory {
                name: "Tools".to_string(),
            })
            .await
            .unwrap();
        let product = service
            .create_product(CreateProduct {
                name: "Hammer".to_string(),
                category_id: category.id,
                price: Decimal::new(1500, 2),
                stock_quantity: stock,
            })
            .await
            .unwrap();
        (customer, product)
    }

    fn order_of(customer_id: i64, product_id: i64, quantity: i32) -> CreateOrder {
        CreateOrder {
            customer_id,
            items: vec![CreateOrderItem {
                product_id,
                quantity,
            }],
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let service = service();
        seed_product(&service, 1).await;

        let err = service
            .create_customer(CreateCustomer {
                name: "Other".to_string(),
                email: "grace@example.com".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Store(StoreError::ConstraintViolation {
                kind: ConstraintKind::Unique,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_product_requires_existing_category() {
        let err = service()
            .create_product(CreateProduct {
                name: "Orphan".to_string(),
                category_id: 404,
                price: Decimal::ONE,
                stock_quantity: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Store(StoreError::ConstraintViolation {
                kind: ConstraintKind::ForeignKey,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_price_is_stored_as_two_decimal_places() {
        let service = service();
        let (_, product) = seed_product(&service, 1).await;

        let repriced = service
            .update_product_price(product.id, "19.995".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(repriced.price, Decimal::new(2000, 2));

        let err = service
            .update_product_price(product.id, "100000000000.00".parse().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn test_price_at_time_survives_repricing() {
        let service = service();
        let (customer, product) = seed_product(&service, 10).await;

        let order = service
            .place_order(order_of(customer.id, product.id, 2))
            .await
            .unwrap();
        assert_eq!(order.total, Decimal::new(3000, 2));

        service
            .update_product_price(product.id, Decimal::new(9900, 2))
            .await
            .unwrap();

        let reloaded = service.get_order(order.id).await.unwrap();
        assert_eq!(reloaded.items[0].price_at_time, Decimal::new(1500, 2));
        assert_eq!(reloaded.total, Decimal::new(3000, 2));
    }

    #[tokio::test]
    async fn test_oversell_rolls_back_whole_order() {
        let service = service();
        let (customer, product) = seed_product(&service, 3).await;

        let err = service
            .place_order(CreateOrder {
                customer_id: customer.id,
                items: vec![
                    CreateOrderItem {
                        product_id: product.id,
                        quantity: 2,
                    },
                    CreateOrderItem {
                        product_id: product.id,
                        quantity: 2,
                    },
                ],
                created_at: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Store(StoreError::ConstraintViolation {
                kind: ConstraintKind::Check,
                ..
            })
        ));

        // Stock untouched by the failed order
        let product = service.adjust_product_stock(product.id, 0).await.unwrap();
        assert_eq!(product.stock_quantity, 3);
    }

    #[tokio::test]
    async fn test_stock_never_goes_negative() {
        let service = service();
        let (_, product) = seed_product(&service, 4).await;

        let err = service
            .adjust_product_stock(product.id, -5)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Store(StoreError::ConstraintViolation {
                kind: ConstraintKind::Check,
                ..
            })
        ));

        let restocked = service.adjust_product_stock(product.id, 6).await.unwrap();
        assert_eq!(restocked.stock_quantity, 10);
    }

    #[tokio::test]
    async fn test_order_for_unknown_customer_is_rejected() {
        let service = service();
        let (_, product) = seed_product(&service, 4).await;

        let err = service
            .place_order(order_of(999, product.id, 1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Store(StoreError::ConstraintViolation {
                kind: ConstraintKind::ForeignKey,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_empty_correction_is_bad_request() {
        let err = service()
            .correct_customer(1, CorrectCustomer::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_correct_customer_updates_email() {
        let service = service();
        let (customer, _) = seed_product(&service, 1).await;

        let corrected = service
            .correct_customer(
                customer.id,
                CorrectCustomer {
                    name: None,
                    email: Some("grace.hopper@example.com".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(corrected.email, "grace.hopper@example.com");
        assert_eq!(corrected.name, "Grace");
    }
}

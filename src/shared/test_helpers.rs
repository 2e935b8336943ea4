//! Fixture builders shared by the service and route tests

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;

use crate::features::catalog::models::{
    CreateCategory, CreateCustomer, CreateOrder, CreateOrderItem, CreateProduct,
};
use crate::modules::store::CommerceStore;

/// Customer with a fake unique email; returns its id
pub async fn seed_customer(store: &dyn CommerceStore, name: &str) -> i64 {
    store
        .create_customer(CreateCustomer {
            name: name.to_string(),
            email: SafeEmail().fake(),
        })
        .await
        .unwrap()
        .id
}

pub async fn seed_category(store: &dyn CommerceStore, name: &str) -> i64 {
    store
        .create_category(CreateCategory {
            name: name.to_string(),
        })
        .await
        .unwrap()
        .id
}

pub async fn seed_product(
    store: &dyn CommerceStore,
    category_id: i64,
    price: Decimal,
    stock_quantity: i32,
) -> i64 {
    store
        .create_product(CreateProduct {
            name: Name().fake(),
            category_id,
            price,
            stock_quantity,
        })
        .await
        .unwrap()
        .id
}

/// Order of `(product_id, quantity)` lines placed now
pub async fn seed_order(store: &dyn CommerceStore, customer_id: i64, lines: &[(i64, i32)]) -> i64 {
    store
        .place_order(CreateOrder {
            customer_id,
            items: lines
                .iter()
                .map(|&(product_id, quantity)| CreateOrderItem {
                    product_id,
                    quantity,
                })
                .collect(),
            created_at: None,
        })
        .await
        .unwrap()
        .id
}

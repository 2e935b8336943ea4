use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Database model for order. Orders are append-only.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Database model for a single product line within an order
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    /// Product price captured when the order was placed
    pub price_at_time: Decimal,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price_at_time
    }
}

/// Order with its items
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderDetail {
    pub id: i64,
    pub customer_id: i64,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
}

impl OrderDetail {
    pub fn new(order: Order, items: Vec<OrderItem>) -> Self {
        let total = items.iter().map(OrderItem::line_total).sum();
        Self {
            id: order.id,
            customer_id: order.customer_id,
            created_at: order.created_at,
            items,
            total,
        }
    }
}

/// Requested product line for a new order
#[derive(Debug, Clone)]
pub struct CreateOrderItem {
    pub product_id: i64,
    pub quantity: i32,
}

/// Data for placing an order
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub customer_id: i64,
    pub items: Vec<CreateOrderItem>,
    /// Backfilled creation time, defaults to now
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_detail_total_sums_line_totals() {
        let order = Order {
            id: 1,
            customer_id: 7,
            created_at: Utc::now(),
        };
        let items = vec![
            OrderItem {
                id: 1,
                order_id: 1,
                product_id: 10,
                quantity: 2,
                price_at_time: Decimal::new(1250, 2),
            },
            OrderItem {
                id: 2,
                order_id: 1,
                product_id: 11,
                quantity: 1,
                price_at_time: Decimal::new(2500, 2),
            },
        ];

        let detail = OrderDetail::new(order, items);
        assert_eq!(detail.total, Decimal::new(5000, 2));
        assert_eq!(detail.items.len(), 2);
    }
}

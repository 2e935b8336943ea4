//! Storage port for the commerce schema.
//!
//! Services talk to [`CommerceStore`] rather than to a pool directly. The
//! Postgres adapter is the production implementation; the in-memory adapter
//! enforces the same named constraints and backs the unit tests.

mod error;
#[cfg(test)]
mod memory;
mod postgres;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::features::analytics::models::{
    CategoryProductCount, CategoryRevenue, CustomerSpend, LowStockProduct, RecentOrder,
    ReportKind, ReportOverview,
};
use crate::features::catalog::models::{
    Category, CorrectCustomer, CreateCategory, CreateCustomer, CreateOrder, CreateProduct,
    Customer, OrderDetail, Product,
};

pub use error::{ConstraintKind, StoreError, StoreResult};
#[cfg(test)]
pub use memory::MemoryCommerceStore;
pub use postgres::PgCommerceStore;

#[async_trait]
pub trait CommerceStore: Send + Sync {
    /// Round-trip to the storage engine
    async fn ping(&self) -> StoreResult<()>;

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    async fn create_customer(&self, data: CreateCustomer) -> StoreResult<Customer>;

    async fn correct_customer(&self, id: i64, data: CorrectCustomer) -> StoreResult<Customer>;

    async fn create_category(&self, data: CreateCategory) -> StoreResult<Category>;

    async fn create_product(&self, data: CreateProduct) -> StoreResult<Product>;

    async fn update_product_price(&self, id: i64, price: Decimal) -> StoreResult<Product>;

    /// Add `delta` (possibly negative) to the product's stock
    async fn adjust_product_stock(&self, id: i64, delta: i32) -> StoreResult<Product>;

    /// Insert an order, capture each product's current price and decrement
    /// its stock. All or nothing.
    async fn place_order(&self, data: CreateOrder) -> StoreResult<OrderDetail>;

    async fn get_order(&self, id: i64) -> StoreResult<OrderDetail>;

    // ------------------------------------------------------------------
    // Reports (read-only)
    // ------------------------------------------------------------------

    async fn products_per_category(&self) -> StoreResult<Vec<CategoryProductCount>>;

    /// `None` returns every customer with at least one order
    async fn top_spenders(&self, limit: Option<i64>) -> StoreResult<Vec<CustomerSpend>>;

    async fn recent_orders(&self, limit: i64) -> StoreResult<Vec<RecentOrder>>;

    /// Products with `stock_quantity < threshold`
    async fn low_stock_products(&self, threshold: i32) -> StoreResult<Vec<LowStockProduct>>;

    async fn revenue_per_category(&self) -> StoreResult<Vec<CategoryRevenue>>;

    /// Sum of `quantity * price_at_time` over every order item
    async fn total_revenue(&self) -> StoreResult<Decimal>;

    /// Every report plus the grand total from one consistent snapshot
    async fn overview(
        &self,
        top_spenders: i64,
        recent_orders: i64,
        low_stock_threshold: i32,
    ) -> StoreResult<ReportOverview>;

    /// Execution plan for a report, one line per entry
    async fn explain(&self, report: ReportKind) -> StoreResult<Vec<String>>;
}

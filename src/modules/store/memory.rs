use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};

use super::{CommerceStore, ConstraintKind, StoreError, StoreResult};
use crate::features::analytics::models::{
    CategoryProductCount, CategoryRevenue, CustomerSpend, LowStockProduct, RecentOrder,
    ReportKind, ReportOverview,
};
use crate::features::catalog::models::{
    Category, CorrectCustomer, CreateCategory, CreateCustomer, CreateOrder, CreateProduct,
    Customer, Order, OrderDetail, OrderItem, Product,
};
use crate::shared::constants::{PRICE_SCALE, PRICE_UPPER_BOUND};

#[derive(Default, Clone)]
struct Tables {
    customers: Vec<Customer>,
    categories: Vec<Category>,
    products: Vec<Product>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.customers
            .iter()
            .any(|c| c.email == email && Some(c.id) != except)
    }

    fn products_per_category(&self) -> Vec<CategoryProductCount> {
        let mut rows: Vec<CategoryProductCount> = self
            .categories
            .iter()
            .map(|c| CategoryProductCount {
                category_id: c.id,
                category_name: c.name.clone(),
                product_count: self.products.iter().filter(|p| p.category_id == c.id).count()
                    as i64,
            })
            .collect();
        rows.sort_by(|a, b| {
            a.category_name
                .cmp(&b.category_name)
                .then(a.category_id.cmp(&b.category_id))
        });
        rows
    }

    fn top_spenders(&self, limit: Option<i64>) -> Vec<CustomerSpend> {
        let order_owner: HashMap<i64, i64> =
            self.orders.iter().map(|o| (o.id, o.customer_id)).collect();

        let mut totals: HashMap<i64, (Decimal, Vec<i64>)> = HashMap::new();
        for item in &self.order_items {
            if let Some(customer_id) = order_owner.get(&item.order_id) {
                let entry = totals.entry(*customer_id).or_default();
                entry.0 += item.line_total();
                if !entry.1.contains(&item.order_id) {
                    entry.1.push(item.order_id);
                }
            }
        }

        let mut rows: Vec<CustomerSpend> = self
            .customers
            .iter()
            .filter_map(|c| {
                totals.get(&c.id).map(|(total, orders)| CustomerSpend {
                    customer_id: c.id,
                    name: c.name.clone(),
                    email: c.email.clone(),
                    order_count: orders.len() as i64,
                    total_spent: *total,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.total_spent
                .cmp(&a.total_spent)
                .then(a.customer_id.cmp(&b.customer_id))
        });
        if let Some(limit) = limit {
            rows.truncate(usize::try_from(limit).unwrap_or(0));
        }
        rows
    }

    fn recent_orders(&self, limit: i64) -> Vec<RecentOrder> {
        let mut rows: Vec<RecentOrder> = self
            .orders
            .iter()
            .filter_map(|o| {
                self.customers
                    .iter()
                    .find(|c| c.id == o.customer_id)
                    .map(|c| RecentOrder {
                        order_id: o.id,
                        created_at: o.created_at,
                        customer_id: c.id,
                        customer_name: c.name.clone(),
                        customer_email: c.email.clone(),
                    })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.order_id.cmp(&a.order_id))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        rows
    }

    fn low_stock_products(&self, threshold: i32) -> Vec<LowStockProduct> {
        let mut rows: Vec<LowStockProduct> = self
            .products
            .iter()
            .filter(|p| p.stock_quantity < threshold)
            .map(|p| LowStockProduct {
                product_id: p.id,
                name: p.name.clone(),
                category_id: p.category_id,
                stock_quantity: p.stock_quantity,
                price: p.price,
            })
            .collect();
        rows.sort_by(|a, b| {
            a.stock_quantity
                .cmp(&b.stock_quantity)
                .then(a.product_id.cmp(&b.product_id))
        });
        rows
    }

    fn revenue_per_category(&self) -> Vec<CategoryRevenue> {
        let product_category: HashMap<i64, i64> =
            self.products.iter().map(|p| (p.id, p.category_id)).collect();

        let mut sums: HashMap<i64, (i64, Decimal)> = HashMap::new();
        for item in &self.order_items {
            if let Some(category_id) = product_category.get(&item.product_id) {
                let entry = sums.entry(*category_id).or_default();
                entry.0 += i64::from(item.quantity);
                entry.1 += item.line_total();
            }
        }

        let mut rows: Vec<CategoryRevenue> = self
            .categories
            .iter()
            .filter_map(|c| {
                sums.get(&c.id).map(|(units, revenue)| CategoryRevenue {
                    category_id: c.id,
                    category_name: c.name.clone(),
                    units_sold: *units,
                    revenue: *revenue,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.revenue
                .cmp(&a.revenue)
                .then(a.category_id.cmp(&b.category_id))
        });
        rows
    }

    fn total_revenue(&self) -> Decimal {
        self.order_items.iter().map(OrderItem::line_total).sum()
    }
}

/// In-memory [`CommerceStore`] enforcing the same named constraints as the
/// Postgres schema. Test-only.
#[derive(Default)]
pub struct MemoryCommerceStore {
    tables: Mutex<Tables>,
    latency: Option<Duration>,
    outages: AtomicU32,
}

impl MemoryCommerceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency` before touching the tables
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Make the next `count` calls fail as unavailable
    pub fn fail_next(&self, count: u32) {
        self.outages.store(count, Ordering::SeqCst);
    }

    async fn enter(&self) -> StoreResult<std::sync::MutexGuard<'_, Tables>> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let pending = self.outages.load(Ordering::SeqCst);
        if pending > 0 {
            self.outages.store(pending - 1, Ordering::SeqCst);
            return Err(StoreError::Unavailable {
                message: "simulated outage".to_string(),
            });
        }

        self.tables.lock().map_err(|_| StoreError::Query {
            message: "store lock poisoned".to_string(),
        })
    }
}

fn unique_email(email: &str) -> StoreError {
    StoreError::constraint(
        ConstraintKind::Unique,
        "customers_email_key",
        format!("Key (email)=({}) already exists.", email),
    )
}

/// Coerce a price the way a `NUMERIC(12,2)` column does, then apply
/// `products_price_check`
fn stored_price(price: Decimal) -> StoreResult<Decimal> {
    let rounded =
        price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded.abs() >= Decimal::from(PRICE_UPPER_BOUND) {
        return Err(StoreError::InvalidValue {
            message: "numeric field overflow".to_string(),
        });
    }
    if rounded <= Decimal::ZERO {
        return Err(StoreError::constraint(
            ConstraintKind::Check,
            "products_price_check",
            "price must be positive",
        ));
    }
    Ok(rounded)
}

fn check_stock(stock: i64, product_id: i64) -> StoreResult<i32> {
    if stock < 0 {
        return Err(StoreError::constraint(
            ConstraintKind::Check,
            "products_stock_quantity_check",
            format!("stock for product {} would become {}", product_id, stock),
        ));
    }
    i32::try_from(stock).map_err(|_| StoreError::Query {
        message: "integer out of range".to_string(),
    })
}

#[async_trait]
impl CommerceStore for MemoryCommerceStore {
    async fn ping(&self) -> StoreResult<()> {
        self.enter().await.map(|_| ())
    }

    async fn create_customer(&self, data: CreateCustomer) -> StoreResult<Customer> {
        let mut t = self.enter().await?;
        if t.email_taken(&data.email, None) {
            return Err(unique_email(&data.email));
        }
        let customer = Customer {
            id: t.next_id(),
            name: data.name,
            email: data.email,
            created_at: Utc::now(),
        };
        t.customers.push(customer.clone());
        Ok(customer)
    }

    async fn correct_customer(&self, id: i64, data: CorrectCustomer) -> StoreResult<Customer> {
        let mut t = self.enter().await?;
        if let Some(email) = &data.email {
            if t.email_taken(email, Some(id)) {
                return Err(unique_email(email));
            }
        }
        let customer = t
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound {
                entity: "customer",
                id,
            })?;
        if let Some(name) = data.name {
            customer.name = name;
        }
        if let Some(email) = data.email {
            customer.email = email;
        }
        Ok(customer.clone())
    }

    async fn create_category(&self, data: CreateCategory) -> StoreResult<Category> {
        let mut t = self.enter().await?;
        let category = Category {
            id: t.next_id(),
            name: data.name,
        };
        t.categories.push(category.clone());
        Ok(category)
    }

    async fn create_product(&self, data: CreateProduct) -> StoreResult<Product> {
        let mut t = self.enter().await?;
        if !t.categories.iter().any(|c| c.id == data.category_id) {
            return Err(StoreError::constraint(
                ConstraintKind::ForeignKey,
                "products_category_id_fkey",
                format!("Key (category_id)=({}) is not present", data.category_id),
            ));
        }
        let price = stored_price(data.price)?;
        let id = t.next_id();
        let stock_quantity = check_stock(i64::from(data.stock_quantity), id)?;
        let product = Product {
            id,
            name: data.name,
            category_id: data.category_id,
            price,
            stock_quantity,
            created_at: Utc::now(),
        };
        t.products.push(product.clone());
        Ok(product)
    }

    async fn update_product_price(&self, id: i64, price: Decimal) -> StoreResult<Product> {
        let mut t = self.enter().await?;
        let price = stored_price(price)?;
        let product = t
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound {
                entity: "product",
                id,
            })?;
        product.price = price;
        Ok(product.clone())
    }

    async fn adjust_product_stock(&self, id: i64, delta: i32) -> StoreResult<Product> {
        let mut t = self.enter().await?;
        let product = t
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound {
                entity: "product",
                id,
            })?;
        product.stock_quantity =
            check_stock(i64::from(product.stock_quantity) + i64::from(delta), id)?;
        Ok(product.clone())
    }

    async fn place_order(&self, data: CreateOrder) -> StoreResult<OrderDetail> {
        let mut guard = self.enter().await?;
        // Work on a copy so a failing line leaves nothing behind
        let mut t = guard.clone();

        if !t.customers.iter().any(|c| c.id == data.customer_id) {
            return Err(StoreError::constraint(
                ConstraintKind::ForeignKey,
                "orders_customer_id_fkey",
                format!("Key (customer_id)=({}) is not present", data.customer_id),
            ));
        }

        let order = Order {
            id: t.next_id(),
            customer_id: data.customer_id,
            created_at: data.created_at.unwrap_or_else(Utc::now),
        };

        let mut items = Vec::with_capacity(data.items.len());
        for line in &data.items {
            if line.quantity <= 0 {
                return Err(StoreError::constraint(
                    ConstraintKind::Check,
                    "order_items_quantity_check",
                    format!("quantity must be positive, got {}", line.quantity),
                ));
            }
            let product = t
                .products
                .iter_mut()
                .find(|p| p.id == line.product_id)
                .ok_or_else(|| {
                    StoreError::constraint(
                        ConstraintKind::ForeignKey,
                        "order_items_product_id_fkey",
                        format!("product {} does not exist", line.product_id),
                    )
                })?;
            product.stock_quantity = check_stock(
                i64::from(product.stock_quantity) - i64::from(line.quantity),
                product.id,
            )?;
            let price_at_time = product.price;

            items.push(OrderItem {
                id: t.next_id(),
                order_id: order.id,
                product_id: line.product_id,
                quantity: line.quantity,
                price_at_time,
            });
        }

        t.orders.push(order.clone());
        t.order_items.extend(items.iter().cloned());
        *guard = t;

        Ok(OrderDetail::new(order, items))
    }

    async fn get_order(&self, id: i64) -> StoreResult<OrderDetail> {
        let t = self.enter().await?;
        let order = t
            .orders
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or(StoreError::NotFound { entity: "order", id })?;
        let items = t
            .order_items
            .iter()
            .filter(|i| i.order_id == id)
            .cloned()
            .collect();
        Ok(OrderDetail::new(order, items))
    }

    async fn products_per_category(&self) -> StoreResult<Vec<CategoryProductCount>> {
        Ok(self.enter().await?.products_per_category())
    }

    async fn top_spenders(&self, limit: Option<i64>) -> StoreResult<Vec<CustomerSpend>> {
        Ok(self.enter().await?.top_spenders(limit))
    }

    async fn recent_orders(&self, limit: i64) -> StoreResult<Vec<RecentOrder>> {
        Ok(self.enter().await?.recent_orders(limit))
    }

    async fn low_stock_products(&self, threshold: i32) -> StoreResult<Vec<LowStockProduct>> {
        Ok(self.enter().await?.low_stock_products(threshold))
    }

    async fn revenue_per_category(&self) -> StoreResult<Vec<CategoryRevenue>> {
        Ok(self.enter().await?.revenue_per_category())
    }

    async fn total_revenue(&self) -> StoreResult<Decimal> {
        Ok(self.enter().await?.total_revenue())
    }

    async fn overview(
        &self,
        top_spenders: i64,
        recent_orders: i64,
        low_stock_threshold: i32,
    ) -> StoreResult<ReportOverview> {
        // One guard for every read, like a single snapshot
        let t = self.enter().await?;
        Ok(ReportOverview {
            products_per_category: t.products_per_category(),
            top_spenders: t.top_spenders(Some(top_spenders)),
            recent_orders: t.recent_orders(recent_orders),
            low_stock_products: t.low_stock_products(low_stock_threshold),
            revenue_per_category: t.revenue_per_category(),
            total_revenue: t.total_revenue(),
        })
    }

    async fn explain(&self, report: ReportKind) -> StoreResult<Vec<String>> {
        let _t = self.enter().await?;
        Ok(vec![format!("In-memory scan for {}", report)])
    }
}

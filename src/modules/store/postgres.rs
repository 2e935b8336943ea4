use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use super::{CommerceStore, ConstraintKind, StoreError, StoreResult};
use crate::features::analytics::models::{
    CategoryProductCount, CategoryRevenue, CustomerSpend, LowStockProduct, RecentOrder,
    ReportKind, ReportOverview,
};
use crate::features::catalog::models::{
    Category, CorrectCustomer, CreateCategory, CreateCustomer, CreateOrder, CreateOrderItem,
    CreateProduct, Customer, Order, OrderDetail, OrderItem, Product,
};
use crate::shared::constants::{DEFAULT_TOP_SPENDERS_LIMIT, LOW_STOCK_THRESHOLD, MAX_RECENT_ORDERS};

// ============================================================================
// Report queries
// ============================================================================

const PRODUCTS_PER_CATEGORY_SQL: &str = r#"
    SELECT
        c.id AS category_id,
        c.name AS category_name,
        COUNT(p.id) AS product_count
    FROM categories c
    LEFT JOIN products p ON p.category_id = c.id
    GROUP BY c.id, c.name
    ORDER BY c.name ASC, c.id ASC
"#;

const TOP_SPENDERS_SQL: &str = r#"
    SELECT
        c.id AS customer_id,
        c.name,
        c.email,
        COUNT(DISTINCT o.id) AS order_count,
        SUM(oi.quantity * oi.price_at_time) AS total_spent
    FROM customers c
    JOIN orders o ON o.customer_id = c.id
    JOIN order_items oi ON oi.order_id = o.id
    GROUP BY c.id, c.name, c.email
    ORDER BY total_spent DESC, c.id ASC
    LIMIT $1
"#;

const RECENT_ORDERS_SQL: &str = r#"
    SELECT
        o.id AS order_id,
        o.created_at,
        c.id AS customer_id,
        c.name AS customer_name,
        c.email AS customer_email
    FROM orders o
    JOIN customers c ON c.id = o.customer_id
    ORDER BY o.created_at DESC, o.id DESC
    LIMIT $1
"#;

const LOW_STOCK_SQL: &str = r#"
    SELECT
        p.id AS product_id,
        p.name,
        p.category_id,
        p.stock_quantity,
        p.price
    FROM products p
    WHERE p.stock_quantity < $1
    ORDER BY p.stock_quantity ASC, p.id ASC
"#;

const REVENUE_PER_CATEGORY_SQL: &str = r#"
    SELECT
        c.id AS category_id,
        c.name AS category_name,
        SUM(oi.quantity)::BIGINT AS units_sold,
        SUM(oi.quantity * oi.price_at_time) AS revenue
    FROM order_items oi
    JOIN products p ON p.id = oi.product_id
    JOIN categories c ON c.id = p.category_id
    GROUP BY c.id, c.name
    ORDER BY revenue DESC, c.id ASC
"#;

const TOTAL_REVENUE_SQL: &str = r#"
    SELECT COALESCE(SUM(quantity * price_at_time), 0) FROM order_items
"#;

const PRODUCT_COLUMNS: &str = "id, name, category_id, price, stock_quantity, created_at";

/// Postgres implementation of [`CommerceStore`]
#[derive(Clone)]
pub struct PgCommerceStore {
    pool: PgPool,
}

impl PgCommerceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a read-only transaction so a report sees one consistent snapshot
    async fn snapshot(&self) -> StoreResult<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    /// Report SQL with its parameter replaced by the default value, for EXPLAIN
    fn explainable_sql(report: ReportKind) -> String {
        match report {
            ReportKind::ProductsPerCategory => PRODUCTS_PER_CATEGORY_SQL.to_string(),
            ReportKind::TopSpenders => {
                TOP_SPENDERS_SQL.replace("$1", &DEFAULT_TOP_SPENDERS_LIMIT.to_string())
            }
            ReportKind::RecentOrders => {
                RECENT_ORDERS_SQL.replace("$1", &MAX_RECENT_ORDERS.to_string())
            }
            ReportKind::LowStock => LOW_STOCK_SQL.replace("$1", &LOW_STOCK_THRESHOLD.to_string()),
            ReportKind::RevenuePerCategory => REVENUE_PER_CATEGORY_SQL.to_string(),
        }
    }
}

#[async_trait]
impl CommerceStore for PgCommerceStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_customer(&self, data: CreateCustomer) -> StoreResult<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn correct_customer(&self, id: i64, data: CorrectCustomer) -> StoreResult<Customer> {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET name = COALESCE($2, name),
                email = COALESCE($3, email)
            WHERE id = $1
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound {
            entity: "customer",
            id,
        })
    }

    async fn create_category(&self, data: CreateCategory) -> StoreResult<Category> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&data.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    async fn create_product(&self, data: CreateProduct) -> StoreResult<Product> {
        let sql = format!(
            "INSERT INTO products (name, category_id, price, stock_quantity) \
             VALUES ($1, $2, $3, $4) RETURNING {PRODUCT_COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(&data.name)
            .bind(data.category_id)
            .bind(data.price)
            .bind(data.stock_quantity)
            .fetch_one(&self.pool)
            .await?;

        Ok(product)
    }

    async fn update_product_price(&self, id: i64, price: Decimal) -> StoreResult<Product> {
        let sql = format!("UPDATE products SET price = $2 WHERE id = $1 RETURNING {PRODUCT_COLUMNS}");
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(price)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "product",
                id,
            })
    }

    async fn adjust_product_stock(&self, id: i64, delta: i32) -> StoreResult<Product> {
        // products_stock_quantity_check rejects a negative result
        let sql = format!(
            "UPDATE products SET stock_quantity = stock_quantity + $2 \
             WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(delta)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "product",
                id,
            })
    }

    async fn place_order(&self, data: CreateOrder) -> StoreResult<OrderDetail> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (customer_id, created_at)
            VALUES ($1, COALESCE($2, NOW()))
            RETURNING id, customer_id, created_at
            "#,
        )
        .bind(data.customer_id)
        .bind(data.created_at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("SELECT id FROM products WHERE id = ANY($1) ORDER BY id FOR UPDATE")
            .bind(lock_order(&data.items))
            .execute(&mut *tx)
            .await?;

        let mut items = Vec::with_capacity(data.items.len());
        for line in &data.items {
            if line.quantity <= 0 {
                return Err(StoreError::constraint(
                    ConstraintKind::Check,
                    "order_items_quantity_check",
                    format!("quantity must be positive, got {}", line.quantity),
                ));
            }

            // Rows are already locked; capture the current price while
            // taking the stock. The stock check constraint aborts on oversell
            let price: Option<Decimal> = sqlx::query_scalar(
                r#"
                UPDATE products
                SET stock_quantity = stock_quantity - $2
                WHERE id = $1
                RETURNING price
                "#,
            )
            .bind(line.product_id)
            .bind(line.quantity)
            .fetch_optional(&mut *tx)
            .await?;

            let price_at_time = price.ok_or_else(|| {
                StoreError::constraint(
                    ConstraintKind::ForeignKey,
                    "order_items_product_id_fkey",
                    format!("product {} does not exist", line.product_id),
                )
            })?;

            let item = sqlx::query_as::<_, OrderItem>(
                r#"
                INSERT INTO order_items (order_id, product_id, quantity, price_at_time)
                VALUES ($1, $2, $3, $4)
                RETURNING id, order_id, product_id, quantity, price_at_time
                "#,
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(price_at_time)
            .fetch_one(&mut *tx)
            .await?;

            items.push(item);
        }

        tx.commit().await?;

        Ok(OrderDetail::new(order, items))
    }

    async fn get_order(&self, id: i64) -> StoreResult<OrderDetail> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT id, customer_id, created_at FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound { entity: "order", id })?;

        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, quantity, price_at_time
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(OrderDetail::new(order, items))
    }

    async fn products_per_category(&self) -> StoreResult<Vec<CategoryProductCount>> {
        let mut tx = self.snapshot().await?;
        let rows = fetch_products_per_category(&mut tx).await?;
        tx.commit().await?;
        Ok(rows)
    }

    async fn top_spenders(&self, limit: Option<i64>) -> StoreResult<Vec<CustomerSpend>> {
        let mut tx = self.snapshot().await?;
        let rows = fetch_top_spenders(&mut tx, limit).await?;
        tx.commit().await?;
        Ok(rows)
    }

    async fn recent_orders(&self, limit: i64) -> StoreResult<Vec<RecentOrder>> {
        let mut tx = self.snapshot().await?;
        let rows = fetch_recent_orders(&mut tx, limit).await?;
        tx.commit().await?;
        Ok(rows)
    }

    async fn low_stock_products(&self, threshold: i32) -> StoreResult<Vec<LowStockProduct>> {
        let mut tx = self.snapshot().await?;
        let rows = fetch_low_stock(&mut tx, threshold).await?;
        tx.commit().await?;
        Ok(rows)
    }

    async fn revenue_per_category(&self) -> StoreResult<Vec<CategoryRevenue>> {
        let mut tx = self.snapshot().await?;
        let rows = fetch_revenue_per_category(&mut tx).await?;
        tx.commit().await?;
        Ok(rows)
    }

    async fn total_revenue(&self) -> StoreResult<Decimal> {
        let mut conn = self.pool.acquire().await?;
        fetch_total_revenue(&mut conn).await
    }

    async fn overview(
        &self,
        top_spenders: i64,
        recent_orders: i64,
        low_stock_threshold: i32,
    ) -> StoreResult<ReportOverview> {
        // Sequential reads on one REPEATABLE READ transaction see the same data
        let mut tx = self.snapshot().await?;
        let overview = ReportOverview {
            products_per_category: fetch_products_per_category(&mut tx).await?,
            top_spenders: fetch_top_spenders(&mut tx, Some(top_spenders)).await?,
            recent_orders: fetch_recent_orders(&mut tx, recent_orders).await?,
            low_stock_products: fetch_low_stock(&mut tx, low_stock_threshold).await?,
            revenue_per_category: fetch_revenue_per_category(&mut tx).await?,
            total_revenue: fetch_total_revenue(&mut tx).await?,
        };
        tx.commit().await?;
        Ok(overview)
    }

    async fn explain(&self, report: ReportKind) -> StoreResult<Vec<String>> {
        let sql = format!("EXPLAIN {}", Self::explainable_sql(report));
        let plan: Vec<String> = sqlx::query_scalar(&sql).fetch_all(&self.pool).await?;
        Ok(plan)
    }
}

// ============================================================================
// Report readers, shared by the single reports and the overview snapshot
// ============================================================================

async fn fetch_products_per_category(
    conn: &mut PgConnection,
) -> StoreResult<Vec<CategoryProductCount>> {
    let rows = sqlx::query_as::<_, CategoryProductCount>(PRODUCTS_PER_CATEGORY_SQL)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

/// `None` binds `LIMIT NULL`, which means no limit
async fn fetch_top_spenders(
    conn: &mut PgConnection,
    limit: Option<i64>,
) -> StoreResult<Vec<CustomerSpend>> {
    let rows = sqlx::query_as::<_, CustomerSpend>(TOP_SPENDERS_SQL)
        .bind(limit)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

async fn fetch_recent_orders(conn: &mut PgConnection, limit: i64) -> StoreResult<Vec<RecentOrder>> {
    let rows = sqlx::query_as::<_, RecentOrder>(RECENT_ORDERS_SQL)
        .bind(limit)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

async fn fetch_low_stock(
    conn: &mut PgConnection,
    threshold: i32,
) -> StoreResult<Vec<LowStockProduct>> {
    let rows = sqlx::query_as::<_, LowStockProduct>(LOW_STOCK_SQL)
        .bind(threshold)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

async fn fetch_revenue_per_category(conn: &mut PgConnection) -> StoreResult<Vec<CategoryRevenue>> {
    let rows = sqlx::query_as::<_, CategoryRevenue>(REVENUE_PER_CATEGORY_SQL)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

async fn fetch_total_revenue(conn: &mut PgConnection) -> StoreResult<Decimal> {
    let total: Decimal = sqlx::query_scalar(TOTAL_REVENUE_SQL).fetch_one(conn).await?;
    Ok(total)
}

/// Distinct product ids of an order, ascending. Concurrent orders lock
/// product rows in this order so they cannot deadlock on each other.
fn lock_order(items: &[CreateOrderItem]) -> Vec<i64> {
    let mut ids: Vec<i64> = items.iter().map(|i| i.product_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

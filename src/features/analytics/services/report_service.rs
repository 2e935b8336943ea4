use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::core::config::ReportConfig;
use crate::core::error::{AppError, Result};
use crate::features::analytics::dtos::QueryPlanDto;
use crate::features::analytics::models::{
    CategoryProductCount, CategoryRevenue, CustomerSpend, LowStockProduct, RecentOrder,
    ReportKind, ReportOverview,
};
use crate::modules::store::{CommerceStore, StoreError, StoreResult};
use crate::shared::constants::{DEFAULT_TOP_SPENDERS_LIMIT, LOW_STOCK_THRESHOLD, MAX_RECENT_ORDERS};
use crate::shared::retry::{retry_with_backoff, RetryPolicy};

/// How many customers the top spenders report returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpenderLimit {
    Top(i64),
    All,
}

impl Default for SpenderLimit {
    fn default() -> Self {
        SpenderLimit::Top(DEFAULT_TOP_SPENDERS_LIMIT)
    }
}

/// Read-only reports over the commerce schema.
///
/// Every report runs under a timeout; unavailable storage is retried with
/// backoff inside that budget.
pub struct ReportService {
    store: Arc<dyn CommerceStore>,
    config: ReportConfig,
    retry: RetryPolicy,
}

impl ReportService {
    pub fn new(store: Arc<dyn CommerceStore>, config: ReportConfig) -> Self {
        let retry = RetryPolicy::from(&config);
        Self {
            store,
            config,
            retry,
        }
    }

    /// Resolve the caller's requested timeout against server limits
    pub fn timeout(&self, requested_ms: Option<u64>) -> Duration {
        self.config.effective_timeout(requested_ms)
    }

    async fn run<T, F, Fut>(&self, operation: &'static str, timeout: Duration, op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        let after_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

        match tokio::time::timeout(timeout, retry_with_backoff(&self.retry, operation, op)).await
        {
            Ok(Ok(rows)) => Ok(rows),
            Ok(Err(StoreError::Timeout { message })) => {
                tracing::warn!("{} cancelled by storage: {}", operation, message);
                Err(AppError::Timeout { operation, after_ms })
            }
            Ok(Err(e)) => {
                tracing::error!("{} failed: {:?}", operation, e);
                Err(AppError::Store(e))
            }
            Err(_) => {
                tracing::warn!("{} timed out after {}ms", operation, after_ms);
                Err(AppError::Timeout { operation, after_ms })
            }
        }
    }

    /// Product count for every category, including empty ones
    pub async fn products_per_category(
        &self,
        timeout: Duration,
    ) -> Result<Vec<CategoryProductCount>> {
        self.run("products_per_category", timeout, || {
            self.store.products_per_category()
        })
        .await
    }

    /// Customers ranked by lifetime spend; ties go to the lower customer id
    pub async fn top_spenders(
        &self,
        limit: SpenderLimit,
        timeout: Duration,
    ) -> Result<Vec<CustomerSpend>> {
        let limit = match limit {
            SpenderLimit::Top(n) if n < 1 => {
                return Err(AppError::BadRequest("limit must be at least 1".to_string()))
            }
            SpenderLimit::Top(n) => Some(n),
            SpenderLimit::All => None,
        };

        self.run("top_spenders", timeout, || self.store.top_spenders(limit))
            .await
    }

    /// Newest orders first, at most 1000
    pub async fn recent_orders(
        &self,
        limit: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<RecentOrder>> {
        let limit = match limit {
            Some(n) if n < 1 => {
                return Err(AppError::BadRequest("limit must be at least 1".to_string()))
            }
            Some(n) => n.min(MAX_RECENT_ORDERS),
            None => MAX_RECENT_ORDERS,
        };

        self.run("recent_orders", timeout, || self.store.recent_orders(limit))
            .await
    }

    /// Products with stock strictly below `threshold` (default 10)
    pub async fn low_stock_products(
        &self,
        threshold: Option<i32>,
        timeout: Duration,
    ) -> Result<Vec<LowStockProduct>> {
        let threshold = threshold.unwrap_or(LOW_STOCK_THRESHOLD);
        if threshold < 0 {
            return Err(AppError::BadRequest(
                "threshold must not be negative".to_string(),
            ));
        }

        self.run("low_stock_products", timeout, || {
            self.store.low_stock_products(threshold)
        })
        .await
    }

    pub async fn revenue_per_category(&self, timeout: Duration) -> Result<Vec<CategoryRevenue>> {
        self.run("revenue_per_category", timeout, || {
            self.store.revenue_per_category()
        })
        .await
    }

    pub async fn total_revenue(&self, timeout: Duration) -> Result<Decimal> {
        self.run("total_revenue", timeout, || self.store.total_revenue())
            .await
    }

    /// Every report with default parameters, read from one snapshot so the
    /// totals agree with each other
    pub async fn overview(&self, timeout: Duration) -> Result<ReportOverview> {
        self.run("overview", timeout, || {
            self.store.overview(
                DEFAULT_TOP_SPENDERS_LIMIT,
                MAX_RECENT_ORDERS,
                LOW_STOCK_THRESHOLD,
            )
        })
        .await
    }

    pub async fn explain(&self, report: ReportKind, timeout: Duration) -> Result<QueryPlanDto> {
        let plan = self
            .run("explain", timeout, || self.store.explain(report))
            .await?;
        Ok(QueryPlanDto { report, plan })
    }
}

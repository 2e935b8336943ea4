use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::analytics::models::ReportKind;

/// Per-request timeout shared by every report
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct TimeoutParams {
    /// Cancel the report after this many milliseconds (capped by server config)
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct TopSpendersParams {
    /// Number of customers to return (default: 10)
    #[param(minimum = 1)]
    pub limit: Option<i64>,
    /// Return every customer with orders, ignoring `limit`
    #[serde(default)]
    pub all: bool,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct RecentOrdersParams {
    /// Number of orders to return (default and maximum: 1000)
    #[param(minimum = 1, maximum = 1000)]
    pub limit: Option<i64>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct LowStockParams {
    /// Report products with stock strictly below this value (default: 10)
    #[param(minimum = 0)]
    pub threshold: Option<i32>,
    pub timeout_ms: Option<u64>,
}

/// Execution plan reported by the storage engine
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QueryPlanDto {
    pub report: ReportKind,
    pub plan: Vec<String>,
}

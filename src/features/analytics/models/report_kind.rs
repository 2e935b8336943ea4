use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The five analytical reports served by this service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    ProductsPerCategory,
    TopSpenders,
    RecentOrders,
    LowStock,
    RevenuePerCategory,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::ProductsPerCategory => "products-per-category",
            ReportKind::TopSpenders => "top-spenders",
            ReportKind::RecentOrders => "recent-orders",
            ReportKind::LowStock => "low-stock",
            ReportKind::RevenuePerCategory => "revenue-per-category",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod report_kind;
mod report_rows;

pub use report_kind::ReportKind;
pub use report_rows::{
    CategoryProductCount, CategoryRevenue, CustomerSpend, LowStockProduct, RecentOrder,
    ReportOverview,
};

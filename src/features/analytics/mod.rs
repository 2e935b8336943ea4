//! Query module: read-only reports over the commerce schema.
//!
//! Each report runs under a caller-supplied `timeout_ms` (capped by
//! `REPORT_MAX_TIMEOUT_MS`). Transient storage failures are retried with
//! exponential backoff inside that budget.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/reports/products-per-category` | Product count per category |
//! | GET | `/api/reports/top-spenders` | Top customers by spend |
//! | GET | `/api/reports/recent-orders` | Latest 1000 orders |
//! | GET | `/api/reports/low-stock` | Products with stock below 10 |
//! | GET | `/api/reports/revenue-per-category` | Revenue by category |
//! | GET | `/api/reports/total-revenue` | Grand total |
//! | GET | `/api/reports/overview` | All of the above |
//! | GET | `/api/reports/{report}/plan` | Storage execution plan |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::ReportService;

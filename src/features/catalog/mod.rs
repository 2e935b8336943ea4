//! Schema module: the five commerce entities and the writes that create and
//! maintain them. Integrity (unique email, foreign keys, positive prices and
//! quantities, non-negative stock) is enforced by the storage engine and
//! surfaced as constraint violations.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/customers` | Register customer |
//! | PATCH | `/api/customers/{id}` | Administrative correction |
//! | POST | `/api/categories` | Create category |
//! | POST | `/api/products` | Create product |
//! | PATCH | `/api/products/{id}/price` | Reprice product |
//! | PATCH | `/api/products/{id}/stock` | Adjust stock |
//! | POST | `/api/orders` | Place order |
//! | GET | `/api/orders/{id}` | Order with items |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::CatalogService;

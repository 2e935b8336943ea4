//! Modules layer - infrastructure adapters behind the feature services
//!
//! `store` owns every conversation with the storage engine.

pub mod store;

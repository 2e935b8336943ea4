use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::core::error::Result;
use crate::modules::store::CommerceStore;
use crate::shared::types::ApiResponse;

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Ready once the storage engine answers
async fn readiness(
    State(store): State<Arc<dyn CommerceStore>>,
) -> Result<Json<ApiResponse<()>>> {
    store.ping().await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Storage reachable".to_string()),
        None,
    )))
}

pub fn routes(store: Arc<dyn CommerceStore>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness))
        .with_state(store)
}

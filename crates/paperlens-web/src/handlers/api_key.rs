use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::ApiKeyStatus;
use crate::state::AppState;

pub async fn test_api_key(State(state): State<Arc<AppState>>) -> Result<Json<ApiKeyStatus>, ApiError> {
    let key = state
        .orchestrator
        .config()
        .api_key
        .as_deref()
        .ok_or(ApiError::NoApiKey)?;

    Ok(Json(ApiKeyStatus::found(key)))
}

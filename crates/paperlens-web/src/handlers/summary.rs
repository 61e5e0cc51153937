use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use std::sync::Arc;

use paperlens_core::{AnalysisError, OverallSummary};

use crate::error::ApiError;
use crate::models::SummaryRequest;
use crate::state::AppState;

pub async fn overall_summary(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<OverallSummary>, ApiError> {
    let Json(req) = body?;
    let full_text = req.full_text.ok_or(AnalysisError::MissingField("fullText"))?;

    let summary = state
        .orchestrator
        .overall_summary(&full_text, req.language.as_deref())
        .await?;

    Ok(Json(summary))
}

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use std::sync::Arc;

use paperlens_core::{AnalysisError, PaperSections};

use crate::error::ApiError;
use crate::models::PaperRequest;
use crate::state::AppState;

pub async fn analyze_paper(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PaperRequest>, JsonRejection>,
) -> Result<Json<PaperSections>, ApiError> {
    let Json(req) = body?;
    let url = req.url.ok_or(AnalysisError::MissingField("url"))?;

    let sections = state
        .orchestrator
        .analyze_paper(&url, req.language.as_deref())
        .await?;

    Ok(Json(sections))
}

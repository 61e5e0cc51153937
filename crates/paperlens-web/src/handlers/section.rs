use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use std::sync::Arc;

use paperlens_core::{AnalysisError, SectionAnalysis};

use crate::error::ApiError;
use crate::models::SectionRequest;
use crate::state::AppState;

pub async fn analyze_section(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SectionRequest>, JsonRejection>,
) -> Result<Json<SectionAnalysis>, ApiError> {
    let Json(req) = body?;
    let section_text = req
        .section_text
        .ok_or(AnalysisError::MissingField("sectionText"))?;
    let analysis_type = req
        .analysis_type
        .ok_or(AnalysisError::MissingField("analysisType"))?;

    let analysis = state
        .orchestrator
        .analyze_section(&section_text, &analysis_type, req.language.as_deref())
        .await?;

    Ok(Json(analysis))
}

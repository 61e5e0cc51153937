use thiserror::Error;

use crate::backend::BackendError;
use crate::model::ModelError;

/// Everything that can go wrong while serving one analysis request.
///
/// The first four variants are caused by the caller's input; the rest are
/// failures of the extraction backend or the model service.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("failed to download PDF: {0}")]
    Download(String),
    #[error("no extractable text found in PDF")]
    EmptyText,
    #[error(transparent)]
    Extraction(#[from] BackendError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("model reply is not valid JSON: {0}")]
    ResponseParse(#[source] serde_json::Error),
    #[error("model reply does not match the expected schema: {0}")]
    SchemaMismatch(String),
}

impl AnalysisError {
    /// True for errors caused by the request itself rather than a downstream failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::MissingField(_)
                | AnalysisError::InvalidArgument(_)
                | AnalysisError::Download(_)
                | AnalysisError::EmptyText
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

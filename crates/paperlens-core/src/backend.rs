use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
}

/// Trait for PDF text extraction backends.
///
/// Implementors turn the raw bytes of a downloaded PDF into plain text, one
/// page after another separated by newlines. Extraction is blocking; the
/// [`Orchestrator`](crate::Orchestrator) runs it on the blocking thread pool.
pub trait PdfBackend: Send + Sync {
    /// Extract the full text content of an in-memory PDF document.
    fn extract_text(&self, data: &[u8]) -> Result<String, BackendError>;
}

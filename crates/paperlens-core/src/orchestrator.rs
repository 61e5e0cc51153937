//! The request pipeline behind every analysis endpoint.
//!
//! Each operation validates its input, builds one prompt, performs one
//! single-shot model exchange, validates the reply against the operation's
//! schema and, where the endpoint calls for it, routes the result through the
//! [`Translator`].

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::backend::{BackendError, PdfBackend};
use crate::error::{AnalysisError, Result};
use crate::model::ModelClient;
use crate::prompts::{self, PromptSpec};
use crate::translate::Translator;
use crate::{
    AnalysisType, Config, OverallSummary, PaperSections, SectionAnalysis, SectionReferences,
    SectionSummary, download, reply,
};

pub struct Orchestrator {
    config: Arc<Config>,
    model: Arc<dyn ModelClient>,
    pdf: Arc<dyn PdfBackend>,
    http: reqwest::Client,
}

impl Orchestrator {
    pub fn new(config: Arc<Config>, model: Arc<dyn ModelClient>, pdf: Arc<dyn PdfBackend>) -> Self {
        Self {
            config,
            model,
            pdf,
            http: reqwest::Client::new(),
        }
    }

    /// Use `http` for PDF downloads instead of a fresh client.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Download the PDF at `url`, extract its text and segment it into sections.
    ///
    /// `language` is accepted for symmetry with the other operations but no
    /// translation is applied to segmented papers.
    pub async fn analyze_paper(&self, url: &str, language: Option<&str>) -> Result<PaperSections> {
        let url = required("url", url)?;
        if let Some(language) = language {
            tracing::debug!(language, "language ignored for paper segmentation");
        }

        let full_text = self.fetch_full_text(url).await?;
        tracing::info!(url, chars = full_text.len(), "segmenting paper");

        self.exchange(prompts::segment_paper(&full_text)).await
    }

    /// Summarise a whole paper, translating the result unless `language` is English.
    pub async fn overall_summary(
        &self,
        full_text: &str,
        language: Option<&str>,
    ) -> Result<OverallSummary> {
        let full_text = required("fullText", full_text)?;

        let summary: OverallSummary = self.exchange(prompts::overall_summary(full_text)).await?;
        self.translator().translate(summary, language).await
    }

    /// Summarise one section or collect its references.
    ///
    /// `analysis_type` is validated before any model call is made. The result
    /// always passes through the translator, which leaves English untouched.
    pub async fn analyze_section(
        &self,
        section_text: &str,
        analysis_type: &str,
        language: Option<&str>,
    ) -> Result<SectionAnalysis> {
        let section_text = required("sectionText", section_text)?;
        let analysis_type: AnalysisType = required("analysisType", analysis_type)?.parse()?;
        let translator = self.translator();

        match analysis_type {
            AnalysisType::Summary => {
                let summary: SectionSummary =
                    self.exchange(prompts::section_summary(section_text)).await?;
                Ok(SectionAnalysis::Summary(
                    translator.translate(summary, language).await?,
                ))
            }
            AnalysisType::References => {
                let references: SectionReferences =
                    self.exchange(prompts::section_references(section_text)).await?;
                Ok(SectionAnalysis::References(
                    translator.translate(references, language).await?,
                ))
            }
        }
    }

    /// Download the PDF at `url` and return its extracted text.
    ///
    /// Fails with [`AnalysisError::EmptyText`] when the document has no text
    /// layer (e.g. scanned pages), so the model is never sent an empty paper.
    pub async fn fetch_full_text(&self, url: &str) -> Result<String> {
        let data = download::fetch_pdf(
            &self.http,
            url,
            self.config.download_timeout(),
            self.config.max_pdf_bytes,
        )
        .await?;

        let full_text = self.extract_blocking(data).await?;
        if full_text.trim().is_empty() {
            tracing::warn!(url, "PDF contains no extractable text");
            return Err(AnalysisError::EmptyText);
        }
        Ok(full_text)
    }

    /// Run the (blocking) PDF backend off the async runtime.
    async fn extract_blocking(&self, data: Vec<u8>) -> Result<String> {
        let pdf = Arc::clone(&self.pdf);
        let text = tokio::task::spawn_blocking(move || pdf.extract_text(&data))
            .await
            .map_err(|e| BackendError::ExtractionError(format!("extraction task failed: {e}")))??;
        Ok(text)
    }

    /// One instruction + payload in, one reply out, parsed into `T`.
    async fn exchange<T: DeserializeOwned>(&self, prompt: PromptSpec) -> Result<T> {
        tracing::debug!(
            model = self.model.model_name(),
            payload_chars = prompt.payload.len(),
            "calling model"
        );
        let raw = self
            .model
            .complete(&prompt.instruction, &prompt.payload, self.config.model_timeout())
            .await?;
        reply::parse_reply(&raw)
    }

    fn translator(&self) -> Translator<'_> {
        Translator::new(self.model.as_ref(), self.config.model_timeout())
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        Err(AnalysisError::MissingField(field))
    } else {
        Ok(value)
    }
}

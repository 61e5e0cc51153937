use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

pub mod backend;
pub mod config_file;
pub mod download;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod prompts;
pub mod reply;
pub mod translate;

// Re-export for convenience
pub use backend::{BackendError, PdfBackend};
pub use error::{AnalysisError, Result};
pub use model::{MockModel, MockReply, ModelClient, ModelError, OpenAiClient};
pub use orchestrator::Orchestrator;
pub use translate::{Translator, is_english};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

// ── Results ─────────────────────────────────────────────────────────────

/// A paper split into its titled sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperSections {
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub title: String,
    pub original_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallSummary {
    pub overall_summary: String,
    pub main_findings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub section_summary: String,
    pub key_findings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionReferences {
    pub related_topics: Vec<RelatedTopic>,
    pub references: Vec<CitedReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedTopic {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// A reference matched to an in-text citation marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitedReference {
    /// Citation marker as it appears in the text; models sometimes send a number.
    #[serde(deserialize_with = "string_or_number")]
    pub citation: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Citation {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Citation::deserialize(deserializer)? {
        Citation::Text(s) => s,
        Citation::Number(n) => n.to_string(),
    })
}

/// Result of `/analyze-section`; serializes as the inner shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SectionAnalysis {
    Summary(SectionSummary),
    References(SectionReferences),
}

// ── Analysis type ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisType {
    Summary,
    References,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Summary => "summary",
            AnalysisType::References => "references",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "summary" => Ok(AnalysisType::Summary),
            "references" => Ok(AnalysisType::References),
            other => Err(AnalysisError::InvalidArgument(format!(
                "invalid analysis type \"{other}\" (expected \"summary\" or \"references\")"
            ))),
        }
    }
}

// ── Configuration ───────────────────────────────────────────────────────

/// Process-wide settings, resolved once at startup and shared read-only.
#[derive(Clone)]
pub struct Config {
    /// Model API key; read from `OPENAI_API_KEY` only.
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub model_timeout_secs: u64,
    pub download_timeout_secs: u64,
    /// Largest PDF body accepted from a download.
    pub max_pdf_bytes: usize,
}

impl Config {
    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("model_timeout_secs", &self.model_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("max_pdf_bytes", &self.max_pdf_bytes)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            model_timeout_secs: 60,
            download_timeout_secs: 60,
            max_pdf_bytes: 50 * 1024 * 1024,
        }
    }
}

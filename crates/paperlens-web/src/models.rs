use serde::{Deserialize, Serialize};

// ── Request DTOs ────────────────────────────────────────────────────────
//
// Required fields are `Option` so a missing field becomes our own 400
// instead of a deserialization rejection.

#[derive(Debug, Deserialize)]
pub struct PaperRequest {
    pub url: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub full_text: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRequest {
    pub section_text: Option<String>,
    pub analysis_type: Option<String>,
    pub language: Option<String>,
}

// ── Response DTOs ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ApiKeyStatus {
    pub message: String,
}

impl ApiKeyStatus {
    /// Report a configured key, revealing only its first six characters.
    pub fn found(key: &str) -> Self {
        let prefix: String = key.chars().take(6).collect();
        Self {
            message: format!("API key found: {prefix}..."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_status_shows_only_prefix() {
        assert_eq!(
            ApiKeyStatus::found("sk-proj-abcdef").message,
            "API key found: sk-pro..."
        );
        assert_eq!(ApiKeyStatus::found("abc").message, "API key found: abc...");
    }

    #[test]
    fn section_request_reads_camel_case() {
        let req: SectionRequest =
            serde_json::from_str(r#"{"sectionText": "t", "analysisType": "summary"}"#).unwrap();
        assert_eq!(req.section_text.as_deref(), Some("t"));
        assert_eq!(req.analysis_type.as_deref(), Some("summary"));
        assert!(req.language.is_none());
    }
}

//! Translation of structured results into another language.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AnalysisError, Result};
use crate::model::ModelClient;
use crate::{prompts, reply};

/// True when `language` means "leave the content in English".
///
/// Absent, empty and any casing of `en` all count.
pub fn is_english(language: Option<&str>) -> bool {
    match language.map(str::trim) {
        None | Some("") => true,
        Some(lang) => lang.eq_ignore_ascii_case("en"),
    }
}

/// Routes structured results through the model for translation.
pub struct Translator<'a> {
    model: &'a dyn ModelClient,
    timeout: Duration,
}

impl<'a> Translator<'a> {
    pub fn new(model: &'a dyn ModelClient, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Translate the string leaves of `content` into `language`.
    ///
    /// English targets return `content` untouched without calling the model.
    /// Otherwise the reply must keep the exact structure of `content`.
    pub async fn translate_value(&self, content: Value, language: Option<&str>) -> Result<Value> {
        if is_english(language) {
            return Ok(content);
        }
        let language = language.unwrap_or_default().trim();

        let content_json = serde_json::to_string(&content)
            .map_err(|e| AnalysisError::SchemaMismatch(e.to_string()))?;
        let prompt = prompts::translate(&content_json, language);

        tracing::debug!(language, model = self.model.model_name(), "translating result");
        let raw = self
            .model
            .complete(&prompt.instruction, &prompt.payload, self.timeout)
            .await?;

        let translated = reply::parse_json(&raw)?;
        reply::check_same_shape(&content, &translated).map_err(|path| {
            AnalysisError::SchemaMismatch(format!("translation changed structure at {path}"))
        })?;
        Ok(translated)
    }

    /// Typed wrapper around [`translate_value`](Self::translate_value) that
    /// re-validates the translation against the result schema.
    pub async fn translate<T>(&self, content: T, language: Option<&str>) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        if is_english(language) {
            return Ok(content);
        }
        let value = serde_json::to_value(&content)
            .map_err(|e| AnalysisError::SchemaMismatch(e.to_string()))?;
        let translated = self.translate_value(value, language).await?;
        reply::validate(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MockModel, MockReply};
    use crate::OverallSummary;
    use serde_json::json;

    const TIMEOUT: Duration = Duration::from_secs(60);

    #[test]
    fn english_detection() {
        assert!(is_english(None));
        assert!(is_english(Some("")));
        assert!(is_english(Some("en")));
        assert!(is_english(Some("EN")));
        assert!(is_english(Some(" En ")));
        assert!(!is_english(Some("es")));
        assert!(!is_english(Some("english")));
    }

    #[tokio::test]
    async fn english_is_identity_without_model_call() {
        let mock = MockModel::replying("{}");
        let translator = Translator::new(&mock, TIMEOUT);
        let content = json!({"overallSummary": "s", "mainFindings": ["a"]});
        let out = translator
            .translate_value(content.clone(), Some("EN"))
            .await
            .unwrap();
        assert_eq!(serde_json::to_string(&out).unwrap(), serde_json::to_string(&content).unwrap());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn translates_and_sends_content_as_json() {
        let mock = MockModel::replying(
            r#"{"overallSummary": "resumen", "mainFindings": ["uno", "dos", "tres"]}"#,
        );
        let translator = Translator::new(&mock, TIMEOUT);
        let summary = OverallSummary {
            overall_summary: "summary".into(),
            main_findings: vec!["one".into(), "two".into(), "three".into()],
        };
        let out = translator.translate(summary, Some("es")).await.unwrap();
        assert_eq!(out.overall_summary, "resumen");
        assert_eq!(out.main_findings, vec!["uno", "dos", "tres"]);

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].instruction.contains("\"es\""));
        let sent: Value = serde_json::from_str(&calls[0].payload).unwrap();
        assert_eq!(sent["overallSummary"], "summary");
        assert_eq!(calls[0].timeout, TIMEOUT);
    }

    #[tokio::test]
    async fn changed_structure_is_rejected() {
        let mock = MockModel::replying(r#"{"resumenGeneral": "x", "mainFindings": []}"#);
        let translator = Translator::new(&mock, TIMEOUT);
        let err = translator
            .translate_value(json!({"overallSummary": "s", "mainFindings": []}), Some("es"))
            .await
            .unwrap_err();
        match err {
            AnalysisError::SchemaMismatch(msg) => assert!(msg.contains("overallSummary")),
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_reply_is_a_parse_error() {
        let mock = MockModel::replying("Lo siento, no puedo.");
        let translator = Translator::new(&mock, TIMEOUT);
        let err = translator
            .translate_value(json!({"a": "b"}), Some("es"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::ResponseParse(_)));
    }

    #[tokio::test]
    async fn model_failure_propagates() {
        let mock = MockModel::new(MockReply::Timeout);
        let translator = Translator::new(&mock, TIMEOUT);
        let err = translator
            .translate_value(json!({"a": "b"}), Some("de"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Model(_)));
    }
}

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ModelClient, ModelError};
use crate::Config;

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    api_key: Option<String>,
    model: String,
    api_base: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
            api_base: api_base.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api_key.clone(),
            config.model.clone(),
            config.api_base.clone(),
        )
    }

    /// Reuse an existing connection pool.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

impl ModelClient for OpenAiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn complete<'a>(
        &'a self,
        instruction: &'a str,
        payload: &'a str,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<String, ModelError>> + Send + 'a>> {
        Box::pin(async move {
            let api_key = self.api_key.as_deref().ok_or(ModelError::MissingApiKey)?;

            let request = ChatRequest {
                model: &self.model,
                messages: [
                    ChatMessage {
                        role: "system",
                        content: instruction,
                    },
                    ChatMessage {
                        role: "user",
                        content: payload,
                    },
                ],
            };

            let resp = self
                .http
                .post(self.endpoint())
                .bearer_auth(api_key)
                .json(&request)
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| classify(e, timeout))?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(ModelError::Http {
                    status: status.as_u16(),
                    body,
                });
            }

            let data: ChatResponse = resp.json().await.map_err(|e| classify(e, timeout))?;

            data.choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .filter(|content| !content.trim().is_empty())
                .ok_or(ModelError::EmptyReply)
        })
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> ModelError {
    if err.is_timeout() {
        ModelError::Timeout(timeout)
    } else {
        ModelError::Request(err.to_string())
    }
}

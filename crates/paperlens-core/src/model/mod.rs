//! Single-shot chat-completion clients.
//!
//! Every analysis step is one exchange: a fixed instruction goes in as the
//! system message, the dynamic payload as the user message, and the text of
//! the one reply is the whole answer.

pub mod mock;
pub mod openai;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

pub use mock::{MockModel, MockReply, RecordedCall};
pub use openai::OpenAiClient;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("no model API key configured")]
    MissingApiKey,
    #[error("model request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("model request failed: {0}")]
    Request(String),
    #[error("model API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("model returned an empty reply")]
    EmptyReply,
}

/// A text-generation service that answers one instruction + payload pair.
pub trait ModelClient: Send + Sync {
    /// Name of the model requests are sent to, for logging.
    fn model_name(&self) -> &str;

    /// Submit `instruction` as the system message and `payload` as the user
    /// message and wait at most `timeout` for the reply text.
    fn complete<'a>(
        &'a self,
        instruction: &'a str,
        payload: &'a str,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<String, ModelError>> + Send + 'a>>;
}

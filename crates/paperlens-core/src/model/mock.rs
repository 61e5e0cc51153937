//! Mock model client for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{ModelClient, ModelError};

/// A configurable reply for [`MockModel`].
#[derive(Clone, Debug)]
pub enum MockReply {
    /// Reply with this text.
    Text(String),
    /// Fail as if the service returned this HTTP status.
    Http(u16),
    /// Fail as if the request timed out.
    Timeout,
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        MockReply::Text(text.into())
    }

    fn into_result(self, timeout: Duration) -> Result<String, ModelError> {
        match self {
            MockReply::Text(text) => Ok(text),
            MockReply::Http(status) => Err(ModelError::Http {
                status,
                body: "mock failure".into(),
            }),
            MockReply::Timeout => Err(ModelError::Timeout(timeout)),
        }
    }
}

/// One recorded exchange with the mock.
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub instruction: String,
    pub payload: String,
    pub timeout: Duration,
}

/// A hand-rolled mock implementing [`ModelClient`] for tests.
///
/// Replies come from a sequence (one per call, last repeated once exhausted)
/// and every call is recorded for later assertions.
pub struct MockModel {
    /// Stored reversed so `pop()` yields the next reply.
    replies: Mutex<Vec<MockReply>>,
    fallback: MockReply,
    calls: Mutex<Vec<RecordedCall>>,
    call_count: AtomicUsize,
}

impl MockModel {
    /// Create a mock that always returns `reply`.
    pub fn new(reply: MockReply) -> Self {
        Self {
            replies: Mutex::new(Vec::new()),
            fallback: reply,
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Create a mock that always answers with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(MockReply::text(text))
    }

    /// Create a mock that returns replies in order, repeating the last one.
    pub fn with_sequence(mut replies: Vec<MockReply>) -> Self {
        assert!(!replies.is_empty(), "sequence must have at least one reply");
        replies.reverse();
        let fallback = replies[0].clone();
        Self {
            replies: Mutex::new(replies),
            fallback,
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl ModelClient for MockModel {
    fn model_name(&self) -> &str {
        "mock"
    }

    fn complete<'a>(
        &'a self,
        instruction: &'a str,
        payload: &'a str,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<String, ModelError>> + Send + 'a>> {
        Box::pin(async move {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.calls.lock().unwrap().push(RecordedCall {
                instruction: instruction.to_string(),
                payload: payload.to_string(),
                timeout,
            });
            self.next_reply().into_result(timeout)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sequence_repeats_last_reply() {
        let mock = MockModel::with_sequence(vec![MockReply::text("a"), MockReply::text("b")]);
        let t = Duration::from_secs(1);
        assert_eq!(mock.complete("i", "p", t).await.unwrap(), "a");
        assert_eq!(mock.complete("i", "p", t).await.unwrap(), "b");
        assert_eq!(mock.complete("i", "p", t).await.unwrap(), "b");
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn records_instruction_and_payload() {
        let mock = MockModel::new(MockReply::Http(503));
        let err = mock
            .complete("system", "user", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::Http { status: 503, .. }));
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].instruction, "system");
        assert_eq!(calls[0].payload, "user");
        assert_eq!(calls[0].timeout, Duration::from_secs(5));
    }
}

use async_trait::async_trait;
use keynudge_common::{Response, Suggestion};

/// Shows a suggestion to the user and reports their choice.
///
/// `None` means the prompt went unanswered and is treated like a dismissal.
/// Implementations may wait on the user for as long as they like.
#[async_trait]
pub trait PresentationSink: Send + Sync {
    async fn present(&self, suggestion: &Suggestion) -> Option<Response>;
}

/// Answers every suggestion the same way without showing anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedResponse(pub Option<Response>);

#[async_trait]
impl PresentationSink for FixedResponse {
    async fn present(&self, _suggestion: &Suggestion) -> Option<Response> {
        self.0
    }
}

//! External service ports the cascade is built against.
//!
//! The matcher never talks to Ollama, or anything else, directly — it calls
//! through these traits so the cascade stays testable and so callers can
//! swap in their own embedder/LLM backend. Concrete Ollama-backed adapters
//! live in [`crate::matcher::ollama`].

use crate::error::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Batch embedding backend used by Layer 2's window scan.
///
/// Implementations must return one unit-normalized vector per input text, in
/// the same order as `texts`, all of the same dimension.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Window-relative position returned by an `LlmClient::find_position` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionQuery {
    /// Offset of the chunk's start within the window, in bytes.
    pub start_offset: usize,
    /// Offset of the chunk's end within the window, in bytes.
    pub end_offset: usize,
    /// Whether the model reports having located the chunk at all.
    pub found: bool,
}

/// LLM backend used by Layer 3's position query.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Ask the model where `chunk_text` sits inside `window_text`. Offsets in
    /// the returned `PositionQuery` are relative to `window_text`, not the
    /// full target.
    async fn find_position(&self, chunk_text: &str, window_text: &str) -> Result<PositionQuery>;
}

/// Progress reporting sink. Percent is cumulative across the whole cascade,
/// `0..=100`.
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, percent: u8, stage: &str, message: &str);
}

/// Cooperative cancellation flag, checked between chunks and between layers.
/// Cheap to clone and share across tasks — backed by an `Arc<AtomicBool>`.
#[derive(Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Bundle of optional ports passed into [`crate::matcher::bulletproof_match`].
/// Everything is optional: an absent `Embedder` short-circuits Layer 2, an
/// absent `LlmClient` short-circuits Layer 3, and an absent progress callback
/// or cancellation token simply means nobody's watching.
#[derive(Default, Clone)]
pub struct MatcherPorts<'a> {
    pub embedder: Option<&'a (dyn Embedder)>,
    pub llm_client: Option<&'a (dyn LlmClient)>,
    pub progress: Option<&'a (dyn ProgressCallback)>,
    pub cancellation: Option<CancellationToken>,
}

impl<'a> MatcherPorts<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_embedder(mut self, embedder: &'a dyn Embedder) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn with_llm_client(mut self, llm_client: &'a dyn LlmClient) -> Self {
        self.llm_client = Some(llm_client);
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map(|c| c.is_cancelled())
            .unwrap_or(false)
    }

    pub(crate) fn report(&self, percent: u8, stage: &str, message: &str) {
        if let Some(progress) = self.progress {
            progress.on_progress(percent, stage, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_token_starts_uncancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn cancellation_token_is_shared_across_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn ports_default_to_nothing_configured() {
        let ports = MatcherPorts::new();
        assert!(ports.embedder.is_none());
        assert!(ports.llm_client.is_none());
        assert!(!ports.is_cancelled());
    }
}

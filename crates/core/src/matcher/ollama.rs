//! Concrete Ollama-backed port adapters.
//!
//! Wraps the existing [`crate::ai::client::OllamaClient`] to satisfy the
//! matcher's `Embedder` and `LlmClient` ports, so the crate ships a usable
//! default rather than leaving the ports permanently abstract.

use super::ports::{Embedder, LlmClient, PositionQuery};
use crate::ai::client::{GenerateRequest, OllamaClient};
use crate::config::ModelConfig;
use crate::error::{Result, XzeError};
use crate::semantic::embeddings::generate_embeddings_batch;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

/// `Embedder` adapter backed by Ollama's `/api/embeddings` endpoint.
pub struct OllamaEmbedder {
    client: Arc<OllamaClient>,
    model: String,
    batch_size: usize,
}

impl OllamaEmbedder {
    pub fn new(client: Arc<OllamaClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            batch_size: 16,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        generate_embeddings_batch(&self.client, &self.model, texts, self.batch_size)
            .await
            .map_err(|e| XzeError::service_failure(e.to_string()))
    }
}

/// `LlmClient` adapter backed by Ollama's `/api/generate` endpoint, using
/// its structured JSON output mode so the position query is reliably
/// parseable.
pub struct OllamaLlmClient {
    client: Arc<OllamaClient>,
    model_config: ModelConfig,
}

impl OllamaLlmClient {
    pub fn new(client: Arc<OllamaClient>, model_config: ModelConfig) -> Self {
        Self {
            client,
            model_config,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PositionResponse {
    start_offset: usize,
    end_offset: usize,
    found: bool,
}

fn position_prompt(chunk_text: &str, window_text: &str) -> String {
    format!(
        "You are locating a document chunk inside a larger window of text.\n\
         Respond with ONLY a JSON object of the shape \
         {{\"start_offset\": <int>, \"end_offset\": <int>, \"found\": <bool>}}, \
         where start_offset/end_offset are byte offsets relative to the start of WINDOW, \
         and found is false if the chunk does not appear in the window.\n\n\
         CHUNK:\n{chunk_text}\n\n\
         WINDOW:\n{window_text}"
    )
}

#[async_trait]
impl LlmClient for OllamaLlmClient {
    async fn find_position(&self, chunk_text: &str, window_text: &str) -> Result<PositionQuery> {
        let request = GenerateRequest {
            model: self.model_config.llm.clone(),
            prompt: position_prompt(chunk_text, window_text),
            stream: false,
            options: Some((&self.model_config).into()),
            format: None,
        };

        let raw = self.client.generate_json(request).await?;

        let parsed: PositionResponse = serde_json::from_str(raw.trim())
            .map_err(|e| XzeError::service_failure(format!("malformed position response: {e}")))?;

        Ok(PositionQuery {
            start_offset: parsed.start_offset,
            end_offset: parsed.end_offset,
            found: parsed.found,
        })
    }
}

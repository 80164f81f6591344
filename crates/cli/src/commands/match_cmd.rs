//! Match command implementation
//!
//! Reads a target text file and a JSON array of source chunks, runs the
//! bulletproof re-anchoring cascade, and writes the resulting match outcome.

use clap::Args;
use reanchor_core::matcher::{
    bulletproof_match, CancellationToken, MatcherPorts, OllamaEmbedder, OllamaLlmClient,
    SourceChunk,
};
use reanchor_core::{config::MatcherConfig, Result, XzeError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::commands::CliCommand;
use crate::config::OutputFormat;
use crate::output::OutputFormatter;

/// Re-anchor pre-cleanup document chunks onto a post-cleanup target text
#[derive(Debug, Args)]
pub struct MatchCommand {
    /// Path to the post-cleanup target text (UTF-8 plain text or markdown)
    #[arg(short, long)]
    pub target: PathBuf,

    /// Path to a JSON file containing an array of source chunks
    #[arg(short, long)]
    pub chunks: PathBuf,

    /// Path to write the match outcome as JSON (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Matcher configuration file (thresholds, Ollama connection, model names)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip Layers 2/3 (embedding scan, LLM query) entirely, relying on
    /// fuzzy matching and interpolation only
    #[arg(long)]
    pub no_ollama: bool,

    /// Abort the run if Ollama is unreachable rather than degrading to
    /// fuzzy-plus-interpolation matching
    #[arg(long)]
    pub require_ollama: bool,
}

impl CliCommand for MatchCommand {
    async fn execute(&self) -> Result<()> {
        let config = match &self.config {
            Some(path) => MatcherConfig::from_file(path)?,
            None => MatcherConfig::default(),
        };
        config.validate()?;

        let target = std::fs::read_to_string(&self.target).map_err(|e| {
            XzeError::invalid_input(format!(
                "failed to read target file {}: {e}",
                self.target.display()
            ))
        })?;
        if target.is_empty() {
            return Err(XzeError::invalid_input("target text must not be empty"));
        }

        let chunk_json = std::fs::read_to_string(&self.chunks).map_err(|e| {
            XzeError::invalid_input(format!(
                "failed to read chunks file {}: {e}",
                self.chunks.display()
            ))
        })?;
        let chunks: Vec<SourceChunk> = serde_json::from_str(&chunk_json)
            .map_err(|e| XzeError::invalid_input(format!("malformed chunks file: {e}")))?;

        tracing::info!(chunks = chunks.len(), target_bytes = target.len(), "Starting match run");

        let client = if self.no_ollama {
            None
        } else {
            let client = Arc::new(reanchor_core::ai::client::OllamaClient::with_timeout(
                config.ollama.url.clone(),
                Duration::from_secs(config.ollama.timeout_seconds),
            ));
            match client.health_check().await {
                Ok(true) => Some(client),
                _ if self.require_ollama => {
                    return Err(XzeError::network(format!(
                        "Ollama at {} is unreachable and --require-ollama was set",
                        config.ollama.url
                    )));
                }
                _ => {
                    tracing::warn!(
                        "Ollama at {} unreachable, falling back to fuzzy matching + interpolation",
                        config.ollama.url
                    );
                    None
                }
            }
        };

        let embedder = client
            .as_ref()
            .map(|c| OllamaEmbedder::new(c.clone(), config.ollama.models.embedding.clone()));
        let llm_client = client
            .as_ref()
            .map(|c| OllamaLlmClient::new(c.clone(), config.ollama.models.clone()));

        let cancellation = CancellationToken::new();
        let mut ports = MatcherPorts::new().with_cancellation(cancellation);
        if let Some(embedder) = embedder.as_ref() {
            ports = ports.with_embedder(embedder);
        }
        if let Some(llm_client) = llm_client.as_ref() {
            ports = ports.with_llm_client(llm_client);
        }

        let outcome = bulletproof_match(&target, chunks, ports, &config.thresholds).await?;

        tracing::info!(
            total = outcome.stats.total,
            exact = outcome.stats.exact,
            synthetic = outcome.stats.synthetic,
            "Match run complete"
        );

        match &self.output {
            Some(path) => {
                let json = serde_json::to_string_pretty(&outcome)?;
                std::fs::write(path, json)?;
                println!("Wrote match outcome to {}", path.display());
            }
            None => {
                let mut formatter = OutputFormatter::with_format(OutputFormat::Json, false);
                formatter.output(&outcome)?;
            }
        }

        for warning in &outcome.warnings {
            tracing::warn!("{warning}");
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "match"
    }

    fn validate(&self) -> Result<()> {
        if !self.target.exists() {
            return Err(XzeError::not_found(format!(
                "target file does not exist: {}",
                self.target.display()
            )));
        }
        if !self.chunks.exists() {
            return Err(XzeError::not_found(format!(
                "chunks file does not exist: {}",
                self.chunks.display()
            )));
        }
        Ok(())
    }
}

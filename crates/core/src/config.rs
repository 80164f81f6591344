//! Configuration types for the reanchor core library

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for a matcher run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: String,
    /// Ollama connection and model settings (Layer 2 embeddings, Layer 3 LLM query)
    #[serde(default)]
    pub ollama: OllamaConfig,
    /// Similarity thresholds used across the four cascade layers
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    /// Layer 2 embedding window scan tuning
    #[serde(default)]
    pub embedding_scan: EmbeddingScanConfig,
    /// Layer 3 LLM position query tuning
    #[serde(default)]
    pub llm_query: LlmQueryConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            ollama: OllamaConfig::default(),
            thresholds: ThresholdConfig::default(),
            embedding_scan: EmbeddingScanConfig::default(),
            llm_query: LlmQueryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl MatcherConfig {
    /// Load configuration from a file, trying YAML then JSON
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        match serde_yaml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(_) => {
                let config = serde_json::from_str(&content)?;
                Ok(config)
            }
        }
    }

    /// Save configuration to a file as YAML
    pub fn to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration invariants
    pub fn validate(&self) -> Result<()> {
        if !self.ollama.url.starts_with("http://") && !self.ollama.url.starts_with("https://") {
            return Err(crate::XzeError::validation(
                "Ollama URL must use http or https scheme",
            ));
        }

        if self.ollama.models.embedding.is_empty() {
            return Err(crate::XzeError::validation(
                "Embedding model cannot be empty",
            ));
        }

        if self.ollama.models.llm.is_empty() {
            return Err(crate::XzeError::validation("LLM model cannot be empty"));
        }

        self.thresholds.validate()?;

        if self.embedding_scan.max_windows == 0 {
            return Err(crate::XzeError::validation(
                "embedding_scan.max_windows must be greater than zero",
            ));
        }

        if !(0.0..1.0).contains(&self.embedding_scan.window_overlap) {
            return Err(crate::XzeError::validation(
                "embedding_scan.window_overlap must be in [0.0, 1.0)",
            ));
        }

        if self.llm_query.window_radius_chars == 0 {
            return Err(crate::XzeError::validation(
                "llm_query.window_radius_chars must be greater than zero",
            ));
        }

        Ok(())
    }
}

/// Ollama connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server base URL
    #[serde(default = "default_ollama_url")]
    pub url: String,
    /// Model configuration
    #[serde(default)]
    pub models: ModelConfig,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Maximum concurrent requests issued to Ollama
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: default_ollama_url(),
            models: ModelConfig::default(),
            timeout_seconds: default_timeout(),
            max_concurrent_requests: default_max_concurrent(),
            retry: RetryConfig::default(),
        }
    }
}

/// Model selection for the two port adapters the matcher depends on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Embedding model used by Layer 2's window scan
    #[serde(default = "default_embedding_model")]
    pub embedding: String,
    /// LLM model used by Layer 3's position query
    #[serde(default = "default_llm_model")]
    pub llm: String,
    /// Context window size for the LLM model, in tokens
    #[serde(default = "default_context_window")]
    pub context_window: usize,
    /// Generation temperature for the LLM model
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            embedding: default_embedding_model(),
            llm: default_llm_model(),
            context_window: default_context_window(),
            temperature: default_temperature(),
        }
    }
}

/// Retry configuration for transient Ollama failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// Initial retry delay in milliseconds
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    /// Maximum retry delay in milliseconds
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Similarity thresholds used across the four cascade layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Layer 1 normalized exact-match threshold
    #[serde(default = "default_normalized_threshold")]
    pub normalized: f32,
    /// Layer 1 multi-anchor search threshold
    #[serde(default = "default_multi_anchor_threshold")]
    pub multi_anchor: f32,
    /// Layer 1 sliding-window minimum admissible similarity
    #[serde(default = "default_sliding_window_min")]
    pub sliding_window_min: f32,
    /// Layer 1 sliding-window similarity above which a match counts as high confidence
    #[serde(default = "default_sliding_window_high")]
    pub sliding_window_high: f32,
    /// Layer 2 embedding match threshold (medium confidence)
    #[serde(default = "default_embedding_medium")]
    pub embedding_medium: f32,
    /// Layer 2 embedding match threshold (high confidence)
    #[serde(default = "default_embedding_high")]
    pub embedding_high: f32,
    /// Layer 3 LLM-reported confidence floor
    #[serde(default = "default_llm_confidence_floor")]
    pub llm_confidence_floor: f32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            normalized: default_normalized_threshold(),
            multi_anchor: default_multi_anchor_threshold(),
            sliding_window_min: default_sliding_window_min(),
            sliding_window_high: default_sliding_window_high(),
            embedding_medium: default_embedding_medium(),
            embedding_high: default_embedding_high(),
            llm_confidence_floor: default_llm_confidence_floor(),
        }
    }
}

impl ThresholdConfig {
    fn validate(&self) -> Result<()> {
        let checks = [
            ("normalized", self.normalized),
            ("multi_anchor", self.multi_anchor),
            ("sliding_window_min", self.sliding_window_min),
            ("sliding_window_high", self.sliding_window_high),
            ("embedding_medium", self.embedding_medium),
            ("embedding_high", self.embedding_high),
            ("llm_confidence_floor", self.llm_confidence_floor),
        ];
        for (name, value) in checks {
            if !(0.0..=1.0).contains(&value) {
                return Err(crate::XzeError::validation(format!(
                    "thresholds.{name} must be in [0.0, 1.0], got {value}"
                )));
            }
        }
        if self.sliding_window_high < self.sliding_window_min {
            return Err(crate::XzeError::validation(
                "thresholds.sliding_window_high must be >= sliding_window_min",
            ));
        }
        if self.embedding_high < self.embedding_medium {
            return Err(crate::XzeError::validation(
                "thresholds.embedding_high must be >= embedding_medium",
            ));
        }
        Ok(())
    }
}

/// Layer 2 embedding window scan tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingScanConfig {
    /// Maximum number of windows to embed and compare per unmatched chunk
    #[serde(default = "default_max_windows")]
    pub max_windows: usize,
    /// Fractional overlap between consecutive windows (stride = len * (1 - overlap))
    #[serde(default = "default_window_overlap")]
    pub window_overlap: f32,
}

impl Default for EmbeddingScanConfig {
    fn default() -> Self {
        Self {
            max_windows: default_max_windows(),
            window_overlap: default_window_overlap(),
        }
    }
}

/// Layer 3 LLM position query tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmQueryConfig {
    /// Number of characters of target text sent around the chunk's estimated position
    #[serde(default = "default_window_radius")]
    pub window_radius_chars: usize,
}

impl Default for LlmQueryConfig {
    fn default() -> Self {
        Self {
            window_radius_chars: default_window_radius(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format (json, pretty, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Log file path (optional)
    pub file: Option<PathBuf>,
    /// Whether to log to stdout
    #[serde(default = "default_true")]
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            stdout: true,
        }
    }
}

// Default value functions
fn default_true() -> bool {
    true
}
fn default_version() -> String {
    "1.0".to_string()
}
fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}
fn default_llm_model() -> String {
    "llama3".to_string()
}
fn default_timeout() -> u64 {
    300
}
fn default_max_concurrent() -> usize {
    4
}
fn default_context_window() -> usize {
    4096
}
fn default_temperature() -> f32 {
    0.1
}
fn default_max_retries() -> usize {
    3
}
fn default_initial_delay() -> u64 {
    1000
}
fn default_max_delay() -> u64 {
    30000
}
fn default_backoff_multiplier() -> f64 {
    2.0
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_normalized_threshold() -> f32 {
    0.95
}
fn default_multi_anchor_threshold() -> f32 {
    0.85
}
fn default_sliding_window_min() -> f32 {
    0.75
}
fn default_sliding_window_high() -> f32 {
    0.85
}
fn default_embedding_medium() -> f32 {
    0.85
}
fn default_embedding_high() -> f32 {
    0.95
}
fn default_llm_confidence_floor() -> f32 {
    0.7
}
fn default_max_windows() -> usize {
    1000
}
fn default_window_overlap() -> f32 {
    0.5
}
fn default_window_radius() -> usize {
    5000
}

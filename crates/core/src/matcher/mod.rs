//! Bulletproof Chunk Re-Anchoring Engine.
//!
//! A four-layer cascade — fuzzy matching, embedding window scan, LLM
//! position query, deterministic interpolation — that re-anchors pre-cleanup
//! document chunks onto the byte offsets of a post-cleanup target text,
//! guaranteeing that every chunk receives a result.
//!
//! # Components
//!
//! - [`normalize`] — text normalization with byte-offset back-projection
//! - [`similarity`] — string and vector similarity kernels
//! - [`layer1_fuzzy`] — Layer 1: exact/normalized/anchor/sliding-window matching
//! - [`layer2_embedding`] — Layer 2: embedding window scan
//! - [`layer3_llm`] — Layer 3: LLM position query
//! - [`layer4_interpolation`] — Layer 4: deterministic geometric fill
//! - [`ports`] — the `Embedder`/`LlmClient`/`ProgressCallback`/`CancellationToken` traits
//! - [`ollama`] — concrete Ollama-backed port adapters
//! - [`orchestrator`] — [`bulletproof_match`], the single entry point

pub mod layer1_fuzzy;
pub mod layer2_embedding;
pub mod layer3_llm;
pub mod layer4_interpolation;
pub mod normalize;
pub mod ollama;
pub mod orchestrator;
pub mod ports;
pub mod similarity;
pub mod types;

pub use normalize::{normalize, normalize_with_origins};
pub use ollama::{OllamaEmbedder, OllamaLlmClient};
pub use orchestrator::bulletproof_match;
pub use ports::{CancellationToken, Embedder, LlmClient, MatcherPorts, PositionQuery, ProgressCallback};
pub use similarity::{cosine_similarity, string_similarity};
pub use types::{
    BoundingBox, ChunkMeta, Confidence, MatchMethod, MatchOutcome, MatchResult, MatchStats,
    SourceChunk, Warning,
};

//! Embedding generation and vector similarity used by the matcher's
//! Layer 2 (embedding window scan).
//!
//! # Components
//!
//! - [`embeddings`] - Ollama-backed embedding generation, single and batched
//! - [`similarity`] - cosine similarity and related vector comparisons

pub mod embeddings;
pub mod similarity;

pub use embeddings::{generate_embeddings, generate_embeddings_batch, EmbeddingError};
pub use similarity::{
    calculate_percentile, cosine_similarity, pairwise_similarities, SimilarityError,
};

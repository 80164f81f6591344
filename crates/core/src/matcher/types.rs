//! Data model shared by every cascade layer.

use serde::{Deserialize, Serialize};

/// A page-anchored rectangle from the original PDF/EPUB extraction.
///
/// The matcher never inspects these fields; they pass through untouched so
/// downstream consumers (a review UI, a vault export) can still draw boxes
/// on the original page image even after re-anchoring onto cleaned text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BoundingBox {
    pub page: u32,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Opaque structural metadata carried alongside a chunk's content.
///
/// The matcher reads only `SourceChunk::index` and `SourceChunk::content`;
/// everything here rides through to the output `MatchResult` unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChunkMeta {
    pub page_start: Option<u32>,
    pub page_end: Option<u32>,
    pub heading_path: Vec<String>,
    pub section_marker: Option<String>,
    pub bboxes: Vec<BoundingBox>,
}

/// A pre-cleanup document chunk awaiting re-anchoring onto the cleaned target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceChunk {
    /// Unique and contiguous in `[0, N)`.
    pub index: usize,
    /// Non-empty UTF-8 chunk content as extracted pre-cleanup.
    pub content: String,
    pub meta: ChunkMeta,
}

/// How confident the cascade is in a given `MatchResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Exact,
    High,
    Medium,
    Synthetic,
}

/// Which cascade strategy produced a `MatchResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMethod {
    ExactMatch,
    NormalizedMatch,
    MultiAnchorSearch,
    SlidingWindow,
    EmbeddingMatch,
    LlmMatch,
    Interpolation,
}

/// A chunk re-anchored onto the target text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub chunk: SourceChunk,
    /// UTF-8 byte offset into the target, on a char boundary.
    pub start_offset: usize,
    /// UTF-8 byte offset into the target, on a char boundary.
    pub end_offset: usize,
    pub confidence: Confidence,
    pub method: MatchMethod,
    /// `Some` in `[0, 1]` for every method except `Interpolation`, which is `None`.
    pub similarity: Option<f32>,
}

/// A human-readable note emitted for every `Synthetic` result.
pub type Warning = String;

/// Aggregate counts over a completed cascade run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchStats {
    pub total: usize,
    pub exact: usize,
    pub high: usize,
    pub medium: usize,
    pub synthetic: usize,
    pub exact_match: usize,
    pub normalized_match: usize,
    pub multi_anchor_search: usize,
    pub sliding_window: usize,
    pub embedding_match: usize,
    pub llm_match: usize,
    pub interpolation: usize,
    /// Set when cancellation was observed mid-cascade; Layer 4 still ran to
    /// completion so every chunk has a result, but some of those may be
    /// synthetic purely because the cascade was told to stop early.
    pub cancelled: bool,
}

impl MatchStats {
    /// Compute stats from a completed, fully-covering result set.
    pub fn from_results(results: &[MatchResult], cancelled: bool) -> Self {
        let mut stats = MatchStats {
            total: results.len(),
            cancelled,
            ..Default::default()
        };

        for result in results {
            match result.confidence {
                Confidence::Exact => stats.exact += 1,
                Confidence::High => stats.high += 1,
                Confidence::Medium => stats.medium += 1,
                Confidence::Synthetic => stats.synthetic += 1,
            }
            match result.method {
                MatchMethod::ExactMatch => stats.exact_match += 1,
                MatchMethod::NormalizedMatch => stats.normalized_match += 1,
                MatchMethod::MultiAnchorSearch => stats.multi_anchor_search += 1,
                MatchMethod::SlidingWindow => stats.sliding_window += 1,
                MatchMethod::EmbeddingMatch => stats.embedding_match += 1,
                MatchMethod::LlmMatch => stats.llm_match += 1,
                MatchMethod::Interpolation => stats.interpolation += 1,
            }
        }

        stats
    }
}

/// The full output of `bulletproof_match`: one result per input chunk, sorted
/// by `chunk.index`, plus aggregate stats and synthetic-result warnings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub results: Vec<MatchResult>,
    pub stats: MatchStats,
    pub warnings: Vec<Warning>,
}

impl MatchOutcome {
    /// The outcome for zero input chunks: nothing to match, nothing to warn about.
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            stats: MatchStats::default(),
            warnings: Vec::new(),
        }
    }
}

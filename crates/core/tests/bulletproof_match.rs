//! End-to-end scenarios for the bulletproof chunk re-anchoring cascade.

use assert_matches::assert_matches;
use async_trait::async_trait;
use reanchor_core::config::ThresholdConfig;
use reanchor_core::matcher::{
    bulletproof_match, CancellationToken, ChunkMeta, Confidence, Embedder, LlmClient,
    MatchMethod, MatcherPorts, PositionQuery, SourceChunk,
};
use reanchor_core::Result;

fn chunk(index: usize, content: &str) -> SourceChunk {
    SourceChunk {
        index,
        content: content.to_string(),
        meta: ChunkMeta::default(),
    }
}

fn assert_covers_every_chunk(outcome: &reanchor_core::matcher::MatchOutcome, expected: usize) {
    assert_eq!(outcome.results.len(), expected);
    let mut seen: Vec<usize> = outcome.results.iter().map(|r| r.chunk.index).collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..expected).collect::<Vec<_>>());
    for r in &outcome.results {
        assert!(r.start_offset <= r.end_offset);
    }
}

#[tokio::test]
async fn scenario_all_exact() {
    let target = "The quick brown fox jumps over the lazy dog. It was a sunny day.";
    let chunks = vec![
        chunk(0, "The quick brown fox jumps over the lazy dog."),
        chunk(1, "It was a sunny day."),
    ];

    let outcome = bulletproof_match(target, chunks, MatcherPorts::new(), &ThresholdConfig::default())
        .await
        .unwrap();

    assert_covers_every_chunk(&outcome, 2);
    assert!(outcome.results.iter().all(|r| r.confidence == Confidence::Exact));
    assert!(outcome.warnings.is_empty());
}

#[tokio::test]
async fn scenario_whitespace_drift() {
    let target = "Section One\n\nParagraph text   with   irregular   spacing and line\nbreaks.";
    let chunks = vec![
        chunk(0, "Section One"),
        chunk(1, "Paragraph text with irregular spacing and line breaks."),
    ];

    let outcome = bulletproof_match(target, chunks, MatcherPorts::new(), &ThresholdConfig::default())
        .await
        .unwrap();

    assert_covers_every_chunk(&outcome, 2);
    assert!(outcome
        .results
        .iter()
        .all(|r| matches!(r.method, MatchMethod::ExactMatch | MatchMethod::NormalizedMatch)));
}

#[tokio::test]
async fn scenario_anchor_recoverable() {
    // Interior words differ from the original chunk (cleanup rewrote a phrase)
    // but the first/middle/last four-word spans survive untouched.
    let target = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima mike november oscar papa quebec romeo sierra tango";
    let chunks = vec![chunk(
        0,
        "alpha bravo charlie delta echo foxtrot GOLFX hotel india juliet kilo lima mike november oscar papa quebec romeo sierra tango",
    )];

    let outcome = bulletproof_match(target, chunks, MatcherPorts::new(), &ThresholdConfig::default())
        .await
        .unwrap();

    assert_covers_every_chunk(&outcome, 1);
    assert_matches!(outcome.results[0].method, MatchMethod::MultiAnchorSearch);
}

struct MarkerEmbedder;

#[async_trait]
impl Embedder for MarkerEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                if t.contains("needle") {
                    vec![1.0, 0.0]
                } else {
                    vec![0.0, 1.0]
                }
            })
            .collect())
    }
}

#[tokio::test]
async fn scenario_embedding_rescue() {
    // Chunk content is paraphrased enough that Layer 1 cannot place it at all,
    // but an embedder can still find the semantically matching window.
    let target = "padding padding padding the needle hides here in the haystack padding padding padding";
    let chunks = vec![chunk(0, "a paraphrase that mentions needle but shares no literal phrase")];

    let embedder = MarkerEmbedder;
    let ports = MatcherPorts::new().with_embedder(&embedder);

    let outcome = bulletproof_match(target, chunks, ports, &ThresholdConfig::default())
        .await
        .unwrap();

    assert_covers_every_chunk(&outcome, 1);
    assert_matches!(outcome.results[0].method, MatchMethod::EmbeddingMatch);
}

struct StubLlm;

#[async_trait]
impl LlmClient for StubLlm {
    async fn find_position(&self, _chunk_text: &str, window_text: &str) -> Result<PositionQuery> {
        match window_text.find("needle") {
            Some(pos) => Ok(PositionQuery {
                start_offset: pos,
                end_offset: pos + "needle".len(),
                found: true,
            }),
            None => Ok(PositionQuery {
                start_offset: 0,
                end_offset: 0,
                found: false,
            }),
        }
    }
}

#[tokio::test]
async fn scenario_interpolation_only() {
    // Nothing matches anywhere: no embedder, no LLM client, content shares
    // nothing with the target. Every chunk must still get a result.
    let target = "completely unrelated filler text of no particular structure";
    let chunks = vec![
        chunk(0, "first chunk shares nothing with the target"),
        chunk(1, "second chunk also shares nothing with the target"),
        chunk(2, "third chunk likewise shares nothing with the target"),
    ];

    let outcome = bulletproof_match(target, chunks, MatcherPorts::new(), &ThresholdConfig::default())
        .await
        .unwrap();

    assert_covers_every_chunk(&outcome, 3);
    assert!(outcome
        .results
        .iter()
        .all(|r| r.confidence == Confidence::Synthetic));
    assert_eq!(outcome.warnings.len(), 3);
}

#[tokio::test]
async fn scenario_mixed_cascade() {
    let target = "intro line one. middle needle content lives here. final line that ends things.";
    let chunks = vec![
        chunk(0, "intro line one."),                                   // Layer 1 exact
        chunk(1, "a paraphrase referencing needle with no overlap"),   // Layer 2/3 rescue
        chunk(2, "final line that ends things."),                     // Layer 1 exact
        chunk(3, "an entirely unrelated trailing chunk with nothing in common"), // interpolation
    ];

    let embedder = MarkerEmbedder;
    let llm = StubLlm;
    let ports = MatcherPorts::new().with_embedder(&embedder).with_llm_client(&llm);

    let outcome = bulletproof_match(target, chunks, ports, &ThresholdConfig::default())
        .await
        .unwrap();

    assert_covers_every_chunk(&outcome, 4);
    assert_matches!(outcome.results[0].method, MatchMethod::ExactMatch);
    assert_matches!(outcome.results[2].method, MatchMethod::ExactMatch);
    assert_matches!(outcome.results[3].confidence, Confidence::Synthetic);
}

#[tokio::test]
async fn invariant_empty_input_short_circuits() {
    let outcome = bulletproof_match("anything", vec![], MatcherPorts::new(), &ThresholdConfig::default())
        .await
        .unwrap();
    assert!(outcome.results.is_empty());
    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.stats.total, 0);
}

#[tokio::test]
async fn invariant_cancellation_still_covers_every_chunk_and_flags_stats() {
    let target = "whatever text happens to live in the target document here";
    let chunks = vec![
        chunk(0, "nothing in common with the target whatsoever at all"),
        chunk(1, "also nothing in common with the target whatsoever"),
    ];

    let token = CancellationToken::new();
    token.cancel();
    let ports = MatcherPorts::new().with_cancellation(token);

    let outcome = bulletproof_match(target, chunks, ports, &ThresholdConfig::default())
        .await
        .unwrap();

    assert_covers_every_chunk(&outcome, 2);
    assert!(outcome.stats.cancelled);
}

#[tokio::test]
async fn invariant_offsets_are_monotone_when_sorted_by_index() {
    let target = "one two three four five six seven eight nine ten";
    let chunks = vec![
        chunk(3, "nine ten"),
        chunk(0, "one two"),
        chunk(2, "seven eight"),
        chunk(1, "three four five six"),
    ];

    let outcome = bulletproof_match(target, chunks, MatcherPorts::new(), &ThresholdConfig::default())
        .await
        .unwrap();

    assert_covers_every_chunk(&outcome, 4);
    let mut last_start = 0;
    for r in &outcome.results {
        assert!(r.start_offset >= last_start || r.chunk.index == 0);
        last_start = r.start_offset;
    }
}

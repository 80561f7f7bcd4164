//! Chunked transcript summarization.
//!
//! The transcript is partitioned into fixed-size character windows, each
//! window is summarized independently by an injectable engine with bounded
//! deterministic output, and the per-chunk summaries are flattened into one
//! ordered bullet list by splitting on the literal `". "` delimiter.
//!
//! Known limitation: chunking splits on raw character count and may sever a
//! word or sentence mid-stream. This is kept deliberately so bullet output
//! stays stable; a word-aware split would change results for the same input.

use crate::config::SummaryConfig;
use crate::error::PipelineError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

pub mod remote;

pub use remote::RemoteSummaryEngine;

/// Bullet returned for an empty or blank transcript.
pub const EMPTY_TRANSCRIPT_BULLET: &str = "No text to summarize";

/// Generation bounds passed to the engine for every chunk.
#[derive(Debug, Clone, Copy)]
pub struct SummaryOptions {
    pub max_length: usize,
    pub min_length: usize,
    /// Engines must not sample when this is false; bullet output is expected
    /// to be deterministic for identical input.
    pub sample: bool,
}

/// Text-summarization capability. Expensive to construct, cheap to reuse.
#[async_trait]
pub trait SummaryEngine: Send + Sync {
    fn name(&self) -> &'static str;

    async fn summarize(
        &self,
        text: &str,
        options: &SummaryOptions,
    ) -> Result<String, PipelineError>;
}

pub struct Summarizer {
    engine: Arc<dyn SummaryEngine>,
    max_chunk_chars: usize,
    options: SummaryOptions,
}

impl Summarizer {
    pub fn new(engine: Arc<dyn SummaryEngine>, config: &SummaryConfig) -> Self {
        Self {
            engine,
            max_chunk_chars: config.max_chunk_chars.max(1),
            options: SummaryOptions {
                max_length: config.max_length,
                min_length: config.min_length,
                sample: false,
            },
        }
    }

    /// Turn transcript text into an ordered bullet list.
    ///
    /// Chunks are summarized independently and in order; if any chunk fails
    /// the whole call fails and no partial list is returned.
    pub async fn summarize(&self, text: &str) -> Result<Vec<String>, PipelineError> {
        if text.trim().is_empty() {
            return Ok(vec![EMPTY_TRANSCRIPT_BULLET.to_string()]);
        }

        let chunks = chunk_text(text, self.max_chunk_chars);
        info!(
            "Summarizing {} chars in {} chunk(s) with {}",
            text.len(),
            chunks.len(),
            self.engine.name()
        );

        let mut summaries = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            debug!("Summarizing chunk {}/{}", i + 1, chunks.len());
            summaries.push(self.engine.summarize(chunk, &self.options).await?);
        }

        Ok(flatten_bullets(&summaries))
    }
}

/// Partition `text` into contiguous windows of at most `max_chars`
/// characters, preserving order, with no overlap. The final window may be
/// shorter. Windows break on character boundaries, not word boundaries.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    chunks.push(&text[start..]);

    chunks
}

/// Split each per-chunk summary into sentence candidates on the literal
/// `". "` delimiter, trim them, drop empties, and concatenate in chunk order
/// then in-chunk order. A trailing sentence keeps its final period.
pub fn flatten_bullets(summaries: &[String]) -> Vec<String> {
    let mut bullets = Vec::new();
    for summary in summaries {
        for candidate in summary.split(". ") {
            let trimmed = candidate.trim();
            if !trimmed.is_empty() {
                bullets.push(trimmed.to_string());
            }
        }
    }
    bullets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns each chunk unchanged and counts invocations.
    struct EchoEngine {
        calls: AtomicUsize,
    }

    impl EchoEngine {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SummaryEngine for EchoEngine {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn summarize(
            &self,
            text: &str,
            options: &SummaryOptions,
        ) -> Result<String, PipelineError> {
            assert!(!options.sample);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(text.to_string())
        }
    }

    struct FailingEngine;

    #[async_trait]
    impl SummaryEngine for FailingEngine {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn summarize(
            &self,
            _text: &str,
            _options: &SummaryOptions,
        ) -> Result<String, PipelineError> {
            Err(PipelineError::model_failure("failing", "boom"))
        }
    }

    fn summarizer_with(engine: Arc<dyn SummaryEngine>, max_chunk_chars: usize) -> Summarizer {
        Summarizer::new(
            engine,
            &SummaryConfig {
                max_chunk_chars,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_chunk_count_is_ceil_of_length_over_size() {
        for (len, size, expected) in [(10, 3, 4), (9, 3, 3), (1, 1000, 1), (2500, 1000, 3)] {
            let text = "a".repeat(len);
            let chunks = chunk_text(&text, size);
            assert_eq!(chunks.len(), expected, "len={} size={}", len, size);
        }
    }

    #[test]
    fn test_chunks_reconstruct_original_exactly() {
        let text = "The quick brown fox jumps over the lazy dog, twice.";
        let chunks = chunk_text(text, 7);
        assert_eq!(chunks.concat(), text);
        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.chars().count(), 7);
        }
    }

    #[test]
    fn test_chunking_respects_multibyte_boundaries() {
        let text = "héllo wörld ünd mörê tëxt";
        let chunks = chunk_text(text, 4);
        assert_eq!(chunks.concat(), text);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 4);
        }
    }

    #[tokio::test]
    async fn test_empty_and_blank_text_return_sentinel() {
        let summarizer = summarizer_with(EchoEngine::new(), 1000);
        assert_eq!(
            summarizer.summarize("").await.unwrap(),
            vec![EMPTY_TRANSCRIPT_BULLET.to_string()]
        );
        assert_eq!(
            summarizer.summarize("   ").await.unwrap(),
            vec![EMPTY_TRANSCRIPT_BULLET.to_string()]
        );
    }

    #[tokio::test]
    async fn test_short_text_invokes_engine_exactly_once() {
        let engine = EchoEngine::new();
        let summarizer = summarizer_with(engine.clone(), 1000);
        summarizer.summarize("a short transcript").await.unwrap();
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_2500_chars_yield_three_chunks_in_order() {
        let engine = EchoEngine::new();
        let summarizer = summarizer_with(engine.clone(), 1000);

        // 2500 chars: 1000 'a', 1000 'b', 500 'c'. Bullets come back in
        // chunk order because the echo engine returns chunks unchanged.
        let text = format!("{}{}{}", "a".repeat(1000), "b".repeat(1000), "c".repeat(500));
        let bullets = summarizer.summarize(&text).await.unwrap();

        assert_eq!(engine.calls.load(Ordering::SeqCst), 3);
        assert_eq!(bullets.len(), 3);
        assert_eq!(bullets[0], "a".repeat(1000));
        assert_eq!(bullets[1], "b".repeat(1000));
        assert_eq!(bullets[2], "c".repeat(500));
    }

    #[tokio::test]
    async fn test_sentence_split_keeps_trailing_period_behavior() {
        let summarizer = summarizer_with(EchoEngine::new(), 1000);
        let bullets = summarizer
            .summarize("This was great. We decided to ship it. Next steps are unclear")
            .await
            .unwrap();
        assert_eq!(
            bullets,
            vec![
                "This was great.".to_string(),
                "We decided to ship it.".to_string(),
                "Next steps are unclear".to_string(),
            ]
        );

        // With a trailing period present, it stays attached
        let bullets = summarizer.summarize("Done. All good.").await.unwrap();
        assert_eq!(bullets, vec!["Done.".to_string(), "All good.".to_string()]);
    }

    #[test]
    fn test_flatten_never_emits_blank_or_untrimmed_bullets() {
        let summaries = vec![
            "  First point.   Second point  ".to_string(),
            ".  . ".to_string(),
            "Third".to_string(),
        ];
        let bullets = flatten_bullets(&summaries);
        assert_eq!(bullets, vec!["First point.", "Second point", "Third"]);
        for bullet in &bullets {
            assert_eq!(bullet, bullet.trim());
            assert!(!bullet.is_empty());
        }
    }

    #[tokio::test]
    async fn test_engine_failure_fails_whole_call() {
        let summarizer = summarizer_with(Arc::new(FailingEngine), 10);
        let result = summarizer.summarize(&"x".repeat(25)).await;
        assert!(matches!(result, Err(PipelineError::ModelFailure { .. })));
    }

    #[tokio::test]
    async fn test_bullets_are_deterministic() {
        let summarizer = summarizer_with(EchoEngine::new(), 50);
        let text = "One thing happened. Then another thing. Finally a third";
        let first = summarizer.summarize(text).await.unwrap();
        let second = summarizer.summarize(text).await.unwrap();
        assert_eq!(first, second);
    }
}

//! Local keyword retriever.
//!
//! Ranks corpus chunks by query-term overlap. It stands in for the
//! external orchestrator during evaluation runs and when no endpoint is
//! configured; the answer it synthesizes is extractive (the best chunk),
//! not generated.

use async_trait::async_trait;

use crate::chat::record::AnswerMode;
use crate::chat::strings;
use crate::core::errors::ApiError;

use super::chunker::TextChunk;
use super::retrieval::{RawRetrievalResult, RetrievalService, RetrievedPassage};

const ANSWER_EXCERPT_CHARS: usize = 200;

pub struct KeywordRetriever {
    chunks: Vec<TextChunk>,
    top_k: usize,
}

impl KeywordRetriever {
    pub fn new(chunks: Vec<TextChunk>, top_k: usize) -> Self {
        Self {
            chunks,
            top_k: top_k.max(1),
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Top-k chunks by term overlap, descending. Ties keep corpus order,
    /// so the result is stable across calls.
    fn search(&self, query: &str) -> Vec<(&TextChunk, f64)> {
        let query_lower = query.to_lowercase();
        let query_terms: Vec<&str> = query_lower.split_whitespace().collect();
        if query_terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(&TextChunk, f64)> = self
            .chunks
            .iter()
            .map(|chunk| {
                let chunk_lower = chunk.text.to_lowercase();
                let score = query_terms
                    .iter()
                    .filter(|term| chunk_lower.contains(*term))
                    .count() as f64
                    / query_terms.len() as f64;
                (chunk, score)
            })
            .filter(|(_, score)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.top_k);
        scored
    }
}

#[async_trait]
impl RetrievalService for KeywordRetriever {
    async fn ask(&self, query: &str, mode: AnswerMode) -> Result<RawRetrievalResult, ApiError> {
        let hits = self.search(query);

        if hits.is_empty() {
            let answer = match mode {
                AnswerMode::DocumentSearch => strings::NO_DOC_MATCH_ANSWER,
                AnswerMode::Inquiry => strings::INQUIRY_NO_MATCH_ANSWER,
            };
            return Ok(RawRetrievalResult {
                answer: answer.to_string(),
                context: Vec::new(),
            });
        }

        let answer: String = hits[0].0.text.chars().take(ANSWER_EXCERPT_CHARS).collect();
        let context = hits
            .into_iter()
            .map(|(chunk, _)| RetrievedPassage {
                source: chunk.source.clone(),
                page: None,
                content: chunk.text.clone(),
            })
            .collect();

        Ok(RawRetrievalResult { answer, context })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, source: &str) -> TextChunk {
        TextChunk {
            text: text.to_string(),
            source: source.to_string(),
            start_offset: 0,
            chunk_index: 0,
        }
    }

    fn retriever() -> KeywordRetriever {
        KeywordRetriever::new(
            vec![
                chunk("育成 方針 の 議事録", "mtg/ikusei.txt"),
                chunk("経費 精算 の 手順", "keihi.txt"),
                chunk("育成 担当 者 一覧", "roster.csv"),
            ],
            5,
        )
    }

    #[tokio::test]
    async fn ranks_by_term_overlap() {
        let result = retriever()
            .ask("育成 方針", AnswerMode::DocumentSearch)
            .await
            .unwrap();

        assert_eq!(result.context[0].source, "mtg/ikusei.txt");
        assert_eq!(result.context.len(), 2);
        assert!(result.answer.contains("育成"));
    }

    #[tokio::test]
    async fn top_k_limits_context_length() {
        let retriever = KeywordRetriever::new(
            vec![
                chunk("経費 A", "a.txt"),
                chunk("経費 B", "b.txt"),
                chunk("経費 C", "c.txt"),
            ],
            2,
        );
        let result = retriever.ask("経費", AnswerMode::Inquiry).await.unwrap();
        assert_eq!(result.context.len(), 2);
    }

    #[tokio::test]
    async fn no_hit_returns_mode_sentinel() {
        let doc_search = retriever()
            .ask("存在しない語", AnswerMode::DocumentSearch)
            .await
            .unwrap();
        assert_eq!(doc_search.answer, strings::NO_DOC_MATCH_ANSWER);
        assert!(doc_search.context.is_empty());

        let inquiry = retriever()
            .ask("存在しない語", AnswerMode::Inquiry)
            .await
            .unwrap();
        assert_eq!(inquiry.answer, strings::INQUIRY_NO_MATCH_ANSWER);
        assert!(inquiry.context.is_empty());
    }

    #[tokio::test]
    async fn empty_corpus_always_misses() {
        let retriever = KeywordRetriever::new(Vec::new(), 5);
        let result = retriever.ask("何か", AnswerMode::Inquiry).await.unwrap();
        assert_eq!(result.answer, strings::INQUIRY_NO_MATCH_ANSWER);
    }
}

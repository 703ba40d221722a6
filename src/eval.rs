//! Answer-quality evaluation harness.
//!
//! Reimplements the manual tuning loop for the retrieval parameters:
//! chunk the corpus under several `chunk_size`/`top_k` combinations, run
//! the same query list through the local retriever, and lay the
//! normalized records out side by side so a reviewer can judge which
//! parameter set answers best.

use std::path::Path;

use serde::Serialize;

use crate::chat::record::{AnswerMode, DisplayRecord};
use crate::chat::render::{self, UiElement};
use crate::chat::{normalize, strings};
use crate::rag::chunker::{ChunkerConfig, CorpusChunker};
use crate::rag::keyword::KeywordRetriever;
use crate::rag::retrieval::RetrievalService;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EvalParams {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

/// Default parameter sweep: the production setting plus one smaller and
/// one larger chunking.
pub const DEFAULT_SWEEP: [EvalParams; 3] = [
    EvalParams {
        chunk_size: 300,
        chunk_overlap: 30,
        top_k: 3,
    },
    EvalParams {
        chunk_size: 500,
        chunk_overlap: 50,
        top_k: 5,
    },
    EvalParams {
        chunk_size: 800,
        chunk_overlap: 80,
        top_k: 5,
    },
];

/// The sidebar's input examples double as smoke queries.
pub fn default_queries() -> Vec<String> {
    vec![
        strings::DOC_SEARCH_EXAMPLE.to_string(),
        strings::INQUIRY_EXAMPLE.to_string(),
    ]
}

#[derive(Debug, Serialize)]
pub struct QueryOutcome {
    pub query: String,
    pub doc_search: DisplayRecord,
    pub inquiry: DisplayRecord,
}

#[derive(Debug, Serialize)]
pub struct EvalReport {
    pub params: EvalParams,
    pub document_count: usize,
    pub chunk_count: usize,
    pub outcomes: Vec<QueryOutcome>,
}

/// Run every query under every parameter set.
///
/// Documents load once; each parameter set re-chunks them and gets its
/// own retriever, so the reports differ only by the parameters.
pub async fn run(
    corpus_root: &Path,
    queries: &[String],
    sweep: &[EvalParams],
) -> anyhow::Result<Vec<EvalReport>> {
    let loader = CorpusChunker::new(ChunkerConfig::default());
    let documents = loader.load_dir(corpus_root)?;
    tracing::info!(
        "Loaded {} documents from {}",
        documents.len(),
        corpus_root.display()
    );

    let mut reports = Vec::with_capacity(sweep.len());
    for params in sweep {
        let chunker = CorpusChunker::new(ChunkerConfig {
            chunk_size: params.chunk_size,
            chunk_overlap: params.chunk_overlap,
            ..Default::default()
        });
        let chunks = chunker.chunk_all(&documents);
        let chunk_count = chunks.len();
        let retriever = KeywordRetriever::new(chunks, params.top_k);

        let mut outcomes = Vec::with_capacity(queries.len());
        for query in queries {
            let raw_search = retriever.ask(query, AnswerMode::DocumentSearch).await?;
            let raw_inquiry = retriever.ask(query, AnswerMode::Inquiry).await?;
            outcomes.push(QueryOutcome {
                query: query.clone(),
                doc_search: normalize::document_search(&raw_search),
                inquiry: normalize::inquiry(&raw_inquiry),
            });
        }

        reports.push(EvalReport {
            params: *params,
            document_count: documents.len(),
            chunk_count,
            outcomes,
        });
    }

    Ok(reports)
}

/// Console form of one report.
pub fn format_report(report: &EvalReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== chunk_size={} chunk_overlap={} top_k={} ({} docs, {} chunks)\n",
        report.params.chunk_size,
        report.params.chunk_overlap,
        report.params.top_k,
        report.document_count,
        report.chunk_count,
    ));

    for outcome in &report.outcomes {
        out.push_str(&format!("\n[query] {}\n", outcome.query));
        out.push_str(&format!("  --- {}\n", strings::ANSWER_MODE_DOC_SEARCH));
        for element in render::record(&outcome.doc_search) {
            out.push_str(&format!("  {}\n", element_line(&element)));
        }
        out.push_str(&format!("  --- {}\n", strings::ANSWER_MODE_INQUIRY));
        for element in render::record(&outcome.inquiry) {
            out.push_str(&format!("  {}\n", element_line(&element)));
        }
    }

    out
}

fn element_line(element: &UiElement) -> String {
    match element {
        UiElement::Markdown { text } => text.clone(),
        UiElement::Success { text, .. } => format!("[main] {}", text),
        UiElement::Info { text, .. } => format!("[ref]  {}", text),
        UiElement::Divider => "----".to_string(),
        UiElement::SectionLabel { text } => format!("## {}", text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::record::DisplayRecord;
    use std::fs;

    fn corpus() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("ikusei.txt"),
            "社員の育成方針について。研修は年2回実施する。",
        )
        .unwrap();
        fs::write(
            dir.path().join("roster.csv"),
            "name,dept\n太郎,人事\n花子,経理\n",
        )
        .unwrap();
        dir
    }

    #[tokio::test]
    async fn sweep_produces_one_report_per_params() {
        let dir = corpus();
        let queries = vec!["育成方針".to_string()];
        let reports = run(dir.path(), &queries, &DEFAULT_SWEEP).await.unwrap();

        assert_eq!(reports.len(), DEFAULT_SWEEP.len());
        for report in &reports {
            assert_eq!(report.document_count, 2);
            assert!(report.chunk_count >= 2);
            assert_eq!(report.outcomes.len(), 1);
        }

        let DisplayRecord::DocumentSearch(record) = &reports[0].outcomes[0].doc_search else {
            panic!("wrong mode");
        };
        assert_eq!(record.main_file_path.as_deref(), Some("ikusei.txt"));
    }

    #[tokio::test]
    async fn unmatched_query_reports_no_match() {
        let dir = corpus();
        let queries = vec!["存在しないトピック".to_string()];
        let reports = run(
            dir.path(),
            &queries,
            &[EvalParams {
                chunk_size: 500,
                chunk_overlap: 50,
                top_k: 5,
            }],
        )
        .await
        .unwrap();

        let DisplayRecord::DocumentSearch(record) = &reports[0].outcomes[0].doc_search else {
            panic!("wrong mode");
        };
        assert!(record.no_file_path);

        let text = format_report(&reports[0]);
        assert!(text.contains(strings::NO_DOC_MATCH_MESSAGE));
    }
}

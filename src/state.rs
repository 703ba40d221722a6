use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::{AppConfig, AppPaths};
use crate::history::SessionStore;
use crate::rag::chunker::{ChunkerConfig, CorpusChunker};
use crate::rag::keyword::KeywordRetriever;
use crate::rag::retrieval::{HttpRetrievalClient, RetrievalService};
use crate::security::{init_session_token, SessionToken};

#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: Arc<AppConfig>,
    pub session_token: SessionToken,
    pub sessions: SessionStore,
    pub retrieval: Arc<dyn RetrievalService>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn initialize() -> anyhow::Result<Arc<Self>> {
        let paths = Arc::new(AppPaths::new());
        let config = Arc::new(AppConfig::load_or_default(&paths.config_path));
        let session_token = init_session_token(&paths.user_data_dir);
        let sessions = SessionStore::new();
        let retrieval = build_retrieval(&paths, &config)?;
        let started_at = Utc::now();

        Ok(Arc::new(AppState {
            paths,
            config,
            session_token,
            sessions,
            retrieval,
            started_at,
        }))
    }
}

/// The configured orchestrator endpoint wins; without one, retrieval runs
/// over a local keyword index of the corpus folder. A missing corpus still
/// starts the server; every query then resolves to the no-match answer.
fn build_retrieval(
    paths: &AppPaths,
    config: &AppConfig,
) -> anyhow::Result<Arc<dyn RetrievalService>> {
    if let Some(endpoint) = config
        .retrieval
        .endpoint
        .as_deref()
        .filter(|endpoint| !endpoint.trim().is_empty())
    {
        tracing::info!("Using retrieval orchestrator at {}", endpoint);
        let client = HttpRetrievalClient::new(
            endpoint,
            config.retrieval.top_k,
            config.retrieval.timeout_secs,
        )?;
        return Ok(Arc::new(client));
    }

    let corpus_root = if config.corpus.root_dir.is_absolute() {
        config.corpus.root_dir.clone()
    } else {
        paths.project_root.join(&config.corpus.root_dir)
    };

    let chunker = CorpusChunker::new(ChunkerConfig {
        chunk_size: config.corpus.chunk_size,
        chunk_overlap: config.corpus.chunk_overlap,
        ..Default::default()
    });

    let chunks = match chunker.load_dir(&corpus_root) {
        Ok(documents) => chunker.chunk_all(&documents),
        Err(err) => {
            tracing::warn!(
                "No retrieval endpoint and corpus unavailable ({}); answers will be no-match",
                err
            );
            Vec::new()
        }
    };

    tracing::info!(
        "Local keyword retrieval over {} chunks from {}",
        chunks.len(),
        corpus_root.display()
    );
    Ok(Arc::new(KeywordRetriever::new(
        chunks,
        config.retrieval.top_k,
    )))
}

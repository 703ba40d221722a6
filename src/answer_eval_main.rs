//! Retrieval parameter evaluation.
//!
//! Usage: `answer-eval [CORPUS_DIR] [QUERY_FILE]`
//!
//! Without arguments the corpus folder comes from `config.toml` and the
//! queries default to the sidebar input examples. A query file holds one
//! query per line; blank lines are skipped.

use std::env;
use std::fs;
use std::path::PathBuf;

use docnavi_backend::config::{AppConfig, AppPaths};
use docnavi_backend::eval;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut args = env::args().skip(1);
    let corpus_root = match args.next() {
        Some(dir) => PathBuf::from(dir),
        None => {
            let paths = AppPaths::new();
            let config = AppConfig::load_or_default(&paths.config_path);
            if config.corpus.root_dir.is_absolute() {
                config.corpus.root_dir
            } else {
                paths.project_root.join(&config.corpus.root_dir)
            }
        }
    };

    let queries = match args.next() {
        Some(path) => fs::read_to_string(&path)?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        None => eval::default_queries(),
    };

    let reports = eval::run(&corpus_root, &queries, &eval::DEFAULT_SWEEP).await?;
    for report in &reports {
        println!("{}", eval::format_report(report));
    }

    Ok(())
}

//! Corpus loading and chunking.
//!
//! Used by the evaluation binary and the local keyword fallback: loads
//! plain-text documents from the corpus folder and splits them into
//! overlapping character-window chunks snapped to sentence boundaries.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File extensions the loader accepts; anything else is skipped.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["txt", "md", "csv"];

/// CSV rows are grouped so one document covers several rows instead of
/// producing a near-empty chunk per row.
const CSV_GROUP_ROWS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks
    pub chunk_overlap: usize,
    /// Upper bound of chunks kept per document
    pub max_chunks_per_doc: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            max_chunks_per_doc: 1000,
        }
    }
}

/// A loaded corpus document before chunking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusDocument {
    /// Path relative to the corpus root; shared by all row groups of a CSV.
    pub source: String,
    pub text: String,
    /// 1-based data row range for CSV groups, e.g. `"6-10"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_range: Option<String>,
}

/// A chunk of a corpus document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    pub text: String,
    pub source: String,
    pub start_offset: usize,
    pub chunk_index: usize,
}

pub struct CorpusChunker {
    config: ChunkerConfig,
}

impl CorpusChunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Load every supported document under `root`, recursively.
    ///
    /// Unreadable files are skipped with a warning; a missing root is an
    /// error because an empty corpus makes every answer a no-match.
    pub fn load_dir(&self, root: &Path) -> anyhow::Result<Vec<CorpusDocument>> {
        if !root.is_dir() {
            anyhow::bail!("corpus root {} is not a directory", root.display());
        }

        let mut documents = Vec::new();
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let mut entries: Vec<PathBuf> = fs::read_dir(&dir)?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .collect();
            entries.sort();

            for path in entries {
                if path.is_dir() {
                    pending.push(path);
                    continue;
                }

                let Some(extension) = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(str::to_ascii_lowercase)
                else {
                    continue;
                };
                if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
                    tracing::debug!("Skipping unsupported file {}", path.display());
                    continue;
                }

                let source = relative_source(root, &path);
                let text = match fs::read_to_string(&path) {
                    Ok(text) => text,
                    Err(err) => {
                        tracing::warn!("Failed to read {}: {}", path.display(), err);
                        continue;
                    }
                };

                if extension == "csv" {
                    documents.extend(group_csv_rows(&source, &text));
                } else {
                    documents.push(CorpusDocument {
                        source,
                        text,
                        row_range: None,
                    });
                }
            }
        }

        Ok(documents)
    }

    pub fn chunk_all(&self, documents: &[CorpusDocument]) -> Vec<TextChunk> {
        documents
            .iter()
            .flat_map(|doc| self.split_document(doc))
            .collect()
    }

    /// Split one document into overlapping chunks.
    pub fn split_document(&self, document: &CorpusDocument) -> Vec<TextChunk> {
        let chunk_size = self.config.chunk_size.max(1);
        let step = chunk_size.saturating_sub(self.config.chunk_overlap).max(1);
        let max_chunks = self.config.max_chunks_per_doc;

        let chars: Vec<char> = document.text.chars().collect();
        let total_chars = chars.len();

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut chunk_index = 0;
        while start < total_chars && chunks.len() < max_chunks {
            let end = (start + chunk_size).min(total_chars);
            let window: String = chars[start..end].iter().collect();

            let text = if end < total_chars {
                snap_to_sentence_boundary(&window)
            } else {
                window
            };

            let trimmed = text.trim();
            if !trimmed.is_empty() {
                chunks.push(TextChunk {
                    text: trimmed.to_string(),
                    source: document.source.clone(),
                    start_offset: start,
                    chunk_index,
                });
                chunk_index += 1;
            }

            start += step;
        }

        chunks
    }
}

/// Group CSV data rows into documents of `CSV_GROUP_ROWS` rows each,
/// repeating the header so every group stays readable on its own. All
/// groups share the file's source path.
fn group_csv_rows(source: &str, text: &str) -> Vec<CorpusDocument> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let rows: Vec<&str> = lines.collect();

    if rows.is_empty() {
        return vec![CorpusDocument {
            source: source.to_string(),
            text: header.to_string(),
            row_range: None,
        }];
    }

    rows.chunks(CSV_GROUP_ROWS)
        .enumerate()
        .map(|(group_index, group)| {
            let start_row = group_index * CSV_GROUP_ROWS + 1;
            let end_row = start_row + group.len() - 1;
            let mut combined = String::from(header);
            for row in group {
                combined.push('\n');
                combined.push_str(row);
            }
            CorpusDocument {
                source: source.to_string(),
                text: combined,
                row_range: Some(format!("{}-{}", start_row, end_row)),
            }
        })
        .collect()
}

/// Cut the window at the last sentence ending in its final 20%, when one
/// exists. Handles both Japanese and ASCII sentence endings.
fn snap_to_sentence_boundary(text: &str) -> String {
    const SENTENCE_ENDINGS: [&str; 8] = ["。", "！", "？", ". ", "! ", "? ", ".\n", "\n\n"];

    let search_start = text
        .char_indices()
        .nth(text.chars().count() * 80 / 100)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let search_text = &text[search_start..];

    for ending in SENTENCE_ENDINGS.iter() {
        if let Some(pos) = search_text.rfind(ending) {
            let cut = search_start + pos + ending.len();
            return text[..cut].to_string();
        }
    }

    text.to_string()
}

fn relative_source(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

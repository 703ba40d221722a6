//! Transcript turns and the canonical display record.
//!
//! Assistant turns written by older builds stored a bare answer string
//! instead of a structured record; `AssistantPayload` keeps those readable
//! and coerces them at read time instead of branching at every render site.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::strings;

/// User-selected answer mode.
///
/// Serialized with the UI labels so records written by the previous
/// generation of the app deserialize unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AnswerMode {
    #[default]
    #[serde(rename = "社内文書検索")]
    DocumentSearch,
    #[serde(rename = "社内問い合わせ")]
    Inquiry,
}

impl AnswerMode {
    /// Accepts the UI labels and ASCII aliases. Unknown input falls back
    /// to Inquiry, matching how stored records without a readable mode
    /// are replayed.
    pub fn from_str(s: &str) -> Self {
        match s.trim() {
            strings::ANSWER_MODE_DOC_SEARCH | "doc_search" | "document_search" => {
                AnswerMode::DocumentSearch
            }
            _ => AnswerMode::Inquiry,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerMode::DocumentSearch => strings::ANSWER_MODE_DOC_SEARCH,
            AnswerMode::Inquiry => strings::ANSWER_MODE_INQUIRY,
        }
    }
}

/// A secondary document candidate in document search mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubChoice {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<usize>,
}

/// Document search result: where the answer likely lives.
///
/// Either the citation fields are populated, or `no_file_path` is set and
/// only `answer` carries the no-match message. Page numbers are stored
/// 0-based and shown 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DocumentSearchRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_page_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_choices: Vec<SubChoice>,
    // Field name kept from the legacy history format.
    #[serde(default, rename = "no_file_path_flg", skip_serializing_if = "is_false")]
    pub no_file_path: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

/// Inquiry result: a generated answer plus its cited sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InquiryRecord {
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Formatted citation strings in first-occurrence order. `None` means
    /// no citation block at all; `Some` with an empty list renders the
    /// block header with no entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_info_list: Option<Vec<String>>,
}

/// The canonical record stored for an assistant turn, discriminated by
/// the stored `mode` label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum DisplayRecord {
    #[serde(rename = "社内文書検索")]
    DocumentSearch(DocumentSearchRecord),
    #[serde(rename = "社内問い合わせ")]
    Inquiry(InquiryRecord),
}

impl DisplayRecord {
    pub fn mode(&self) -> AnswerMode {
        match self {
            DisplayRecord::DocumentSearch(_) => AnswerMode::DocumentSearch,
            DisplayRecord::Inquiry(_) => AnswerMode::Inquiry,
        }
    }

    /// Plain-answer inquiry record, used when coercing legacy turns.
    pub fn plain_answer(answer: impl Into<String>) -> Self {
        DisplayRecord::Inquiry(InquiryRecord {
            answer: answer.into(),
            message: None,
            file_info_list: None,
        })
    }
}

/// Stored value of an assistant turn.
///
/// Deserialization tries the structured record first, then a bare string,
/// and keeps anything else as raw JSON so a damaged entry never makes the
/// whole transcript unreadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssistantPayload {
    Record(DisplayRecord),
    Legacy(String),
    Other(Value),
}

impl AssistantPayload {
    /// Best-effort answer text, used for session previews.
    pub fn preview_text(&self) -> String {
        match self {
            AssistantPayload::Record(DisplayRecord::DocumentSearch(record)) => record
                .main_message
                .clone()
                .or_else(|| record.answer.clone())
                .unwrap_or_default(),
            AssistantPayload::Record(DisplayRecord::Inquiry(record)) => record.answer.clone(),
            AssistantPayload::Legacy(text) => text.clone(),
            AssistantPayload::Other(value) => value.to_string(),
        }
    }
}

impl From<DisplayRecord> for AssistantPayload {
    fn from(record: DisplayRecord) -> Self {
        AssistantPayload::Record(record)
    }
}

/// One transcript turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Turn {
    User {
        #[serde(rename = "content")]
        text: String,
    },
    Assistant {
        #[serde(rename = "content")]
        payload: AssistantPayload,
    },
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

//! Transcript replay.
//!
//! Rebuilds the full element sequence of a conversation from stored turns.
//! Replay is a pure read: the same transcript always renders to the same
//! elements, and a malformed turn degrades to its string form instead of
//! aborting the turns after it.

use serde::Serialize;

use super::icons::{self, IconId};
use super::record::{AssistantPayload, DisplayRecord, DocumentSearchRecord, InquiryRecord, Turn};
use super::strings;

/// One visual element of a rendered turn, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiElement {
    /// Free-form text block.
    Markdown { text: String },
    /// Highlighted main citation box.
    Success { text: String, icon: IconId },
    /// Secondary citation box.
    Info { text: String, icon: IconId },
    Divider,
    /// Section heading above a citation block.
    SectionLabel { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedTurn {
    pub role: &'static str,
    pub elements: Vec<UiElement>,
}

/// Replay a whole transcript in order.
pub fn transcript(turns: &[Turn]) -> Vec<RenderedTurn> {
    turns
        .iter()
        .map(|turn| match turn {
            Turn::User { text } => RenderedTurn {
                role: "user",
                elements: vec![UiElement::Markdown { text: text.clone() }],
            },
            Turn::Assistant { payload } => RenderedTurn {
                role: "assistant",
                elements: assistant(payload),
            },
        })
        .collect()
}

/// Render one assistant payload.
pub fn assistant(payload: &AssistantPayload) -> Vec<UiElement> {
    match payload {
        AssistantPayload::Record(stored) => record(stored),
        // Turns written before the record format existed hold the bare
        // answer text; replay them as a plain inquiry answer.
        AssistantPayload::Legacy(text) => record(&DisplayRecord::plain_answer(text.clone())),
        AssistantPayload::Other(value) => vec![UiElement::Markdown {
            text: value.to_string(),
        }],
    }
}

/// Render one display record.
pub fn record(record: &DisplayRecord) -> Vec<UiElement> {
    match record {
        DisplayRecord::DocumentSearch(search) => document_search_elements(search),
        DisplayRecord::Inquiry(inquiry) => inquiry_elements(inquiry),
    }
}

fn document_search_elements(record: &DocumentSearchRecord) -> Vec<UiElement> {
    if record.no_file_path {
        return vec![UiElement::Markdown {
            text: record.answer.clone().unwrap_or_default(),
        }];
    }

    let mut elements = vec![UiElement::Markdown {
        text: record.main_message.clone().unwrap_or_default(),
    }];

    if let Some(main_file_path) = &record.main_file_path {
        elements.push(UiElement::Success {
            text: citation_text(main_file_path, record.main_page_number),
            icon: icons::resolve(main_file_path),
        });
    }

    if let Some(sub_message) = &record.sub_message {
        elements.push(UiElement::Markdown {
            text: sub_message.clone(),
        });
        for sub_choice in &record.sub_choices {
            elements.push(UiElement::Info {
                text: citation_text(&sub_choice.source, sub_choice.page_number),
                icon: icons::resolve(&sub_choice.source),
            });
        }
    }

    elements
}

fn inquiry_elements(record: &InquiryRecord) -> Vec<UiElement> {
    let mut elements = vec![UiElement::Markdown {
        text: record.answer.clone(),
    }];

    if let Some(file_info_list) = &record.file_info_list {
        elements.push(UiElement::Divider);
        elements.push(UiElement::SectionLabel {
            text: record
                .message
                .clone()
                .unwrap_or_else(|| strings::SOURCE_LABEL.to_string()),
        });
        for file_info in file_info_list {
            elements.push(UiElement::Info {
                text: file_info.clone(),
                icon: icons::resolve(file_info),
            });
        }
    }

    elements
}

// Document citations show the 1-based page with no space before the
// parenthesis; inquiry strings are pre-formatted by the normalizer.
fn citation_text(source: &str, page: Option<usize>) -> String {
    match page {
        Some(page) => format!("{}(ページNo.{})", source, page + 1),
        None => source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::record::SubChoice;
    use serde_json::json;

    fn found_record() -> DisplayRecord {
        DisplayRecord::DocumentSearch(DocumentSearchRecord {
            main_message: Some(strings::MAIN_DOC_MESSAGE.to_string()),
            main_file_path: Some("hr/policy.pdf".to_string()),
            main_page_number: Some(2),
            sub_message: Some(strings::SUB_DOC_MESSAGE.to_string()),
            sub_choices: vec![SubChoice {
                source: "it/handbook.pdf".to_string(),
                page_number: None,
            }],
            no_file_path: false,
            answer: None,
        })
    }

    #[test]
    fn document_search_renders_main_then_subs() {
        let elements = record(&found_record());

        assert_eq!(
            elements,
            vec![
                UiElement::Markdown {
                    text: strings::MAIN_DOC_MESSAGE.to_string()
                },
                UiElement::Success {
                    text: "hr/policy.pdf(ページNo.3)".to_string(),
                    icon: IconId::Pdf,
                },
                UiElement::Markdown {
                    text: strings::SUB_DOC_MESSAGE.to_string()
                },
                UiElement::Info {
                    text: "it/handbook.pdf".to_string(),
                    icon: IconId::Pdf,
                },
            ]
        );
    }

    #[test]
    fn no_file_path_record_renders_answer_only() {
        let elements = record(&DisplayRecord::DocumentSearch(DocumentSearchRecord {
            answer: Some(strings::NO_DOC_MATCH_MESSAGE.to_string()),
            no_file_path: true,
            ..Default::default()
        }));

        assert_eq!(
            elements,
            vec![UiElement::Markdown {
                text: strings::NO_DOC_MATCH_MESSAGE.to_string()
            }]
        );
    }

    #[test]
    fn inquiry_renders_citation_block() {
        let elements = record(&DisplayRecord::Inquiry(InquiryRecord {
            answer: "回答本文".to_string(),
            message: Some(strings::SOURCE_LABEL.to_string()),
            file_info_list: Some(vec![
                "a.csv".to_string(),
                "b.csv (ページNo.1)".to_string(),
            ]),
        }));

        assert_eq!(elements[0], UiElement::Markdown { text: "回答本文".to_string() });
        assert_eq!(elements[1], UiElement::Divider);
        assert_eq!(
            elements[2],
            UiElement::SectionLabel {
                text: strings::SOURCE_LABEL.to_string()
            }
        );
        assert_eq!(
            elements[3],
            UiElement::Info {
                text: "a.csv".to_string(),
                icon: IconId::Csv,
            }
        );
        assert_eq!(
            elements[4],
            UiElement::Info {
                text: "b.csv (ページNo.1)".to_string(),
                icon: IconId::Csv,
            }
        );
    }

    #[test]
    fn inquiry_with_empty_citation_list_renders_header_only() {
        let elements = record(&DisplayRecord::Inquiry(InquiryRecord {
            answer: "answer".to_string(),
            message: Some(strings::SOURCE_LABEL.to_string()),
            file_info_list: Some(vec![]),
        }));

        assert_eq!(elements.len(), 3);
        assert!(matches!(elements[1], UiElement::Divider));
        assert!(matches!(elements[2], UiElement::SectionLabel { .. }));
    }

    #[test]
    fn inquiry_without_citation_list_renders_answer_only() {
        let elements = record(&DisplayRecord::Inquiry(InquiryRecord {
            answer: "answer".to_string(),
            message: None,
            file_info_list: None,
        }));

        assert_eq!(elements, vec![UiElement::Markdown { text: "answer".to_string() }]);
    }

    #[test]
    fn legacy_string_renders_like_plain_inquiry() {
        let legacy = assistant(&AssistantPayload::Legacy("昔の回答".to_string()));
        let coerced = record(&DisplayRecord::plain_answer("昔の回答"));
        assert_eq!(legacy, coerced);
    }

    #[test]
    fn unknown_payload_renders_string_form() {
        let payload: AssistantPayload =
            serde_json::from_value(json!({"unexpected": true})).unwrap();
        let elements = assistant(&payload);
        assert_eq!(elements.len(), 1);
        match &elements[0] {
            UiElement::Markdown { text } => assert!(text.contains("unexpected")),
            other => panic!("expected markdown, got {:?}", other),
        }
    }

    #[test]
    fn replay_is_idempotent_and_keeps_turn_order() {
        let turns = vec![
            Turn::User {
                text: "規程はどこ？".to_string(),
            },
            Turn::Assistant {
                payload: AssistantPayload::Record(found_record()),
            },
            Turn::Assistant {
                payload: AssistantPayload::Legacy("古い形式の回答".to_string()),
            },
        ];

        let first = transcript(&turns);
        let second = transcript(&turns);
        assert_eq!(first, second);

        assert_eq!(first.len(), 3);
        assert_eq!(first[0].role, "user");
        assert_eq!(first[1].role, "assistant");
        assert_eq!(
            first[0].elements,
            vec![UiElement::Markdown {
                text: "規程はどこ？".to_string()
            }]
        );
    }
}
